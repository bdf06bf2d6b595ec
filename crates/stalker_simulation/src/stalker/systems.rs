//! Stalker ECS systems (FixedUpdate, chain):
//! 1. handle_stalker_switch — Enable/Disable → initialize/shutdown
//! 2. initialize_new_stalkers — Added<Stalker> → initialize
//! 3. stalker_tick — таймер, решение, поворот, proximity; sync Transform
//! 4. apply_proximity_effect — ProximityEffectToggled → StalkerEffect.active

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::{Stalker, StalkerEffect, StalkerStats};
use super::controller::{CueSink, EffectSwitch, Relocation, StalkerIo, TeleportAction};
use super::events::{ProximityEffectToggled, StalkerSwitch, StalkerTeleported};
use crate::physics::{AgentCollision, GroundSurfaces};
use crate::DeterministicRng;

/// Копит звуковые cue одного tick'а → StalkerTeleported events
#[derive(Default)]
struct CueRecorder {
    relocations: Vec<Relocation>,
}

impl CueSink for CueRecorder {
    fn play_one_shot(&mut self, cue: &Relocation) {
        self.relocations.push(*cue);
    }
}

/// Копит переключения эффекта → ProximityEffectToggled events
#[derive(Default)]
struct EffectRecorder {
    toggles: Vec<bool>,
}

impl EffectSwitch for EffectRecorder {
    fn set_active(&mut self, active: bool) {
        self.toggles.push(active);
    }
}

fn flush_effect(
    recorder: EffectRecorder,
    entity: Entity,
    stalker: &Stalker,
    effect_events: &mut EventWriter<ProximityEffectToggled>,
) {
    for active in recorder.toggles {
        effect_events.write(ProximityEffectToggled {
            stalker: entity,
            effect: stalker.effect,
            active,
        });
    }
}

/// Система: Enable/Disable команды
pub fn handle_stalker_switch(
    mut switches: EventReader<StalkerSwitch>,
    mut stalkers: Query<&mut Stalker>,
    mut effect_events: EventWriter<ProximityEffectToggled>,
) {
    for switch in switches.read() {
        let (entity, enable) = match *switch {
            StalkerSwitch::Enable(entity) => (entity, true),
            StalkerSwitch::Disable(entity) => (entity, false),
        };

        let Ok(mut stalker) = stalkers.get_mut(entity) else {
            crate::log_warning(&format!("StalkerSwitch: {:?} is not a stalker", entity));
            continue;
        };

        let mut recorder = EffectRecorder::default();
        if enable {
            stalker.controller.initialize(&mut recorder);
        } else {
            stalker.controller.shutdown(&mut recorder);
        }
        flush_effect(recorder, entity, &stalker, &mut effect_events);
    }
}

/// Система: initialize для только что заспавненных сталкеров
///
/// Позиция берётся из Transform (мог быть поправлен после spawn).
pub fn initialize_new_stalkers(
    mut stalkers: Query<(Entity, &mut Stalker, &Transform), Added<Stalker>>,
    mut effect_events: EventWriter<ProximityEffectToggled>,
) {
    for (entity, mut stalker, transform) in stalkers.iter_mut() {
        stalker.controller.set_position(transform.translation);

        let mut recorder = EffectRecorder::default();
        stalker.controller.initialize(&mut recorder);
        flush_effect(recorder, entity, &stalker, &mut effect_events);
    }
}

/// Система: основной tick сталкеров
pub fn stalker_tick(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    ground: Res<GroundSurfaces>,
    mut stats: ResMut<StalkerStats>,
    mut stalkers: Query<(
        Entity,
        &mut Stalker,
        &mut Transform,
        Option<&mut CollisionGroups>,
        Option<&mut Velocity>,
    )>,
    targets: Query<&Transform, Without<Stalker>>,
    mut teleport_events: EventWriter<StalkerTeleported>,
    mut effect_events: EventWriter<ProximityEffectToggled>,
) {
    let delta = time.delta_secs();

    for (entity, mut stalker, mut transform, mut groups, mut velocity) in stalkers.iter_mut() {
        // Нет цели (игрок не заспавнен / despawned) → пропускаем tick целиком
        let Ok(target) = targets.get(stalker.target) else {
            continue;
        };
        let target_position = target.translation;

        let mut collision = AgentCollision::new(groups.as_deref_mut(), velocity.as_deref_mut());
        let mut cues = CueRecorder::default();
        let mut effect = EffectRecorder::default();

        let mut io = StalkerIo {
            probe: &*ground,
            collision: &mut collision,
            audio: &mut cues,
            effect: &mut effect,
        };
        stalker.controller.tick(delta, target_position, &mut rng.rng, &mut io);

        transform.translation = stalker.controller.position();
        transform.rotation = stalker.controller.rotation();

        for relocation in cues.relocations {
            match relocation.action {
                TeleportAction::Approach => stats.approaches += 1,
                TeleportAction::Return => stats.returns += 1,
            }
            teleport_events.write(StalkerTeleported {
                stalker: entity,
                action: relocation.action,
                from: relocation.from,
                to: relocation.to,
            });
        }

        stats.effect_toggles += effect.toggles.len() as u32;
        flush_effect(effect, entity, &stalker, &mut effect_events);
    }
}

/// Система: применить переключения к entity эффекта
pub fn apply_proximity_effect(
    mut toggles: EventReader<ProximityEffectToggled>,
    mut effects: Query<&mut StalkerEffect>,
) {
    for toggle in toggles.read() {
        let Some(effect_entity) = toggle.effect else {
            continue;
        };
        if let Ok(mut effect) = effects.get_mut(effect_entity) {
            effect.active = toggle.active;
        }
    }
}
