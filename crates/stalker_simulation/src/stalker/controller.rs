//! Stalker controller — teleport/chase decision core
//!
//! Периодический процесс:
//! Idle (timer > 0) → Deciding (timer ≤ 0, синхронно) → Idle с новым таймером.
//!
//! Решение: один uniform roll в [0,1).
//! - roll < chase_probability → Approach: случайная точка на окружности
//!   `teleport_distance` вокруг цели, timer = approach_cooldown
//! - иначе → Return: домашняя точка (позиция при initialize), timer = return_cooldown
//!
//! Каждая точка проходит ground snap (см. `placement`). Движок-независимо:
//! probe, collision, звук и визуальный эффект приходят через `StalkerIo`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::config::{ConfigError, StalkerConfig};
use super::orientation::{turn_towards, yaw_towards};
use super::placement::{ground_snap, placed_height, CollisionSuspendGuard, CollisionSwitch, GroundProbe};
use super::proximity::{planar_distance_squared, ProximityLatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum TeleportAction {
    /// Телепорт к игроку
    Approach,
    /// Возврат на домашнюю точку
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum StalkerPhase {
    /// До `initialize()` или после `shutdown()` — tick ничего не делает
    #[default]
    Dormant,
    /// Ждём таймер
    Idle,
    /// Внутри tick, пока выполняется решение
    Deciding,
}

/// Результат одного перемещения (он же payload звукового cue)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relocation {
    pub action: TeleportAction,
    pub from: Vec3,
    pub to: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    pub relocation: Option<Relocation>,
    /// `Some(active)` если proximity-эффект переключился на этом tick
    pub effect_changed: Option<bool>,
}

/// One-shot звук телепорта (fire-and-forget)
pub trait CueSink {
    fn play_one_shot(&mut self, cue: &Relocation);
}

/// Внешний визуальный объект (static noise и т.п.)
pub trait EffectSwitch {
    fn set_active(&mut self, active: bool);
}

impl CueSink for () {
    fn play_one_shot(&mut self, _cue: &Relocation) {}
}

impl EffectSwitch for () {
    fn set_active(&mut self, _active: bool) {}
}

/// Коллабораторы одного tick'а
pub struct StalkerIo<'a> {
    pub probe: &'a dyn GroundProbe,
    pub collision: &'a mut dyn CollisionSwitch,
    pub audio: &'a mut dyn CueSink,
    pub effect: &'a mut dyn EffectSwitch,
}

#[derive(Debug, Clone)]
pub struct StalkerController {
    config: StalkerConfig,
    position: Vec3,
    rotation: Quat,
    home: Vec3,
    /// Дом фиксируется один раз, повторный initialize его не двигает
    home_captured: bool,
    timer: f32,
    effect: ProximityLatch,
    phase: StalkerPhase,
    last_action: Option<TeleportAction>,
}

impl StalkerController {
    pub fn new(config: StalkerConfig, position: Vec3, rotation: Quat) -> Result<Self, ConfigError> {
        config.validate()?;
        let timer = config.approach_cooldown;
        Ok(Self {
            config,
            position,
            rotation,
            home: position,
            home_captured: false,
            timer,
            effect: ProximityLatch::default(),
            phase: StalkerPhase::Dormant,
            last_action: None,
        })
    }

    /// Старт сцены: первая позиция становится домом, эффект выключен
    ///
    /// Повторный вызов (Enable после Disable) только сбрасывает таймер и
    /// фазу; дом остаётся прежним, эффект гасится лишь если был включён.
    pub fn initialize(&mut self, effect: &mut dyn EffectSwitch) {
        let first_start = !self.home_captured;
        if first_start {
            self.home = self.position;
            self.home_captured = true;
        }
        self.timer = self.config.approach_cooldown;
        if self.effect.reset() || first_start {
            effect.set_active(false);
        }
        self.phase = StalkerPhase::Idle;

        crate::log_info(&format!(
            "Stalker: initialized at {:?} (first decision in {:.1}s)",
            self.home, self.timer
        ));
    }

    /// Остановка: эффект гасится, дальнейшие tick'и — no-op
    pub fn shutdown(&mut self, effect: &mut dyn EffectSwitch) {
        if self.effect.reset() {
            effect.set_active(false);
        }
        self.phase = StalkerPhase::Dormant;
        crate::log_info("Stalker: shut down");
    }

    /// Единственная per-frame точка входа
    pub fn tick<R: Rng>(&mut self, delta: f32, target: Vec3, rng: &mut R, io: &mut StalkerIo) -> TickReport {
        let mut report = TickReport::default();
        if self.phase == StalkerPhase::Dormant {
            return report;
        }

        self.timer -= delta;
        if self.timer <= 0.0 {
            report.relocation = Some(self.decide_and_act(target, rng, io));
        }

        self.rotation = match report.relocation {
            Some(_) if self.config.face_target_on_relocate => {
                yaw_towards(self.position, target).unwrap_or(self.rotation)
            }
            _ => turn_towards(self.rotation, self.position, target, self.config.turn_rate, delta),
        };

        let distance_squared = planar_distance_squared(self.position, target);
        if let Some(active) = self.effect.update(distance_squared, self.config.proximity_radius) {
            io.effect.set_active(active);
            report.effect_changed = Some(active);
            crate::log_info(&format!(
                "Stalker: proximity effect {} (distance {:.2})",
                if active { "ON" } else { "OFF" },
                distance_squared.sqrt()
            ));
        }

        report
    }

    /// Один roll → Approach или Return, перемещение, новый таймер
    pub fn decide_and_act<R: Rng>(&mut self, target: Vec3, rng: &mut R, io: &mut StalkerIo) -> Relocation {
        self.phase = StalkerPhase::Deciding;

        let action = self.choose_action(rng.gen::<f32>());
        let (candidate, cooldown) = match action {
            TeleportAction::Approach => (self.approach_candidate(target, rng), self.config.approach_cooldown),
            TeleportAction::Return => (self.home, self.config.return_cooldown),
        };

        let from = self.position;
        let to = self.relocate(candidate, io);
        self.timer = cooldown;
        self.last_action = Some(action);
        self.phase = StalkerPhase::Idle;

        let relocation = Relocation { action, from, to };
        io.audio.play_one_shot(&relocation);

        crate::log(&format!(
            "Stalker: {:?} {:?} → {:?}, next decision in {:.1}s",
            action, from, to, cooldown
        ));

        relocation
    }

    /// `roll` ∈ [0,1); probability 1.0 → всегда Approach, 0.0 → всегда Return
    pub fn choose_action(&self, roll: f32) -> TeleportAction {
        if roll < self.config.chase_probability {
            TeleportAction::Approach
        } else {
            TeleportAction::Return
        }
    }

    fn approach_candidate<R: Rng>(&self, target: Vec3, rng: &mut R) -> Vec3 {
        let angle = rng.gen_range(0.0..TAU);
        target + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.config.teleport_distance
    }

    /// Ground snap + запись позиции при выключенной collision агента
    fn relocate(&mut self, candidate: Vec3, io: &mut StalkerIo) -> Vec3 {
        let mut guard = CollisionSuspendGuard::suspend(&mut *io.collision);

        let snapped = ground_snap(
            io.probe,
            candidate,
            self.config.search_height,
            self.config.foot_radius,
            Group::from_bits_truncate(self.config.ground_mask),
        );
        self.position = Vec3::new(
            snapped.x,
            placed_height(snapped.y, self.config.foot_offset(), self.config.clearance),
            snapped.z,
        );
        guard.settle();

        self.position
    }

    pub fn config(&self) -> &StalkerConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn phase(&self) -> StalkerPhase {
        self.phase
    }

    pub fn effect_active(&self) -> bool {
        self.effect.is_active()
    }

    pub fn last_action(&self) -> Option<TeleportAction> {
        self.last_action
    }

    /// Внешний телепорт (спавн, коррекция от движка); дом не меняется
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
