//! ECS компоненты сталкера

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::config::{ConfigError, StalkerConfig};
use super::controller::StalkerController;
use crate::physics::agent_groups;

/// Сталкер — контроллер решений + ссылки на цель и визуальный эффект
///
/// Transform синхронизируется из контроллера после каждого tick.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct Stalker {
    pub controller: StalkerController,
    /// Кого преследуем (игрок). Нет entity → tick пропускается
    pub target: Entity,
    /// Entity со `StalkerEffect` (static noise), если есть
    pub effect: Option<Entity>,
}

impl Stalker {
    pub fn new(config: StalkerConfig, position: Vec3, target: Entity) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: StalkerController::new(config, position, Quat::IDENTITY)?,
            target,
            effect: None,
        })
    }

    pub fn with_effect(mut self, effect: Entity) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Визуальный эффект близости сталкера
///
/// Хост (рендер) читает `active` и показывает/прячет свой объект.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct StalkerEffect {
    pub active: bool,
}

/// Счётчики для headless прогонов и тестов
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StalkerStats {
    pub approaches: u32,
    pub returns: u32,
    pub effect_toggles: u32,
}

impl StalkerStats {
    pub fn relocations(&self) -> u32 {
        self.approaches + self.returns
    }
}

/// Entities созданного сталкера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalkerHandles {
    pub stalker: Entity,
    pub effect: Entity,
}

/// Минимальный радиус capsule агента (метры)
const MIN_AGENT_RADIUS: f32 = 0.01;

/// Capsule агента по foot offset'у конфига
///
/// Низ capsule на `-foot_offset` от origin, поэтому placed height
/// (ground + foot offset + clearance) ставит collider ровно над землёй.
pub fn agent_collider(config: &StalkerConfig) -> Collider {
    let half_extent = config.foot_offset().max(MIN_AGENT_RADIUS);
    let radius = config.foot_radius.clamp(MIN_AGENT_RADIUS, half_extent);
    Collider::capsule_y(half_extent - radius, radius)
}

/// Spawn helper: сталкер + kinematic тело + эффект
///
/// - Transform на `position`
/// - Rapier: KinematicPositionBased + capsule из `agent_collider` (foot profile + vertical scale)
/// - CollisionGroups: actors
/// - отдельная entity со `StalkerEffect` (выключен)
pub fn spawn_stalker(
    commands: &mut Commands,
    config: StalkerConfig,
    position: Vec3,
    target: Entity,
) -> Result<StalkerHandles, ConfigError> {
    let stalker = Stalker::new(config, position, target)?;
    let collider = agent_collider(stalker.controller.config());
    let effect = commands.spawn(StalkerEffect::default()).id();
    let stalker = stalker.with_effect(effect);

    let stalker = commands
        .spawn((
            Transform::from_translation(position),
            stalker,
            RigidBody::KinematicPositionBased,
            collider,
            Velocity::default(),
            agent_groups(),
        ))
        .id();

    Ok(StalkerHandles { stalker, effect })
}
