//! Stalker events — side effects для хоста (звук, визуал) и lifecycle команды

use bevy::prelude::*;

use super::controller::TeleportAction;

/// Сталкер телепортировался — хост играет one-shot звук
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StalkerTeleported {
    pub stalker: Entity,
    pub action: TeleportAction,
    pub from: Vec3,
    pub to: Vec3,
}

/// Proximity-эффект переключился (только на границе радиуса)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityEffectToggled {
    pub stalker: Entity,
    pub effect: Option<Entity>,
    pub active: bool,
}

/// Включить/выключить сталкера (аналог enable/disable компонента в движке)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalkerSwitch {
    Enable(Entity),
    Disable(Entity),
}
