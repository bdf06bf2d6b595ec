//! Stalker AI — teleport/chase антагонист
//!
//! Ядро (`controller`) движок-независимо: probe, collision, звук и эффект
//! приходят через трейты. ECS слой (`systems`) подключает ядро к headless
//! миру: GroundSurfaces как probe, rapier CollisionGroups как collision switch,
//! события как звук/визуал.

use bevy::prelude::*;

pub mod components;
pub mod config;
pub mod controller;
pub mod events;
pub mod orientation;
pub mod placement;
pub mod proximity;
pub mod systems;

#[cfg(test)]
mod controller_tests;

pub use components::{agent_collider, spawn_stalker, Stalker, StalkerEffect, StalkerHandles, StalkerStats};
pub use config::{ConfigError, FootProfile, StalkerConfig};
pub use controller::{
    CueSink, EffectSwitch, Relocation, StalkerController, StalkerIo, StalkerPhase, TeleportAction, TickReport,
};
pub use events::{ProximityEffectToggled, StalkerSwitch, StalkerTeleported};
pub use placement::{
    ground_snap, placed_height, probe_ground, CollisionSuspendGuard, CollisionSwitch, GroundProbe, PlacementError,
    ProbeQuery,
};
pub use proximity::{planar_distance_squared, ProximityLatch};

use crate::physics::GroundSurfaces;
use crate::DeterministicRng;

/// Размер headless пола по умолчанию (half extent, метры)
pub const DEFAULT_GROUND_HALF_EXTENT: f32 = 500.0;

/// Stalker Plugin
///
/// Регистрирует события, ресурсы и системы в FixedUpdate.
/// Порядок выполнения:
/// 1. handle_stalker_switch — enable/disable
/// 2. initialize_new_stalkers — старт новых сталкеров
/// 3. stalker_tick — решения + перемещение + proximity
/// 4. apply_proximity_effect — состояние entity эффекта
pub struct StalkerPlugin;

impl Plugin for StalkerPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GroundSurfaces>() {
            app.insert_resource(GroundSurfaces::flat(0.0, DEFAULT_GROUND_HALF_EXTENT));
        }

        app.add_event::<StalkerTeleported>()
            .add_event::<ProximityEffectToggled>()
            .add_event::<StalkerSwitch>()
            .init_resource::<StalkerStats>()
            .init_resource::<DeterministicRng>()
            .add_systems(
                FixedUpdate,
                (
                    systems::handle_stalker_switch,
                    systems::initialize_new_stalkers,
                    systems::stalker_tick,
                    systems::apply_proximity_effect,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            );
    }
}
