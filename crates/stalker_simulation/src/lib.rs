//! Stalker Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16 для антагониста хоррор-игры.
//!
//! Архитектура:
//! - stalker: решения teleport/chase, ground snap, поворот, proximity-эффект
//! - pages: сбор записок (prompt + счётчик)
//! - physics: headless коллабораторы (ground slabs, collision groups)
//! - logger: глобальный pluggable logger
//!
//! Рендер, input, аудио и UI — внешние; они получают события и читают Transform.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod logger;
pub mod pages;
pub mod physics;
pub mod stalker;

pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use pages::{CollectPageIntent, PageCollected, PageCollectible, PageCollector, PageLedger, PagesPlugin};
pub use physics::{GroundSlab, GroundSurfaces};
pub use stalker::{
    spawn_stalker, ProximityEffectToggled, Stalker, StalkerConfig, StalkerController, StalkerEffect, StalkerPlugin,
    StalkerStats, StalkerSwitch, StalkerTeleported, TeleportAction,
};

/// Seed по умолчанию
pub const DEFAULT_SEED: u64 = 42;

/// Частота simulation tick (Hz)
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((StalkerPlugin, PagesPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время идёт ровно на 1/60 sec за `app.update()` (не по wall clock),
/// поэтому FixedUpdate срабатывает раз в update и прогоны воспроизводимы.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
