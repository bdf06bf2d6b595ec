//! Headless симуляция сталкера
//!
//! Игрок ходит по кругу, сталкер телепортируется; печатаем прогресс.
//! Seed — первый аргумент (по умолчанию 42).

use bevy::prelude::*;
use stalker_simulation::{
    create_headless_app, spawn_stalker, PageCollector, SimulationPlugin, StalkerConfig, StalkerStats, DEFAULT_SEED,
};

/// Маркер игрока в headless прогоне
#[derive(Component)]
struct Walker;

/// Игрок идёт по окружности радиуса 8м
fn walk_in_circle(time: Res<Time<Fixed>>, mut walkers: Query<&mut Transform, With<Walker>>) {
    let angle = time.elapsed_secs() * 0.5;
    for mut transform in walkers.iter_mut() {
        transform.translation = Vec3::new(angle.cos() * 8.0, 0.9, angle.sin() * 8.0);
    }
}

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    println!("Starting stalker headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .add_systems(FixedUpdate, walk_in_circle);

    let player = app
        .world_mut()
        .spawn((Walker, PageCollector, Transform::from_xyz(8.0, 0.9, 0.0)))
        .id();

    let spawned = {
        let mut commands = app.world_mut().commands();
        spawn_stalker(&mut commands, StalkerConfig::default(), Vec3::new(-30.0, 0.0, -30.0), player)
    };
    if let Err(err) = spawned {
        eprintln!("Invalid stalker config: {}", err);
        return;
    }
    app.world_mut().flush();

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let stats = *app.world().resource::<StalkerStats>();
            println!(
                "Tick {}: {} approaches, {} returns, {} effect toggles",
                tick, stats.approaches, stats.returns, stats.effect_toggles
            );
        }
    }

    println!("Simulation complete!");
}
