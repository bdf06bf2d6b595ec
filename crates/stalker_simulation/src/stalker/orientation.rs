//! Yaw-only поворот к цели
//!
//! Forward агента = -Z (Bevy convention). Smoothing framerate-independent:
//! factor = 1 - e^(-rate * dt).

use bevy::prelude::*;

/// Ниже этого квадрата planar дистанции направление не определено
pub const MIN_LOOK_DISTANCE_SQUARED: f32 = 0.0001;

/// Yaw-rotation, при которой -Z смотрит от `from` к `to` (только XZ)
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<Quat> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx * dx + dz * dz <= MIN_LOOK_DISTANCE_SQUARED {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-dx, -dz)))
}

pub fn smoothing_factor(turn_rate: f32, delta: f32) -> f32 {
    1.0 - (-turn_rate * delta).exp()
}

/// Один шаг поворота к цели; при вырожденном направлении rotation не меняется
pub fn turn_towards(current: Quat, from: Vec3, to: Vec3, turn_rate: f32, delta: f32) -> Quat {
    match yaw_towards(from, to) {
        Some(target) => current.slerp(target, smoothing_factor(turn_rate, delta)).normalize(),
        None => current,
    }
}
