//! Proximity latch — флаг "внутри радиуса", переключается только на границе
//!
//! Используется для static-эффекта сталкера и для prompt'а страниц.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ProximityLatch {
    active: bool,
}

impl ProximityLatch {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Обновить по квадрату дистанции
    ///
    /// Возвращает `Some(new_state)` только при пересечении радиуса
    /// (граница включительно: `distance <= radius` → внутри).
    pub fn update(&mut self, distance_squared: f32, radius: f32) -> Option<bool> {
        let inside = distance_squared <= radius * radius;
        if inside == self.active {
            return None;
        }
        self.active = inside;
        Some(inside)
    }

    /// Принудительно выключить; `true` если состояние изменилось
    pub fn reset(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// Квадрат дистанции в горизонтальной плоскости (XZ)
pub fn planar_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}
