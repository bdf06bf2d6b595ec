//! Headless ground: набор горизонтальных плит вместо физического мира
//!
//! Отвечает на sphere cast вниз: сфера радиуса r спускается из origin,
//! первая плита, которой она коснулась, даёт точку контакта.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use super::collision::{LAYER_GROUND, LAYER_TRIGGERS};
use crate::stalker::{GroundProbe, ProbeQuery};

/// Горизонтальная плита (верхняя грань на `height`, прямоугольник в XZ)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSlab {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
    pub layers: Group,
    /// Trigger volume — probe игнорирует
    pub sensor: bool,
}

impl GroundSlab {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min,
            max,
            height,
            layers: LAYER_GROUND,
            sensor: false,
        }
    }

    /// Квадрат со стороной `2 * half_extent` с центром `center` (XZ)
    pub fn square(center: Vec2, half_extent: f32, height: f32) -> Self {
        Self::new(center - Vec2::splat(half_extent), center + Vec2::splat(half_extent), height)
    }

    pub fn trigger(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            layers: LAYER_TRIGGERS,
            sensor: true,
            ..Self::new(min, max, height)
        }
    }

    pub fn with_layers(mut self, layers: Group) -> Self {
        self.layers = layers;
        self
    }

    /// Ближайшая к `point` точка плиты в XZ
    fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct GroundSurfaces {
    pub slabs: Vec<GroundSlab>,
}

impl GroundSurfaces {
    /// Один большой пол на высоте `height`
    pub fn flat(height: f32, half_extent: f32) -> Self {
        Self {
            slabs: vec![GroundSlab::square(Vec2::ZERO, half_extent, height)],
        }
    }

    pub fn with_slab(mut self, slab: GroundSlab) -> Self {
        self.slabs.push(slab);
        self
    }

    /// Дистанция, которую сфера проходит вниз до касания плиты
    fn time_of_impact(slab: &GroundSlab, query: &ProbeQuery) -> Option<(f32, Vec3)> {
        let center = Vec2::new(query.origin.x, query.origin.z);
        let closest = slab.closest_point(center);
        let planar_squared = center.distance_squared(closest);
        let radius_squared = query.radius * query.radius;
        if planar_squared > radius_squared {
            return None;
        }

        // Касание на ребре/грани: центр сферы на sqrt(r² - d²) выше плиты
        let lift = (radius_squared - planar_squared).sqrt();
        let toi = query.origin.y - lift - slab.height;
        if toi < 0.0 || toi > query.max_distance {
            return None;
        }

        Some((toi, Vec3::new(closest.x, slab.height, closest.y)))
    }
}

impl GroundProbe for GroundSurfaces {
    /// Только casts вниз; любое другое направление — промах
    fn probe(&self, query: &ProbeQuery) -> Option<Vec3> {
        if query.direction.normalize_or_zero() != Vec3::NEG_Y {
            return None;
        }

        self.slabs
            .iter()
            .filter(|slab| !slab.sensor && slab.layers.intersects(query.layers))
            .filter_map(|slab| Self::time_of_impact(slab, query))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, point)| point)
    }
}
