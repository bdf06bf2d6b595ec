//! Ground snapping и безопасное перемещение агента
//!
//! Probe вниз от кандидата → высота земли → + foot offset + clearance.
//! Collision агента выключена на время probe и записи позиции
//! (`CollisionSuspendGuard`, восстанавливается на любом пути выхода).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlacementError {
    /// Под кандидатом нет ground-поверхности (нет коллайдера на арте и т.п.)
    #[error("ground probe missed below ({x:.2}, {z:.2})")]
    GroundProbeMiss { x: f32, z: f32 },
}

/// Параметры sphere cast для поиска земли
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeQuery {
    pub origin: Vec3,
    pub radius: f32,
    pub direction: Vec3,
    pub max_distance: f32,
    /// Только эти слои считаются землёй; sensors/triggers игнорируются всегда
    pub layers: Group,
}

impl ProbeQuery {
    /// Cast вниз с высоты `search_height` над кандидатом, на `2 * search_height`
    pub fn below(candidate: Vec3, search_height: f32, radius: f32, layers: Group) -> Self {
        Self {
            origin: candidate + Vec3::Y * search_height,
            radius,
            direction: Vec3::NEG_Y,
            max_distance: search_height * 2.0,
            layers,
        }
    }
}

/// Сервис физических запросов (движок или headless `GroundSurfaces`)
pub trait GroundProbe {
    /// Точка контакта с первой ground-поверхностью или `None`
    fn probe(&self, query: &ProbeQuery) -> Option<Vec3>;
}

/// Участие агента в collision (character controller / collider)
pub trait CollisionSwitch {
    fn collision_enabled(&self) -> bool;

    fn set_collision_enabled(&mut self, enabled: bool);

    /// Сбросить остаточную скорость после варпа (kinematic body)
    fn settle(&mut self) {}
}

/// Агент без коллайдера
impl CollisionSwitch for () {
    fn collision_enabled(&self) -> bool {
        false
    }

    fn set_collision_enabled(&mut self, _enabled: bool) {}
}

/// Scope guard: выключает collision при создании, возвращает прежнее состояние в Drop
pub struct CollisionSuspendGuard<'a, S: CollisionSwitch + ?Sized> {
    switch: &'a mut S,
    was_enabled: bool,
}

impl<'a, S: CollisionSwitch + ?Sized> CollisionSuspendGuard<'a, S> {
    pub fn suspend(switch: &'a mut S) -> Self {
        let was_enabled = switch.collision_enabled();
        switch.set_collision_enabled(false);
        Self { switch, was_enabled }
    }

    pub fn settle(&mut self) {
        self.switch.settle();
    }
}

impl<S: CollisionSwitch + ?Sized> Drop for CollisionSuspendGuard<'_, S> {
    fn drop(&mut self) {
        self.switch.set_collision_enabled(self.was_enabled);
    }
}

/// Высота земли под кандидатом (кандидат с y = точка контакта)
pub fn probe_ground(probe: &dyn GroundProbe, query: &ProbeQuery, candidate: Vec3) -> Result<Vec3, PlacementError> {
    match probe.probe(query) {
        Some(hit) => Ok(Vec3::new(candidate.x, hit.y, candidate.z)),
        None => Err(PlacementError::GroundProbeMiss {
            x: candidate.x,
            z: candidate.z,
        }),
    }
}

/// Ground snap с fallback: на промахе высота кандидата не меняется
pub fn ground_snap(
    probe: &dyn GroundProbe,
    candidate: Vec3,
    search_height: f32,
    foot_radius: f32,
    ground: Group,
) -> Vec3 {
    let query = ProbeQuery::below(candidate, search_height, foot_radius, ground);
    probe_ground(probe, &query, candidate).unwrap_or_else(|err| {
        crate::log_warning(&format!("Stalker: {}, keeping y = {:.2}", err, candidate.y));
        candidate
    })
}

/// Итоговая высота origin'а агента над поверхностью
pub fn placed_height(surface_y: f32, foot_offset: f32, clearance: f32) -> f32 {
    surface_y + foot_offset + clearance
}
