//! Collision layers и collision switch агента
//!
//! ## Слои (rapier Group):
//! - GROUP_1: Ground (террейн, пол, платформы) — валидная опора для телепорта
//! - GROUP_2: Actors (игрок, сталкер)
//! - GROUP_3: Triggers (sensor volumes) — probe их никогда не видит

use bevy_rapier3d::prelude::*;

use crate::stalker::CollisionSwitch;

pub const LAYER_GROUND: Group = Group::GROUP_1;
pub const LAYER_ACTORS: Group = Group::GROUP_2;
pub const LAYER_TRIGGERS: Group = Group::GROUP_3;

/// Actors коллайдят с actors + ground
pub fn agent_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_ACTORS, LAYER_ACTORS | LAYER_GROUND)
}

/// `CollisionSwitch` поверх rapier компонентов агента
///
/// Выключение = memberships/filters в NONE (прежние группы запоминаются).
/// `settle` обнуляет Velocity kinematic тела после варпа.
pub struct AgentCollision<'a> {
    groups: Option<&'a mut CollisionGroups>,
    velocity: Option<&'a mut Velocity>,
    stashed: Option<CollisionGroups>,
}

impl<'a> AgentCollision<'a> {
    pub fn new(groups: Option<&'a mut CollisionGroups>, velocity: Option<&'a mut Velocity>) -> Self {
        Self {
            groups,
            velocity,
            stashed: None,
        }
    }
}

impl CollisionSwitch for AgentCollision<'_> {
    fn collision_enabled(&self) -> bool {
        self.groups
            .as_deref()
            .is_some_and(|groups| groups.memberships != Group::NONE)
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        let Some(groups) = self.groups.as_deref_mut() else {
            return;
        };

        if enabled {
            if let Some(stashed) = self.stashed.take() {
                *groups = stashed;
            }
        } else if groups.memberships != Group::NONE {
            self.stashed = Some(*groups);
            *groups = CollisionGroups::new(Group::NONE, Group::NONE);
        }
    }

    fn settle(&mut self) {
        if let Some(velocity) = self.velocity.as_deref_mut() {
            *velocity = Velocity::zero();
        }
    }
}
