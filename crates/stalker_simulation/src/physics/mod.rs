//! Physics-side коллабораторы для headless хоста
//!
//! - collision: слои (rapier Group) + выключение collision агента на время телепорта
//! - ground: горизонтальные поверхности, отвечающие на sphere probe вниз
//!
//! В движке эти же роли играют его physics queries; сталкер видит только
//! трейты `GroundProbe` и `CollisionSwitch`.

pub mod collision;
pub mod ground;

pub use collision::{agent_groups, AgentCollision, LAYER_ACTORS, LAYER_GROUND, LAYER_TRIGGERS};
pub use ground::{GroundSlab, GroundSurfaces};
