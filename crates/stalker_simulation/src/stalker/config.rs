//! Параметры Stalker AI (cooldowns, chase probability, grounding)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки конфигурации (проверяются в `StalkerController::new`)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("chase probability {0} is outside [0, 1]")]
    ChanceOutOfRange(f32),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} is not finite")]
    NotFinite { field: &'static str },
}

/// Как считать foot offset (расстояние от origin агента до низа коллайдера)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FootProfile {
    /// Character controller capsule (local space, масштабируется `vertical_scale`)
    Capsule { height: f32, center_y: f32 },
    /// World-space half-height готового bounding box
    Bounds { half_height: f32 },
    /// Нет коллайдера — берём рост человека / 2
    Unspecified,
}

impl FootProfile {
    pub const FALLBACK_OFFSET: f32 = 0.9;

    pub fn offset(&self, vertical_scale: f32) -> f32 {
        match *self {
            FootProfile::Capsule { height, center_y } => {
                (height * 0.5 + center_y).max(0.0) * vertical_scale
            }
            FootProfile::Bounds { half_height } => half_height,
            FootProfile::Unspecified => Self::FALLBACK_OFFSET,
        }
    }
}

impl Default for FootProfile {
    fn default() -> Self {
        // Полная высота 1.8м, центр в origin → foot offset 0.9
        FootProfile::Capsule {
            height: 1.8,
            center_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StalkerConfig {
    /// Радиус телепорта вокруг цели (метры)
    pub teleport_distance: f32,
    /// Cooldown после approach (секунды); он же стартовый таймер
    pub approach_cooldown: f32,
    /// Cooldown после возврата домой (секунды)
    pub return_cooldown: f32,
    /// Вероятность approach на каждом решении
    pub chase_probability: f32,
    /// Скорость поворота (1/sec, exponential smoothing)
    pub turn_rate: f32,
    /// Радиус proximity-эффекта (метры, planar)
    pub proximity_radius: f32,
    /// Rapier group bits, считающиеся землёй
    pub ground_mask: u32,
    /// Высота старта probe над кандидатом
    pub search_height: f32,
    /// Радиус sphere probe ("толстый" луч, не проваливаемся между досками)
    pub foot_radius: f32,
    /// Зазор над землёй, чтобы коллайдер не клипал
    pub clearance: f32,
    pub foot: FootProfile,
    /// Вертикальный масштаб агента (для Capsule foot offset)
    pub vertical_scale: f32,
    /// Сразу смотреть на цель после телепорта
    pub face_target_on_relocate: bool,
}

impl Default for StalkerConfig {
    fn default() -> Self {
        Self {
            teleport_distance: 10.0,
            approach_cooldown: 5.0,
            return_cooldown: 10.0,
            chase_probability: 0.65,
            turn_rate: 5.0,
            proximity_radius: 5.0,
            ground_mask: u32::MAX,
            search_height: 60.0,
            foot_radius: 0.28,
            clearance: 0.12,
            foot: FootProfile::default(),
            vertical_scale: 1.0,
            face_target_on_relocate: true,
        }
    }
}

impl StalkerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("teleport_distance", self.teleport_distance),
            ("approach_cooldown", self.approach_cooldown),
            ("return_cooldown", self.return_cooldown),
            ("chase_probability", self.chase_probability),
            ("turn_rate", self.turn_rate),
            ("proximity_radius", self.proximity_radius),
            ("search_height", self.search_height),
            ("foot_radius", self.foot_radius),
            ("clearance", self.clearance),
            ("vertical_scale", self.vertical_scale),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }

        if !(0.0..=1.0).contains(&self.chase_probability) {
            return Err(ConfigError::ChanceOutOfRange(self.chase_probability));
        }

        for (field, value) in [
            ("approach_cooldown", self.approach_cooldown),
            ("return_cooldown", self.return_cooldown),
            ("turn_rate", self.turn_rate),
            ("search_height", self.search_height),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("teleport_distance", self.teleport_distance),
            ("proximity_radius", self.proximity_radius),
            ("foot_radius", self.foot_radius),
            ("clearance", self.clearance),
            ("vertical_scale", self.vertical_scale),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }

    /// Foot offset агента с учётом масштаба
    pub fn foot_offset(&self) -> f32 {
        self.foot.offset(self.vertical_scale)
    }
}
