//! Счётчик собранных страниц

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Сколько страниц собрано из скольких
///
/// Инвариант: 0 ≤ count ≤ total
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLedger {
    count: u32,
    total: u32,
}

impl Default for PageLedger {
    fn default() -> Self {
        Self::new(8)
    }
}

impl PageLedger {
    pub fn new(total: u32) -> Self {
        Self { count: 0, total }
    }

    /// Добавить (или отнять) страницы с clamp в [0, total]; возвращает новый count
    pub fn add(&mut self, amount: i32) -> u32 {
        let next = (self.count as i64 + amount as i64).clamp(0, self.total as i64);
        self.count = next as u32;
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.count == self.total
    }

    /// Текст для HUD счётчика: "3/8"
    pub fn label(&self) -> String {
        format!("{}/{}", self.count, self.total)
    }
}
