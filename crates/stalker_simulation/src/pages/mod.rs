//! Pages — сбор записок на уровне
//!
//! Prompt в радиусе досягаемости, сбор по intent от хоста (input внешний),
//! счётчик в `PageLedger`.

use bevy::prelude::*;

pub mod collectible;
pub mod ledger;

pub use collectible::{CollectPageIntent, PageCollected, PageCollectible, PageCollector, PagePromptToggled};
pub use ledger::PageLedger;

/// Pages Plugin
///
/// Порядок: update_page_prompts → collect_pages (FixedUpdate).
pub struct PagesPlugin;

impl Plugin for PagesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CollectPageIntent>()
            .add_event::<PagePromptToggled>()
            .add_event::<PageCollected>()
            .init_resource::<PageLedger>()
            .add_systems(
                FixedUpdate,
                (collectible::update_page_prompts, collectible::collect_pages).chain(),
            );
    }
}
