//! Страницы на уровне: prompt в радиусе досягаемости + сбор по intent

use bevy::prelude::*;

use super::ledger::PageLedger;
use crate::stalker::ProximityLatch;

/// Страница, которую можно подобрать
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct PageCollectible {
    /// Радиус досягаемости (метры, 3D)
    pub reach_radius: f32,
    /// true → despawn после сбора, false → остаётся помеченной `collected`
    pub despawn_on_collect: bool,
    pub collected: bool,
    in_reach: ProximityLatch,
}

impl Default for PageCollectible {
    fn default() -> Self {
        Self {
            reach_radius: 1.5,
            despawn_on_collect: false,
            collected: false,
            in_reach: ProximityLatch::default(),
        }
    }
}

impl PageCollectible {
    /// Страница, которая исчезает из мира после сбора
    pub fn despawning() -> Self {
        Self {
            despawn_on_collect: true,
            ..Default::default()
        }
    }

    pub fn in_reach(&self) -> bool {
        self.in_reach.is_active()
    }

    /// Обновить prompt по позиции collector'а; `Some(visible)` только при смене
    pub fn update_reach(&mut self, page: Vec3, collector: Vec3) -> Option<bool> {
        if self.collected {
            return None;
        }
        self.in_reach.update(page.distance_squared(collector), self.reach_radius)
    }

    /// Собрать: ledger +1, prompt гаснет. `None` если уже собрана
    pub fn collect(&mut self, ledger: &mut PageLedger) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        self.in_reach.reset();
        Some(ledger.add(1))
    }
}

/// Тот, кто собирает страницы (игрок / камера)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct PageCollector;

/// Input хоста: collector нажал "подобрать"
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectPageIntent {
    pub collector: Entity,
}

/// Prompt "подобрать" показать/спрятать
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePromptToggled {
    pub page: Entity,
    pub visible: bool,
}

/// Страница собрана (хук для звука подбора)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCollected {
    pub page: Entity,
    pub collector: Entity,
    pub count: u32,
    pub total: u32,
}

/// Система: prompt в радиусе ближайшего collector'а
pub fn update_page_prompts(
    collectors: Query<&Transform, With<PageCollector>>,
    mut pages: Query<(Entity, &Transform, &mut PageCollectible), Without<PageCollector>>,
    mut prompt_events: EventWriter<PagePromptToggled>,
) {
    for (page, transform, mut collectible) in pages.iter_mut() {
        let nearest = collectors
            .iter()
            .map(|collector| collector.translation)
            .min_by(|a, b| {
                a.distance_squared(transform.translation)
                    .total_cmp(&b.distance_squared(transform.translation))
            });
        // Нет collector'а → ничего не делаем
        let Some(collector) = nearest else {
            continue;
        };

        if let Some(visible) = collectible.update_reach(transform.translation, collector) {
            prompt_events.write(PagePromptToggled { page, visible });
        }
    }
}

/// Система: сбор страниц по CollectPageIntent
pub fn collect_pages(
    mut commands: Commands,
    mut intents: EventReader<CollectPageIntent>,
    collectors: Query<&Transform, With<PageCollector>>,
    mut pages: Query<(Entity, &Transform, &mut PageCollectible), Without<PageCollector>>,
    mut ledger: ResMut<PageLedger>,
    mut prompt_events: EventWriter<PagePromptToggled>,
    mut collected_events: EventWriter<PageCollected>,
) {
    for intent in intents.read() {
        let Ok(collector) = collectors.get(intent.collector) else {
            continue;
        };

        for (page, transform, mut collectible) in pages.iter_mut() {
            let reach = collectible.reach_radius;
            if transform.translation.distance_squared(collector.translation) > reach * reach {
                continue;
            }

            let was_prompted = collectible.in_reach();
            let Some(count) = collectible.collect(&mut ledger) else {
                continue;
            };

            if was_prompted {
                prompt_events.write(PagePromptToggled { page, visible: false });
            }
            collected_events.write(PageCollected {
                page,
                collector: intent.collector,
                count,
                total: ledger.total(),
            });
            crate::log_info(&format!("Pages: collected {:?} ({})", page, ledger.label()));

            if collectible.despawn_on_collect {
                commands.entity(page).despawn();
            }
        }
    }
}
