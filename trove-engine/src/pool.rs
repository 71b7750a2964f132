//! Per-call snapshots of the catalog entries eligible for drawing.
use log::debug;

use crate::catalog::{BaseItem, Catalog, CatalogEntry, PremadeItem, in_rarities, within_budget};
use crate::config::{GenerateCategory, GenerationConfig, PremadeCategory};
use crate::constants::LOG_TARGET_POOL;

/// Affordable, rarity-permitted bases of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BasePool<'a> {
    pub category: GenerateCategory,
    pub items: Vec<&'a BaseItem>,
}

/// Affordable, rarity-permitted premade items of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct PremadePool<'a> {
    pub category: PremadeCategory,
    pub items: Vec<&'a PremadeItem>,
}

/// Disposable snapshot rebuilt on every generate or reroll call.
///
/// Only non-empty categories are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPool<'a> {
    pub generated: Vec<BasePool<'a>>,
    pub premade: Vec<PremadePool<'a>>,
}

impl<'a> ItemPool<'a> {
    /// Fetch each enabled category, drop unpriced entries, cap at
    /// `ceiling_cp` and apply the rarity filter.
    #[must_use]
    pub fn build(catalog: &'a Catalog, config: &GenerationConfig, ceiling_cp: u64) -> Self {
        let generated: Vec<BasePool<'a>> = config
            .generate_categories
            .iter()
            .map(|&category| BasePool {
                category,
                items: in_rarities(
                    within_budget(catalog.base_items(category), ceiling_cp),
                    &config.rarity_filter,
                ),
            })
            .filter(|pool| !pool.items.is_empty())
            .collect();
        let premade: Vec<PremadePool<'a>> = config
            .include_premade
            .iter()
            .map(|&category| PremadePool {
                category,
                items: in_rarities(
                    within_budget(catalog.premade_items(category), ceiling_cp),
                    &config.rarity_filter,
                ),
            })
            .filter(|pool| !pool.items.is_empty())
            .collect();

        let pool = Self { generated, premade };
        debug!(
            target: LOG_TARGET_POOL,
            "pool built | ceiling_cp:{ceiling_cp} generated:{} premade:{}",
            pool.generated_count(),
            pool.premade_count()
        );
        pool
    }

    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.generated.iter().map(|pool| pool.items.len()).sum()
    }

    #[must_use]
    pub fn premade_count(&self) -> usize {
        self.premade.iter().map(|pool| pool.items.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.premade.is_empty()
    }

    /// Cheapest price anywhere in the snapshot.
    #[must_use]
    pub fn cheapest_cp(&self) -> Option<u64> {
        let bases = self
            .generated
            .iter()
            .flat_map(|pool| pool.items.iter().filter_map(|item| item.purchasable_cost()));
        let premade = self
            .premade
            .iter()
            .flat_map(|pool| pool.items.iter().filter_map(|item| item.purchasable_cost()));
        bases.chain(premade).min()
    }

    /// Every premade entry across categories priced at or below `remaining_cp`.
    #[must_use]
    pub fn affordable_premade(&self, remaining_cp: u64) -> Vec<(PremadeCategory, &'a PremadeItem)> {
        self.premade
            .iter()
            .flat_map(|pool| {
                pool.items
                    .iter()
                    .filter(move |item| {
                        item.purchasable_cost()
                            .is_some_and(|cost| cost <= remaining_cp)
                    })
                    .map(move |item| (pool.category, *item))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CP_PER_GP;
    use crate::rarity::Rarity;

    const GP: u64 = CP_PER_GP;

    fn catalog() -> Catalog {
        Catalog {
            mundane_weapons: vec![
                BaseItem::new("Dagger", Some(2 * GP)),
                BaseItem::new("Greatsword", Some(50 * GP)),
                BaseItem::new("Artifact Blade", None),
            ],
            mundane_armor: vec![BaseItem::new("Full Plate", Some(1_500 * GP))],
            mundane_items: vec![BaseItem::new("Rope", Some(GP))],
            magic_items: vec![
                PremadeItem::new("Potion of Healing", Some(50 * GP)),
                PremadeItem::new("Ring of Protection +2", Some(8_000 * GP)),
            ],
            magic_apparel: vec![PremadeItem::new("Boots of Speed", Some(12_000 * GP))],
            ..Catalog::default()
        }
    }

    #[test]
    fn only_enabled_categories_are_pooled() {
        let catalog = catalog();
        let config = GenerationConfig::default()
            .with_generate([GenerateCategory::MundaneWeapons])
            .with_premade([PremadeCategory::MagicItems]);
        let pool = ItemPool::build(&catalog, &config, 100_000 * GP);
        assert_eq!(pool.generated.len(), 1);
        assert_eq!(pool.generated[0].category, GenerateCategory::MundaneWeapons);
        assert_eq!(pool.generated_count(), 2);
        assert_eq!(pool.premade.len(), 1);
        assert_eq!(pool.premade_count(), 2);
    }

    #[test]
    fn ceiling_drops_expensive_entries_and_empty_categories() {
        let catalog = catalog();
        let config = GenerationConfig::default().with_premade(PremadeCategory::ALL);
        let pool = ItemPool::build(&catalog, &config, 100 * GP);
        let categories: Vec<_> = pool.generated.iter().map(|p| p.category).collect();
        assert_eq!(
            categories,
            vec![GenerateCategory::MundaneWeapons, GenerateCategory::MundaneItems]
        );
        assert_eq!(pool.premade_count(), 1);
        assert_eq!(pool.cheapest_cp(), Some(GP));
    }

    #[test]
    fn unpriced_entries_never_enter_the_pool() {
        let catalog = catalog();
        let config = GenerationConfig::default();
        let pool = ItemPool::build(&catalog, &config, u64::MAX);
        assert!(
            pool.generated
                .iter()
                .flat_map(|p| p.items.iter())
                .all(|item| item.name != "Artifact Blade")
        );
    }

    #[test]
    fn rarity_filter_applies_to_entry_price() {
        let catalog = catalog();
        let config = GenerationConfig::default()
            .with_premade(PremadeCategory::ALL)
            .with_rarities([Rarity::VeryRare]);
        let pool = ItemPool::build(&catalog, &config, 10_000 * GP);
        assert!(pool.generated.is_empty());
        assert_eq!(pool.premade_count(), 1);
        assert_eq!(pool.premade[0].items[0].name, "Ring of Protection +2");
    }

    #[test]
    fn affordable_premade_spans_categories() {
        let catalog = catalog();
        let config = GenerationConfig::default().with_premade(PremadeCategory::ALL);
        let pool = ItemPool::build(&catalog, &config, u64::MAX);
        assert_eq!(pool.affordable_premade(u64::MAX).len(), 3);
        let cheap = pool.affordable_premade(100 * GP);
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].0, PremadeCategory::MagicItems);
        assert!(pool.affordable_premade(GP).is_empty());
    }
}
