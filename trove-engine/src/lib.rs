//! Trove Treasure Engine
//!
//! Platform-agnostic core for assembling tabletop treasure hoards under a
//! gold budget. The crate never loads or caches the reference catalog
//! itself; callers hand it an immutable [`Catalog`] and a random source.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod generator;
pub mod loot;
pub mod numbers;
pub mod pool;
pub mod pricing;
pub mod rarity;
pub mod seed;

use rand::Rng;

// Re-export commonly used types
pub use catalog::{
    BaseItem, Catalog, CatalogEntry, CatalogError, CatalogSummary, CategoryStats, ItemClass,
    MagicQuality, PremadeItem, QualityKey, QualityPricing, QualityTables,
};
pub use config::{ConfigError, GenerateCategory, GenerationConfig, ItemCountRange, PremadeCategory};
pub use generator::{GenerationError, generate, reroll_slot};
pub use loot::{Appraised, GeneratedItem, LootItem, PremadeLoot, ResultSet, ResultSummary};
pub use numbers::format_gp;
pub use pool::ItemPool;
pub use pricing::{
    enhancement_cost, masterwork_surcharge, max_affordable_bonus, quality_cost, total_item_cost,
};
pub use rarity::{Rarity, classify, weighted_rarity_pick};
pub use seed::{derive_stream_seed, entropy_seed, loot_rng};

/// Trait for abstracting catalog loading.
/// Platform-specific implementations (file, HTTP, bundled asset) provide this.
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the reference catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or parsed.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Owns one immutable catalog snapshot and runs generation against it.
#[derive(Debug, Clone)]
pub struct TreasureEngine {
    catalog: Catalog,
}

impl TreasureEngine {
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Build an engine from whatever loader the platform provides.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the catalog cannot be loaded.
    pub fn load<L: CatalogLoader>(loader: &L) -> Result<Self, L::Error> {
        loader.load_catalog().map(Self::new)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Generate a hoard.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<ResultSet<'_>, GenerationError> {
        generate(&self.catalog, config, rng)
    }

    /// Reroll one slot of a hoard produced by this engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the slot is out of range.
    pub fn reroll<'a, R: Rng + ?Sized>(
        &'a self,
        config: &GenerationConfig,
        current: &ResultSet<'a>,
        slot: usize,
        rng: &mut R,
    ) -> Result<ResultSet<'a>, GenerationError> {
        reroll_slot(&self.catalog, config, &current.items, slot, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl CatalogLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog {
                mundane_items: vec![BaseItem::new("Torch", Some(1))],
                ..Catalog::default()
            })
        }
    }

    #[test]
    fn engine_generates_from_loaded_catalog() {
        let engine = TreasureEngine::load(&FixtureLoader).unwrap();
        let config = GenerationConfig::default()
            .with_budget(1)
            .with_item_range(3, 3);
        let mut rng = SmallRng::seed_from_u64(0xABCD);
        let hoard = engine.generate(&config, &mut rng).unwrap();
        assert_eq!(hoard.len(), 3);
        assert_eq!(hoard.total_value_cp, 3);
        assert!(hoard.items.iter().all(|item| item.display_name() == "Torch"));

        let rerolled = engine.reroll(&config, &hoard, 0, &mut rng).unwrap();
        assert_eq!(rerolled.len(), 3);
        assert!(std::sync::Arc::ptr_eq(&rerolled.items[2], &hoard.items[2]));
    }

    #[test]
    fn engine_reports_bad_slots() {
        let engine = TreasureEngine::load(&FixtureLoader).unwrap();
        let config = GenerationConfig::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let hoard = ResultSet::empty(config.clone());
        assert_eq!(
            engine.reroll(&config, &hoard, 4, &mut rng).unwrap_err(),
            GenerationError::SlotOutOfRange { slot: 4, len: 0 }
        );
    }
}
