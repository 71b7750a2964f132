//! Generation configuration and its validation rules.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::constants::{
    CP_PER_GP, DEFAULT_MAX_COIN_VALUE, DEFAULT_MAX_ENHANCEMENT_BONUS,
    DEFAULT_MAX_MAGIC_ATTRIBUTES, DEFAULT_MAX_ITEMS, DEFAULT_MIN_ITEMS, MAX_ENHANCEMENT_BONUS,
    MAX_MAGIC_ATTRIBUTES,
};
use crate::rarity::Rarity;

/// Categories whose entries are mundane bases the engine can build upon.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GenerateCategory {
    MundaneWeapons,
    MundaneArmor,
    MundaneItems,
}

impl GenerateCategory {
    pub const ALL: [Self; 3] = [Self::MundaneWeapons, Self::MundaneArmor, Self::MundaneItems];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MundaneWeapons => "mundane_weapons",
            Self::MundaneArmor => "mundane_armor",
            Self::MundaneItems => "mundane_items",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.as_str() == key)
    }
}

/// Categories of finished magic items taken from the catalog as-is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PremadeCategory {
    MagicItems,
    MagicWeapons,
    MagicApparel,
}

impl PremadeCategory {
    pub const ALL: [Self; 3] = [Self::MagicItems, Self::MagicWeapons, Self::MagicApparel];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MagicItems => "magic_items",
            Self::MagicWeapons => "magic_weapons",
            Self::MagicApparel => "magic_apparel",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.as_str() == key)
    }
}

/// Inclusive item-count window, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct ItemCountRange {
    pub min: u32,
    pub max: u32,
}

impl ItemCountRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl From<[u32; 2]> for ItemCountRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<ItemCountRange> for [u32; 2] {
    fn from(range: ItemCountRange) -> Self {
        [range.min, range.max]
    }
}

/// Errors raised when a configuration falls outside its documented domain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum item count must be at least 1")]
    ZeroMinItems,
    #[error("item count range invalid (min {min} > max {max})")]
    ItemRangeInverted { min: u32, max: u32 },
    #[error("max_magic_attributes must be between 0 and {limit} (got {value})")]
    MagicAttributesOutOfRange { value: u8, limit: u8 },
    #[error("max_enhancement_bonus must be between 0 and {limit} (got {value})")]
    EnhancementBonusOutOfRange { value: u8, limit: u8 },
}

/// Caller-supplied constraints for one generation or reroll call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Overall budget in gold pieces.
    #[serde(default = "GenerationConfig::default_max_coin_value")]
    pub max_coin_value: u64,
    #[serde(default = "GenerationConfig::default_item_count_range")]
    pub item_count_range: ItemCountRange,
    #[serde(default = "GenerationConfig::default_generate_categories")]
    pub generate_categories: BTreeSet<GenerateCategory>,
    #[serde(default)]
    pub include_premade: BTreeSet<PremadeCategory>,
    /// Tiers a catalog entry's own price must fall in to enter the pool.
    /// Enhanced items are priced afterwards and may land in a higher tier.
    /// Empty means every tier is allowed.
    #[serde(default)]
    pub rarity_filter: BTreeSet<Rarity>,
    #[serde(default = "GenerationConfig::default_max_magic_attributes")]
    pub max_magic_attributes: u8,
    #[serde(default = "GenerationConfig::default_max_enhancement_bonus")]
    pub max_enhancement_bonus: u8,
}

impl GenerationConfig {
    const fn default_max_coin_value() -> u64 {
        DEFAULT_MAX_COIN_VALUE
    }

    const fn default_item_count_range() -> ItemCountRange {
        ItemCountRange::new(DEFAULT_MIN_ITEMS, DEFAULT_MAX_ITEMS)
    }

    fn default_generate_categories() -> BTreeSet<GenerateCategory> {
        GenerateCategory::ALL.into_iter().collect()
    }

    const fn default_max_magic_attributes() -> u8 {
        DEFAULT_MAX_MAGIC_ATTRIBUTES
    }

    const fn default_max_enhancement_bonus() -> u8 {
        DEFAULT_MAX_ENHANCEMENT_BONUS
    }

    /// Budget expressed in copper pieces.
    #[must_use]
    pub const fn budget_cp(&self) -> u64 {
        self.max_coin_value.saturating_mul(CP_PER_GP)
    }

    #[must_use]
    pub fn with_budget(mut self, max_coin_value: u64) -> Self {
        self.max_coin_value = max_coin_value;
        self
    }

    #[must_use]
    pub fn with_item_range(mut self, min: u32, max: u32) -> Self {
        self.item_count_range = ItemCountRange::new(min, max);
        self
    }

    #[must_use]
    pub fn with_generate<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = GenerateCategory>,
    {
        self.generate_categories = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_premade<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = PremadeCategory>,
    {
        self.include_premade = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_rarities<I>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = Rarity>,
    {
        self.rarity_filter = tiers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_max_magic_attributes(mut self, max: u8) -> Self {
        self.max_magic_attributes = max;
        self
    }

    #[must_use]
    pub fn with_max_enhancement_bonus(mut self, max: u8) -> Self {
        self.max_enhancement_bonus = max;
        self
    }

    /// Check every field against its documented domain.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let range = self.item_count_range;
        if range.min == 0 {
            return Err(ConfigError::ZeroMinItems);
        }
        if range.min > range.max {
            return Err(ConfigError::ItemRangeInverted {
                min: range.min,
                max: range.max,
            });
        }
        if self.max_magic_attributes > MAX_MAGIC_ATTRIBUTES {
            return Err(ConfigError::MagicAttributesOutOfRange {
                value: self.max_magic_attributes,
                limit: MAX_MAGIC_ATTRIBUTES,
            });
        }
        if self.max_enhancement_bonus > MAX_ENHANCEMENT_BONUS {
            return Err(ConfigError::EnhancementBonusOutOfRange {
                value: self.max_enhancement_bonus,
                limit: MAX_ENHANCEMENT_BONUS,
            });
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_coin_value: Self::default_max_coin_value(),
            item_count_range: Self::default_item_count_range(),
            generate_categories: Self::default_generate_categories(),
            include_premade: BTreeSet::new(),
            rarity_filter: BTreeSet::new(),
            max_magic_attributes: Self::default_max_magic_attributes(),
            max_enhancement_bonus: Self::default_max_enhancement_bonus(),
        }
    }
}
