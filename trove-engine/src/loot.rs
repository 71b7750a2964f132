//! Generated and premade loot records plus the result set that carries them.
use chrono::{DateTime, Utc};
use serde::Serialize;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{BaseItem, ItemClass, MagicQuality, PremadeItem};
use crate::config::{GenerateCategory, GenerationConfig, PremadeCategory};
use crate::pricing::{effective_bonus, total_item_cost};
use crate::rarity::{Rarity, classify};

/// Priced, named, rarity-tagged view shared by every loot variant.
pub trait Appraised {
    fn display_name(&self) -> Cow<'_, str>;
    fn cost_cp(&self) -> u64;
    fn rarity(&self) -> Rarity;
}

pub type QualityList<'a> = SmallVec<[&'a MagicQuality; 4]>;

/// A base item built up with an enhancement bonus and qualities.
///
/// Price and rarity are fixed at construction from the components, so the
/// tier can never drift from the cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedItem<'a> {
    base: &'a BaseItem,
    category: GenerateCategory,
    class: ItemClass,
    enhancement_bonus: u8,
    qualities: QualityList<'a>,
    display_name: String,
    total_cost_cp: u64,
    rarity: Rarity,
}

impl<'a> GeneratedItem<'a> {
    #[must_use]
    pub fn new(
        base: &'a BaseItem,
        category: GenerateCategory,
        enhancement_bonus: u8,
        qualities: QualityList<'a>,
    ) -> Self {
        let class = base.class_in(category);
        let total_cost_cp = total_item_cost(base, class, enhancement_bonus, &qualities);
        let display_name = compose_name(&base.name, enhancement_bonus, &qualities);
        Self {
            base,
            category,
            class,
            enhancement_bonus,
            qualities,
            display_name,
            total_cost_cp,
            rarity: classify(total_cost_cp),
        }
    }

    #[must_use]
    pub const fn base(&self) -> &'a BaseItem {
        self.base
    }

    #[must_use]
    pub const fn category(&self) -> GenerateCategory {
        self.category
    }

    #[must_use]
    pub const fn class(&self) -> ItemClass {
        self.class
    }

    #[must_use]
    pub const fn enhancement_bonus(&self) -> u8 {
        self.enhancement_bonus
    }

    #[must_use]
    pub fn qualities(&self) -> &[&'a MagicQuality] {
        &self.qualities
    }

    /// Enhancement plus bonus-equivalent qualities.
    #[must_use]
    pub fn effective_bonus(&self) -> u8 {
        effective_bonus(self.enhancement_bonus, &self.qualities)
    }
}

impl Appraised for GeneratedItem<'_> {
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.display_name)
    }

    fn cost_cp(&self) -> u64 {
        self.total_cost_cp
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }
}

/// `+<bonus> <quality>... <base>`; the prefix is dropped at bonus 0.
fn compose_name(base: &str, bonus: u8, qualities: &[&MagicQuality]) -> String {
    let mut parts: Vec<Cow<'_, str>> = Vec::with_capacity(qualities.len() + 2);
    if bonus > 0 {
        parts.push(Cow::Owned(format!("+{bonus}")));
    }
    parts.extend(qualities.iter().map(|quality| Cow::Borrowed(quality.name.as_str())));
    parts.push(Cow::Borrowed(base));
    parts.join(" ")
}

/// A catalog magic item taken verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremadeLoot<'a> {
    item: &'a PremadeItem,
    category: PremadeCategory,
    cost_cp: u64,
    rarity: Rarity,
}

impl<'a> PremadeLoot<'a> {
    /// Wrap a purchasable premade entry; `None` if it has no price.
    #[must_use]
    pub fn new(item: &'a PremadeItem, category: PremadeCategory) -> Option<Self> {
        let cost_cp = item.cost_cp.filter(|cost| *cost > 0)?;
        Some(Self {
            item,
            category,
            cost_cp,
            rarity: classify(cost_cp),
        })
    }

    #[must_use]
    pub const fn item(&self) -> &'a PremadeItem {
        self.item
    }

    #[must_use]
    pub const fn category(&self) -> PremadeCategory {
        self.category
    }
}

impl Appraised for PremadeLoot<'_> {
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.item.name)
    }

    fn cost_cp(&self) -> u64 {
        self.cost_cp
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }
}

/// One slot of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LootItem<'a> {
    Generated(GeneratedItem<'a>),
    Premade(PremadeLoot<'a>),
}

impl LootItem<'_> {
    /// Catalog category key the item was drawn from.
    #[must_use]
    pub const fn category_key(&self) -> &'static str {
        match self {
            Self::Generated(item) => item.category.as_str(),
            Self::Premade(item) => item.category.as_str(),
        }
    }

    #[must_use]
    pub const fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

impl Appraised for LootItem<'_> {
    fn display_name(&self) -> Cow<'_, str> {
        match self {
            Self::Generated(item) => item.display_name(),
            Self::Premade(item) => item.display_name(),
        }
    }

    fn cost_cp(&self) -> u64 {
        match self {
            Self::Generated(item) => item.cost_cp(),
            Self::Premade(item) => item.cost_cp(),
        }
    }

    fn rarity(&self) -> Rarity {
        match self {
            Self::Generated(item) => item.rarity(),
            Self::Premade(item) => item.rarity(),
        }
    }
}

/// Sum of the slot prices in copper.
#[must_use]
pub fn total_cost_cp(items: &[Arc<LootItem<'_>>]) -> u64 {
    items
        .iter()
        .map(|item| item.cost_cp())
        .fold(0, u64::saturating_add)
}

/// Ordered loot plus the configuration that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet<'a> {
    pub items: Vec<Arc<LootItem<'a>>>,
    pub total_value_cp: u64,
    pub config: GenerationConfig,
    pub generated_at: DateTime<Utc>,
}

/// Roll-up of a result set for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub item_count: usize,
    pub generated: usize,
    pub premade: usize,
    pub by_rarity: BTreeMap<Rarity, usize>,
    pub total_value_cp: u64,
    pub unspent_cp: u64,
}

impl<'a> ResultSet<'a> {
    #[must_use]
    pub fn new(items: Vec<Arc<LootItem<'a>>>, config: GenerationConfig) -> Self {
        Self {
            total_value_cp: total_cost_cp(&items),
            items,
            config,
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn empty(config: GenerationConfig) -> Self {
        Self::new(Vec::new(), config)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> ResultSummary {
        let mut by_rarity = BTreeMap::new();
        for item in &self.items {
            *by_rarity.entry(item.rarity()).or_insert(0) += 1;
        }
        let generated = self.items.iter().filter(|item| item.is_generated()).count();
        ResultSummary {
            item_count: self.items.len(),
            generated,
            premade: self.items.len() - generated,
            by_rarity,
            total_value_cp: self.total_value_cp,
            unspent_cp: self.config.budget_cp().saturating_sub(self.total_value_cp),
        }
    }
}
