//! Read-only reference catalog of base items, premade items and qualities.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::config::{GenerateCategory, PremadeCategory};
use crate::rarity::{Rarity, classify, tier_allowed};

/// Catalog prices are gold pieces in the document and copper in memory.
mod gold {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::numbers::{cp_to_gp, gp_to_cp};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<f64> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(gp_to_cp))
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(cp) => serializer.serialize_some(&cp_to_gp(*cp)),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Mechanical class of a base item; decides masterwork pricing and
/// whether the item can carry enhancements at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    Weapon,
    Armor,
    Shield,
    Gear,
}

impl ItemClass {
    #[must_use]
    pub const fn is_enhanceable(self) -> bool {
        !matches!(self, Self::Gear)
    }
}

/// Lookup key into the quality tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityKey {
    Melee,
    Ranged,
    Armor,
    Shield,
}

/// Shared view over catalog records that carry a price.
pub trait CatalogEntry {
    fn name(&self) -> &str;

    /// Price in copper; `None` when the entry cannot be bought.
    fn cost_cp(&self) -> Option<u64>;

    /// Entries with a missing or zero price never enter generation.
    fn purchasable_cost(&self) -> Option<u64> {
        self.cost_cp().filter(|cost| *cost > 0)
    }
}

/// Weapon, armor or mundane gear record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseItem {
    pub name: String,
    #[serde(rename = "cost", default, with = "gold")]
    pub cost_cp: Option<u64>,
    /// Weapon (`melee`/`ranged`) or armor (`light`/`shield`/...) subtype.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Damage profile, armor bonus and anything else the engine never reads.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl BaseItem {
    #[must_use]
    pub fn new(name: &str, cost_cp: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            cost_cp,
            subtype: None,
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: &str) -> Self {
        self.subtype = Some(subtype.to_string());
        self
    }

    fn subtype_is(&self, key: &str) -> bool {
        self.subtype
            .as_deref()
            .is_some_and(|subtype| subtype.eq_ignore_ascii_case(key))
    }

    /// Resolve the mechanical class from the category the item was drawn from.
    #[must_use]
    pub fn class_in(&self, category: GenerateCategory) -> ItemClass {
        match category {
            GenerateCategory::MundaneWeapons => ItemClass::Weapon,
            GenerateCategory::MundaneArmor if self.subtype_is("shield") => ItemClass::Shield,
            GenerateCategory::MundaneArmor => ItemClass::Armor,
            GenerateCategory::MundaneItems => ItemClass::Gear,
        }
    }

    /// Which quality table applies; gear has none.
    #[must_use]
    pub fn quality_key(&self, class: ItemClass) -> Option<QualityKey> {
        match class {
            ItemClass::Weapon if self.subtype_is("ranged") => Some(QualityKey::Ranged),
            ItemClass::Weapon => Some(QualityKey::Melee),
            ItemClass::Armor => Some(QualityKey::Armor),
            ItemClass::Shield => Some(QualityKey::Shield),
            ItemClass::Gear => None,
        }
    }
}

impl CatalogEntry for BaseItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost_cp(&self) -> Option<u64> {
        self.cost_cp
    }
}

/// Finished magic item with a fixed price; never enhanced further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremadeItem {
    pub name: String,
    #[serde(rename = "cost", default, with = "gold")]
    pub cost_cp: Option<u64>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl PremadeItem {
    #[must_use]
    pub fn new(name: &str, cost_cp: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            cost_cp,
            attributes: Map::new(),
        }
    }
}

impl CatalogEntry for PremadeItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn cost_cp(&self) -> Option<u64> {
        self.cost_cp
    }
}

/// How a quality is priced once its stored flag and value are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityPricing {
    /// Raises the effective enhancement bonus by this much.
    BonusEquivalent(u8),
    /// Fixed surcharge in copper.
    Flat(u64),
}

/// Weapon or armor special ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicQuality {
    pub name: String,
    pub is_bonus: bool,
    #[serde(default)]
    pub bonus_value: Option<u8>,
    #[serde(default, with = "gold")]
    pub flat_cost: Option<u64>,
}

impl MagicQuality {
    #[must_use]
    pub fn bonus(name: &str, value: u8) -> Self {
        Self {
            name: name.to_string(),
            is_bonus: true,
            bonus_value: Some(value),
            flat_cost: None,
        }
    }

    #[must_use]
    pub fn flat(name: &str, cost_cp: u64) -> Self {
        Self {
            name: name.to_string(),
            is_bonus: false,
            bonus_value: None,
            flat_cost: Some(cost_cp),
        }
    }

    /// `None` when the record is missing the field its flag points at.
    #[must_use]
    pub fn pricing(&self) -> Option<QualityPricing> {
        if self.is_bonus {
            self.bonus_value
                .filter(|value| *value > 0)
                .map(QualityPricing::BonusEquivalent)
        } else {
            self.flat_cost.map(QualityPricing::Flat)
        }
    }
}

/// Compatible qualities per weapon/armor subtype.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityTables {
    #[serde(default)]
    pub melee: Vec<MagicQuality>,
    #[serde(default)]
    pub ranged: Vec<MagicQuality>,
    #[serde(default)]
    pub armor: Vec<MagicQuality>,
    #[serde(default)]
    pub shield: Vec<MagicQuality>,
}

impl QualityTables {
    #[must_use]
    pub fn get(&self, key: QualityKey) -> &[MagicQuality] {
        match key {
            QualityKey::Melee => &self.melee,
            QualityKey::Ranged => &self.ranged,
            QualityKey::Armor => &self.armor,
            QualityKey::Shield => &self.shield,
        }
    }
}

/// The complete reference dataset, immutable for the duration of a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub mundane_weapons: Vec<BaseItem>,
    #[serde(default)]
    pub mundane_armor: Vec<BaseItem>,
    #[serde(default)]
    pub mundane_items: Vec<BaseItem>,
    #[serde(default)]
    pub magic_items: Vec<PremadeItem>,
    #[serde(default)]
    pub magic_weapons: Vec<PremadeItem>,
    #[serde(default)]
    pub magic_apparel: Vec<PremadeItem>,
    #[serde(default)]
    pub qualities: QualityTables,
}

/// Entry counts for one catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: &'static str,
    pub entries: usize,
    pub purchasable: usize,
}

/// Overview of a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub categories: Vec<CategoryStats>,
    pub qualities: usize,
}

impl Catalog {
    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the catalog shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn base_items(&self, category: GenerateCategory) -> &[BaseItem] {
        match category {
            GenerateCategory::MundaneWeapons => &self.mundane_weapons,
            GenerateCategory::MundaneArmor => &self.mundane_armor,
            GenerateCategory::MundaneItems => &self.mundane_items,
        }
    }

    #[must_use]
    pub fn premade_items(&self, category: PremadeCategory) -> &[PremadeItem] {
        match category {
            PremadeCategory::MagicItems => &self.magic_items,
            PremadeCategory::MagicWeapons => &self.magic_weapons,
            PremadeCategory::MagicApparel => &self.magic_apparel,
        }
    }

    /// Qualities that may be attached to `item` of the given class.
    #[must_use]
    pub fn qualities_for(&self, item: &BaseItem, class: ItemClass) -> &[MagicQuality] {
        match item.quality_key(class) {
            Some(key) => self.qualities.get(key),
            None => &[],
        }
    }

    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        fn stats<T: CatalogEntry>(category: &'static str, items: &[T]) -> CategoryStats {
            CategoryStats {
                category,
                entries: items.len(),
                purchasable: purchasable(items).len(),
            }
        }

        let mut categories: Vec<CategoryStats> = GenerateCategory::ALL
            .into_iter()
            .map(|category| stats(category.as_str(), self.base_items(category)))
            .collect();
        categories.extend(
            PremadeCategory::ALL
                .into_iter()
                .map(|category| stats(category.as_str(), self.premade_items(category))),
        );
        let qualities = self.qualities.melee.len()
            + self.qualities.ranged.len()
            + self.qualities.armor.len()
            + self.qualities.shield.len();
        CatalogSummary {
            categories,
            qualities,
        }
    }
}

/// Keep only entries with a real, positive price.
pub fn purchasable<'a, T, I>(items: I) -> Vec<&'a T>
where
    T: CatalogEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| item.purchasable_cost().is_some())
        .collect()
}

/// Keep only purchasable entries priced at or below `ceiling_cp`.
pub fn within_budget<'a, T, I>(items: I, ceiling_cp: u64) -> Vec<&'a T>
where
    T: CatalogEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| {
            item.purchasable_cost()
                .is_some_and(|cost| cost <= ceiling_cp)
        })
        .collect()
}

/// Keep only purchasable entries whose own price falls in an allowed tier.
pub fn in_rarities<'a, T, I>(items: I, filter: &BTreeSet<Rarity>) -> Vec<&'a T>
where
    T: CatalogEntry + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .filter(|item| {
            item.purchasable_cost()
                .is_some_and(|cost| tier_allowed(filter, classify(cost)))
        })
        .collect()
}
