//! Rarity tiers derived from item cost.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::{COMMON_MAX_CP, RARE_MAX_CP, UNCOMMON_MAX_CP, VERY_RARE_MAX_CP};

/// Five ordered cost bands used for filtering and display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Self; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::VeryRare,
        Self::Legendary,
    ];

    /// Lowest cost (in copper) that lands in this tier.
    #[must_use]
    pub const fn band_min_cp(self) -> u64 {
        match self {
            Self::Common => 0,
            Self::Uncommon => COMMON_MAX_CP + 1,
            Self::Rare => UNCOMMON_MAX_CP + 1,
            Self::VeryRare => RARE_MAX_CP + 1,
            Self::Legendary => VERY_RARE_MAX_CP + 1,
        }
    }

    /// Inclusive upper bound in copper; `None` for the open-ended top tier.
    #[must_use]
    pub const fn band_max_cp(self) -> Option<u64> {
        match self {
            Self::Common => Some(COMMON_MAX_CP),
            Self::Uncommon => Some(UNCOMMON_MAX_CP),
            Self::Rare => Some(RARE_MAX_CP),
            Self::VeryRare => Some(VERY_RARE_MAX_CP),
            Self::Legendary => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::VeryRare => "very_rare",
            Self::Legendary => "legendary",
        }
    }

    /// Human-facing label, e.g. `Very Rare`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::VeryRare => "Very Rare",
            Self::Legendary => "Legendary",
        }
    }

    /// Parse the snake_case identifier used in configuration.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|tier| tier.as_str() == key)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a cost in copper to its rarity tier.
#[must_use]
pub const fn classify(cost_cp: u64) -> Rarity {
    if cost_cp <= COMMON_MAX_CP {
        Rarity::Common
    } else if cost_cp <= UNCOMMON_MAX_CP {
        Rarity::Uncommon
    } else if cost_cp <= RARE_MAX_CP {
        Rarity::Rare
    } else if cost_cp <= VERY_RARE_MAX_CP {
        Rarity::VeryRare
    } else {
        Rarity::Legendary
    }
}

/// Whether `tier` passes the filter. An empty filter admits every tier.
#[must_use]
pub fn tier_allowed(filter: &BTreeSet<Rarity>, tier: Rarity) -> bool {
    filter.is_empty() || filter.contains(&tier)
}

/// Sampling weight of a tier under a budget ceiling.
///
/// Tiers whose floor sits above the budget are unreachable (`None`).
#[must_use]
pub fn tier_weight(tier: Rarity, max_budget_cp: u64) -> Option<u64> {
    let min = tier.band_min_cp();
    if min > max_budget_cp {
        return None;
    }
    let top = tier
        .band_max_cp()
        .map_or(max_budget_cp, |max| max.min(max_budget_cp));
    Some(top.saturating_sub(min).max(1))
}

/// Pick a rarity tier reachable under `max_budget_cp`, weighting each tier
/// by how much of its band the budget covers.
///
/// Richer budgets skew toward higher tiers without excluding lower ones.
/// Returns `None` when no allowed tier is reachable.
pub fn weighted_rarity_pick<R: Rng + ?Sized>(
    max_budget_cp: u64,
    allowed: &BTreeSet<Rarity>,
    rng: &mut R,
) -> Option<Rarity> {
    let weighted: Vec<(Rarity, u64)> = Rarity::ALL
        .into_iter()
        .filter(|tier| tier_allowed(allowed, *tier))
        .filter_map(|tier| tier_weight(tier, max_budget_cp).map(|weight| (tier, weight)))
        .collect();
    let total: u64 = weighted.iter().map(|(_, weight)| *weight).sum();
    if total == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total);
    let mut current = 0;
    for (tier, weight) in &weighted {
        current += *weight;
        if roll < current {
            return Some(*tier);
        }
    }
    weighted.last().map(|(tier, _)| *tier)
}
