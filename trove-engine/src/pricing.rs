//! Pure cost functions for enhancements, qualities and finished items.
//!
//! Nothing in here draws randomness or holds state: the same inputs always
//! price to the same copper amount.

use crate::catalog::{BaseItem, CatalogEntry, ItemClass, MagicQuality, QualityPricing};
use crate::constants::{
    ENHANCEMENT_COST_UNIT_CP, MASTERWORK_ARMOR_CP, MASTERWORK_SHIELD_CP, MASTERWORK_WEAPON_CP,
    MAX_ENHANCEMENT_BONUS,
};

/// Price of an effective bonus: `bonus² × 2000 gp`.
#[must_use]
pub const fn enhancement_cost(bonus: u8) -> u64 {
    let bonus = bonus as u64;
    bonus * bonus * ENHANCEMENT_COST_UNIT_CP
}

/// Largest enhancement bonus whose price fits in `budget_cp`.
#[must_use]
pub const fn max_affordable_bonus(budget_cp: u64) -> u8 {
    let mut bonus = MAX_ENHANCEMENT_BONUS;
    while bonus > 0 {
        if enhancement_cost(bonus) <= budget_cp {
            return bonus;
        }
        bonus -= 1;
    }
    0
}

/// Cost of adding `quality` to an item already at `current_effective`.
///
/// Bonus-equivalent qualities are priced at the marginal step of the
/// enhancement curve, never at their value in isolation. Returns `None`
/// for qualities missing their priced field.
#[must_use]
pub fn quality_cost(quality: &MagicQuality, current_effective: u8) -> Option<u64> {
    match quality.pricing()? {
        QualityPricing::BonusEquivalent(delta) => {
            let next = current_effective.saturating_add(delta);
            Some(enhancement_cost(next) - enhancement_cost(current_effective))
        }
        QualityPricing::Flat(cost) => Some(cost),
    }
}

/// Fixed masterwork fee for the item class; gear is never masterworked.
#[must_use]
pub const fn masterwork_surcharge(class: ItemClass) -> u64 {
    match class {
        ItemClass::Weapon => MASTERWORK_WEAPON_CP,
        ItemClass::Armor => MASTERWORK_ARMOR_CP,
        ItemClass::Shield => MASTERWORK_SHIELD_CP,
        ItemClass::Gear => 0,
    }
}

/// Enhancement plus every bonus-equivalent quality.
#[must_use]
pub fn effective_bonus(enhancement: u8, qualities: &[&MagicQuality]) -> u8 {
    qualities
        .iter()
        .filter_map(|quality| match quality.pricing() {
            Some(QualityPricing::BonusEquivalent(delta)) => Some(delta),
            _ => None,
        })
        .fold(enhancement, u8::saturating_add)
}

/// Full price of a generated item.
///
/// Base cost (zero if unpriced) + enhancement cost of the effective bonus
/// + flat quality surcharges + masterwork when the item is enhanced.
#[must_use]
pub fn total_item_cost(
    base: &BaseItem,
    class: ItemClass,
    enhancement: u8,
    qualities: &[&MagicQuality],
) -> u64 {
    let base_cost = base.cost_cp().unwrap_or(0);
    let effective = effective_bonus(enhancement, qualities);
    let flat: u64 = qualities
        .iter()
        .filter_map(|quality| match quality.pricing() {
            Some(QualityPricing::Flat(cost)) => Some(cost),
            _ => None,
        })
        .sum();
    let masterwork = if enhancement > 0 {
        masterwork_surcharge(class)
    } else {
        0
    };
    base_cost
        .saturating_add(enhancement_cost(effective))
        .saturating_add(flat)
        .saturating_add(masterwork)
}
