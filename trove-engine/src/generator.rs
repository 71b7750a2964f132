//! Budget-constrained hoard generation and single-slot rerolls.
//!
//! Each draw walks the same states: pick a source (generated base vs.
//! premade), pick an item, enhance it, attach qualities, then price it. The
//! result list only ever grows by items that fit the remaining budget, so
//! the budget invariant holds by construction.

use log::{debug, trace};
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::{BaseItem, Catalog, CatalogEntry, ItemClass, MagicQuality, QualityPricing};
use crate::config::{ConfigError, GenerationConfig};
use crate::constants::{LOG_TARGET_GENERATE, LOG_TARGET_REROLL, MAX_EFFECTIVE_BONUS, RETRY_FACTOR};
use crate::loot::{Appraised, GeneratedItem, LootItem, PremadeLoot, QualityList, ResultSet};
use crate::numbers::weight_from_len;
use crate::pool::ItemPool;
use crate::pricing::{enhancement_cost, masterwork_surcharge, max_affordable_bonus, quality_cost};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("slot {slot} is out of range for a result set of {len} items")]
    SlotOutOfRange { slot: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Generate,
    Premade,
}

/// Assemble a hoard within the configured budget and item-count window.
///
/// Unsatisfiable constraints degrade to a short or empty result rather
/// than an error.
///
/// # Errors
///
/// Returns an error if the configuration is outside its documented domain.
pub fn generate<'a, R>(
    catalog: &'a Catalog,
    config: &GenerationConfig,
    rng: &mut R,
) -> Result<ResultSet<'a>, GenerationError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    let budget = config.budget_cp();
    if budget == 0 {
        debug!(target: LOG_TARGET_GENERATE, "zero budget, returning empty hoard");
        return Ok(ResultSet::empty(config.clone()));
    }

    let range = config.item_count_range;
    let target = usize::try_from(rng.gen_range(range.min..=range.max)).unwrap_or(usize::MAX);
    let max_failures = target.saturating_mul(RETRY_FACTOR);
    let pool = ItemPool::build(catalog, config, budget);
    let cheapest = pool.cheapest_cp();
    debug!(
        target: LOG_TARGET_GENERATE,
        "generation start | budget_cp:{budget} target:{target} max_failures:{max_failures}"
    );

    let mut items: Vec<Arc<LootItem<'a>>> = Vec::with_capacity(target);
    let mut remaining = budget;
    let mut failures = 0_usize;
    while items.len() < target && remaining > 0 && failures < max_failures {
        if cheapest.is_none_or(|cost| cost > remaining) {
            debug!(
                target: LOG_TARGET_GENERATE,
                "stalled | remaining_cp:{remaining} items:{}",
                items.len()
            );
            break;
        }
        let source = pick_source(pool.generated_count(), pool.premade_count(), rng);
        match source.and_then(|source| draw(&pool, catalog, config, source, remaining, rng)) {
            Some(item) => {
                let cost = item.cost_cp();
                debug_assert!(cost <= remaining, "draw exceeded remaining budget");
                trace!(
                    target: LOG_TARGET_GENERATE,
                    "drew {} | cost_cp:{cost} remaining_cp:{}",
                    item.display_name(),
                    remaining - cost
                );
                remaining -= cost;
                items.push(Arc::new(item));
            }
            None => {
                failures += 1;
                trace!(target: LOG_TARGET_GENERATE, "failed draw {failures}/{max_failures}");
            }
        }
    }

    if failures >= max_failures {
        debug!(
            target: LOG_TARGET_GENERATE,
            "retry ceiling reached with {} of {target} items",
            items.len()
        );
    }
    Ok(ResultSet::new(items, config.clone()))
}

/// Replace the item at `slot` using the budget freed by removing it.
///
/// Every other slot is carried over untouched (same `Arc`). If no budget is
/// freed or nothing can be drawn, the slot is dropped instead.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or `slot` is out of range.
pub fn reroll_slot<'a, R>(
    catalog: &'a Catalog,
    config: &GenerationConfig,
    current: &[Arc<LootItem<'a>>],
    slot: usize,
    rng: &mut R,
) -> Result<ResultSet<'a>, GenerationError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    if slot >= current.len() {
        return Err(GenerationError::SlotOutOfRange {
            slot,
            len: current.len(),
        });
    }

    let others = current
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != slot)
        .map(|(_, item)| item.cost_cp())
        .fold(0_u64, u64::saturating_add);
    let freed = config.budget_cp().saturating_sub(others);

    let replacement = if freed == 0 {
        None
    } else {
        let pool = ItemPool::build(catalog, config, freed);
        reroll_source(&pool, rng)
            .and_then(|source| draw(&pool, catalog, config, source, freed, rng))
    };

    let mut items = current.to_vec();
    match replacement {
        Some(item) => {
            debug!(
                target: LOG_TARGET_REROLL,
                "slot {slot} rerolled | freed_cp:{freed} new:{} cost_cp:{}",
                item.display_name(),
                item.cost_cp()
            );
            items[slot] = Arc::new(item);
        }
        None => {
            debug!(target: LOG_TARGET_REROLL, "slot {slot} dropped | freed_cp:{freed}");
            items.remove(slot);
        }
    }
    Ok(ResultSet::new(items, config.clone()))
}

/// Cardinality-weighted choice between the generated and premade pools.
fn pick_source<R: Rng + ?Sized>(generated: usize, premade: usize, rng: &mut R) -> Option<Source> {
    let generated = weight_from_len(generated);
    let total = generated.saturating_add(weight_from_len(premade));
    if total == 0 {
        return None;
    }
    if rng.gen_range(0..total) < generated {
        Some(Source::Generate)
    } else {
        Some(Source::Premade)
    }
}

/// Even odds when both pools have entries, otherwise whichever does.
fn reroll_source<R: Rng + ?Sized>(pool: &ItemPool<'_>, rng: &mut R) -> Option<Source> {
    match (pool.generated.is_empty(), pool.premade.is_empty()) {
        (false, false) if rng.gen_bool(0.5) => Some(Source::Generate),
        (false, false) | (true, false) => Some(Source::Premade),
        (false, true) => Some(Source::Generate),
        (true, true) => None,
    }
}

fn draw<'a, R: Rng + ?Sized>(
    pool: &ItemPool<'a>,
    catalog: &'a Catalog,
    config: &GenerationConfig,
    source: Source,
    remaining: u64,
    rng: &mut R,
) -> Option<LootItem<'a>> {
    match source {
        Source::Generate => {
            generate_from_base(pool, catalog, config, remaining, rng).map(LootItem::Generated)
        }
        Source::Premade => draw_premade(pool, remaining, rng).map(LootItem::Premade),
    }
}

fn choose_weighted<R: Rng + ?Sized>(weights: &[u64], rng: &mut R) -> Option<usize> {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let roll = rng.gen_range(0..total);
    let mut current = 0;
    for (index, weight) in weights.iter().enumerate() {
        current += *weight;
        if roll < current {
            return Some(index);
        }
    }
    None
}

fn generate_from_base<'a, R: Rng + ?Sized>(
    pool: &ItemPool<'a>,
    catalog: &'a Catalog,
    config: &GenerationConfig,
    remaining: u64,
    rng: &mut R,
) -> Option<GeneratedItem<'a>> {
    let weights: Vec<u64> = pool
        .generated
        .iter()
        .map(|bucket| weight_from_len(bucket.items.len()))
        .collect();
    let bucket = &pool.generated[choose_weighted(&weights, rng)?];

    let affordable: Vec<&'a BaseItem> = bucket
        .items
        .iter()
        .copied()
        .filter(|item| item.purchasable_cost().is_some_and(|cost| cost <= remaining))
        .collect();
    let base = *affordable.choose(rng)?;
    let base_cost = base.purchasable_cost()?;

    let class = base.class_in(bucket.category);
    let (bonus, qualities) = if class.is_enhanceable() {
        enhance(catalog, base, class, config, remaining - base_cost, rng)
    } else {
        (0, QualityList::new())
    };
    Some(GeneratedItem::new(base, bucket.category, bonus, qualities))
}

/// Draw an enhancement bonus and qualities that fit in `available`.
fn enhance<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    base: &'a BaseItem,
    class: ItemClass,
    config: &GenerationConfig,
    available: u64,
    rng: &mut R,
) -> (u8, QualityList<'a>) {
    let Some(after_masterwork) = available.checked_sub(masterwork_surcharge(class)) else {
        return (0, QualityList::new());
    };
    let max_bonus = max_affordable_bonus(after_masterwork).min(config.max_enhancement_bonus);
    if max_bonus == 0 {
        return (0, QualityList::new());
    }

    let bonus = rng.gen_range(1..=max_bonus);
    let mut remaining = after_masterwork - enhancement_cost(bonus);
    let qualities = attach_qualities(
        catalog.qualities_for(base, class),
        bonus,
        config.max_magic_attributes,
        &mut remaining,
        rng,
    );
    (bonus, qualities)
}

/// Greedily attach a shuffled selection of qualities.
///
/// A quality is skipped when it would push the effective bonus past the
/// ruleset cap or its marginal cost exceeds what is left.
fn attach_qualities<'a, R: Rng + ?Sized>(
    candidates: &'a [MagicQuality],
    bonus: u8,
    cap: u8,
    remaining: &mut u64,
    rng: &mut R,
) -> QualityList<'a> {
    let mut chosen = QualityList::new();
    if cap == 0 || candidates.is_empty() {
        return chosen;
    }

    let mut shuffled: Vec<&'a MagicQuality> = candidates.iter().collect();
    shuffled.shuffle(rng);

    let mut effective = bonus;
    for quality in shuffled {
        if chosen.len() >= usize::from(cap) {
            break;
        }
        let Some(pricing) = quality.pricing() else {
            continue;
        };
        if let QualityPricing::BonusEquivalent(delta) = pricing
            && effective.saturating_add(delta) > MAX_EFFECTIVE_BONUS
        {
            continue;
        }
        let Some(cost) = quality_cost(quality, effective) else {
            continue;
        };
        if cost > *remaining {
            continue;
        }
        *remaining -= cost;
        if let QualityPricing::BonusEquivalent(delta) = pricing {
            effective += delta;
        }
        chosen.push(quality);
    }
    chosen
}

fn draw_premade<'a, R: Rng + ?Sized>(
    pool: &ItemPool<'a>,
    remaining: u64,
    rng: &mut R,
) -> Option<PremadeLoot<'a>> {
    let affordable = pool.affordable_premade(remaining);
    let &(category, item) = affordable.choose(rng)?;
    PremadeLoot::new(item, category)
}
