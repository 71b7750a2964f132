use std::collections::BTreeSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use trove_engine::constants::{CP_PER_GP, MAX_EFFECTIVE_BONUS};
use trove_engine::{
    Appraised, Catalog, CatalogEntry, GenerateCategory, GenerationConfig, LootItem,
    PremadeCategory, Rarity, classify, generate, loot_rng, reroll_slot,
};

const CATALOG_JSON: &str = include_str!("../../assets/data/catalog.json");
const SEEDS: u64 = 300;

fn catalog() -> Catalog {
    Catalog::from_json(CATALOG_JSON).expect("bundled catalog parses")
}

fn unpriced_names(catalog: &Catalog) -> BTreeSet<String> {
    let bases = GenerateCategory::ALL
        .into_iter()
        .flat_map(|category| catalog.base_items(category))
        .filter(|item| item.purchasable_cost().is_none())
        .map(|item| item.name.clone());
    let premade = PremadeCategory::ALL
        .into_iter()
        .flat_map(|category| catalog.premade_items(category))
        .filter(|item| item.purchasable_cost().is_none())
        .map(|item| item.name.clone());
    bases.chain(premade).collect()
}

fn base_name<'a>(item: &'a LootItem<'_>) -> &'a str {
    match item {
        LootItem::Generated(item) => &item.base().name,
        LootItem::Premade(item) => &item.item().name,
    }
}

fn configs() -> Vec<GenerationConfig> {
    vec![
        GenerationConfig::default(),
        GenerationConfig::default()
            .with_budget(250)
            .with_item_range(1, 10),
        GenerationConfig::default()
            .with_budget(40_000)
            .with_premade(PremadeCategory::ALL)
            .with_item_range(2, 8)
            .with_max_enhancement_bonus(9)
            .with_max_magic_attributes(5),
        GenerationConfig::default()
            .with_budget(150_000)
            .with_generate([GenerateCategory::MundaneArmor])
            .with_premade([PremadeCategory::MagicApparel])
            .with_max_enhancement_bonus(5)
            .with_max_magic_attributes(3),
        GenerationConfig::default()
            .with_budget(12_000)
            .with_rarities([Rarity::Rare, Rarity::VeryRare]),
    ]
}

#[test]
fn hoards_hold_every_generation_property() {
    let catalog = catalog();
    let unpriced = unpriced_names(&catalog);
    assert!(!unpriced.is_empty(), "fixture should carry unpriced entries");

    for config in configs() {
        let allowed: BTreeSet<&str> = config
            .generate_categories
            .iter()
            .map(|category| category.as_str())
            .chain(config.include_premade.iter().map(|category| category.as_str()))
            .collect();
        for seed in 0..SEEDS {
            let mut rng = SmallRng::seed_from_u64(seed);
            let result = generate(&catalog, &config, &mut rng).unwrap();

            let sum: u64 = result.items.iter().map(|item| item.cost_cp()).sum();
            assert_eq!(sum, result.total_value_cp);
            assert!(
                result.total_value_cp <= config.budget_cp(),
                "seed {seed}: {} > {}",
                result.total_value_cp,
                config.budget_cp()
            );
            assert!(result.len() <= config.item_count_range.max as usize);

            for item in &result.items {
                assert_eq!(item.rarity(), classify(item.cost_cp()));
                assert!(item.cost_cp() > 0);
                assert!(allowed.contains(item.category_key()));
                assert!(!unpriced.contains(base_name(item)));
                if let LootItem::Generated(generated) = item.as_ref() {
                    assert!(generated.effective_bonus() <= MAX_EFFECTIVE_BONUS);
                    assert!(generated.enhancement_bonus() <= config.max_enhancement_bonus);
                    assert!(
                        generated.qualities().len() <= usize::from(config.max_magic_attributes)
                    );
                }
                if !config.rarity_filter.is_empty() {
                    let entry_cost = match item.as_ref() {
                        LootItem::Generated(generated) => generated.base().cost_cp,
                        LootItem::Premade(premade) => premade.item().cost_cp,
                    };
                    let entry_tier = classify(entry_cost.unwrap_or_default());
                    assert!(config.rarity_filter.contains(&entry_tier));
                }
            }
        }
    }
}

#[test]
fn zero_budget_is_always_empty() {
    let catalog = catalog();
    let config = GenerationConfig::default()
        .with_budget(0)
        .with_premade(PremadeCategory::ALL);
    for seed in 0..50 {
        let result = generate(&catalog, &config, &mut SmallRng::seed_from_u64(seed)).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_value_cp, 0);
    }
}

#[test]
fn single_bonus_weapons_price_exactly_and_fit_cumulatively() {
    let catalog = catalog();
    let config = GenerationConfig::default()
        .with_budget(2_000)
        .with_generate([GenerateCategory::MundaneWeapons])
        .with_max_enhancement_bonus(1)
        .with_item_range(1, 5);
    for seed in 0..SEEDS {
        let result = generate(&catalog, &config, &mut SmallRng::seed_from_u64(seed)).unwrap();
        assert!(result.total_value_cp <= 2_000 * CP_PER_GP);
        for item in &result.items {
            let LootItem::Generated(weapon) = item.as_ref() else {
                panic!("only mundane weapons are enabled");
            };
            assert_eq!(weapon.category(), GenerateCategory::MundaneWeapons);
            let base = weapon.base().cost_cp.unwrap();
            // 2000 gp alone cannot cover masterwork plus a +1.
            assert_eq!(weapon.enhancement_bonus(), 0);
            assert_eq!(weapon.cost_cp(), base);
        }
    }

    let roomy = config.clone().with_budget(5_000).with_max_magic_attributes(0);
    let mut enhanced = 0;
    for seed in 0..SEEDS {
        let result = generate(&catalog, &roomy, &mut SmallRng::seed_from_u64(seed)).unwrap();
        assert!(result.total_value_cp <= 5_000 * CP_PER_GP);
        for item in &result.items {
            if let LootItem::Generated(weapon) = item.as_ref()
                && weapon.enhancement_bonus() == 1
            {
                enhanced += 1;
                let base = weapon.base().cost_cp.unwrap();
                assert_eq!(weapon.cost_cp(), base + (2_000 + 300) * CP_PER_GP);
            }
        }
    }
    assert!(enhanced > 0);
}

#[test]
fn legendary_only_under_five_thousand_is_empty() {
    let catalog = catalog();
    let config = GenerationConfig::default()
        .with_budget(5_000)
        .with_premade(PremadeCategory::ALL)
        .with_rarities([Rarity::Legendary]);
    for seed in 0..100 {
        let result = generate(&catalog, &config, &mut SmallRng::seed_from_u64(seed)).unwrap();
        assert!(result.is_empty(), "seed {seed}");
    }
}

#[test]
fn flat_qualities_never_overdraw_the_budget() {
    let catalog = catalog();
    // A +1 chain shirt leaves far less than Glamered's 2700 gp.
    let config = GenerationConfig::default()
        .with_budget(4_000)
        .with_generate([GenerateCategory::MundaneArmor])
        .with_max_enhancement_bonus(1)
        .with_max_magic_attributes(5)
        .with_item_range(1, 1);
    for seed in 0..SEEDS {
        let result = generate(&catalog, &config, &mut SmallRng::seed_from_u64(seed)).unwrap();
        for item in &result.items {
            let LootItem::Generated(armor) = item.as_ref() else {
                continue;
            };
            assert!(armor.qualities().iter().all(|quality| quality.is_bonus));
            assert!(armor.cost_cp() <= 4_000 * CP_PER_GP);
        }
    }
}

#[test]
fn reroll_fits_exactly_the_freed_budget() {
    let catalog = catalog();
    let base = GenerationConfig::default()
        .with_budget(20_000)
        .with_premade(PremadeCategory::ALL)
        .with_item_range(3, 3);
    let mut checked = 0;
    for seed in 0..SEEDS {
        let mut rng = loot_rng(seed, b"integration.generate");
        let original = generate(&catalog, &base, &mut rng).unwrap();
        if original.len() < 2 {
            continue;
        }
        let slot = (seed as usize) % original.len();
        let freed = original.items[slot].cost_cp();
        let others = original.total_value_cp - freed;
        let budget_gp = (others + freed).div_ceil(CP_PER_GP);
        // Tighten the budget so removing the slot frees as close to its cost as gp allows.
        let tight = base.clone().with_budget(budget_gp);
        let ceiling = tight.budget_cp() - others;

        let rerolled = reroll_slot(&catalog, &tight, &original.items, slot, &mut rng).unwrap();
        assert!(rerolled.total_value_cp <= tight.budget_cp());
        if rerolled.len() == original.len() {
            assert!(rerolled.items[slot].cost_cp() <= ceiling);
            for (index, item) in rerolled.items.iter().enumerate() {
                if index != slot {
                    assert!(Arc::ptr_eq(item, &original.items[index]));
                }
            }
        } else {
            assert_eq!(rerolled.len(), original.len() - 1);
        }
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn repeated_rerolls_stay_within_budget() {
    let catalog = catalog();
    let config = GenerationConfig::default()
        .with_budget(8_000)
        .with_premade(PremadeCategory::ALL)
        .with_item_range(4, 6)
        .with_max_enhancement_bonus(3);
    for seed in 0..60 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut current = generate(&catalog, &config, &mut rng).unwrap();
        for round in 0..10 {
            if current.is_empty() {
                break;
            }
            let slot = round % current.len();
            let next = reroll_slot(&catalog, &config, &current.items, slot, &mut rng).unwrap();
            assert!(next.total_value_cp <= config.budget_cp());
            assert!(next.len() + 1 >= current.len());
            current = next;
        }
    }
}
