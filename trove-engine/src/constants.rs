//! Centralized pricing and tuning constants for treasure generation.
//!
//! All monetary values are copper pieces. Keeping them together ensures the
//! ruleset approximation can only be adjusted via reviewed code changes,
//! never through the catalog document.

// Money -------------------------------------------------------------------
pub const CP_PER_GP: u64 = 100;

// Enhancement -------------------------------------------------------------
/// Cost of a +1 bonus; higher bonuses scale with the square.
pub const ENHANCEMENT_COST_UNIT_CP: u64 = 2_000 * CP_PER_GP;
pub const MAX_ENHANCEMENT_BONUS: u8 = 9;
/// Ruleset cap on enhancement plus bonus-equivalent qualities.
pub const MAX_EFFECTIVE_BONUS: u8 = 10;
pub const MAX_MAGIC_ATTRIBUTES: u8 = 5;

// Masterwork --------------------------------------------------------------
pub const MASTERWORK_WEAPON_CP: u64 = 300 * CP_PER_GP;
pub const MASTERWORK_ARMOR_CP: u64 = 150 * CP_PER_GP;
pub const MASTERWORK_SHIELD_CP: u64 = 150 * CP_PER_GP;

// Rarity bands (inclusive upper bounds) -----------------------------------
pub const COMMON_MAX_CP: u64 = 100 * CP_PER_GP;
pub const UNCOMMON_MAX_CP: u64 = 500 * CP_PER_GP;
pub const RARE_MAX_CP: u64 = 2_000 * CP_PER_GP;
pub const VERY_RARE_MAX_CP: u64 = 10_000 * CP_PER_GP;

// Generation loop ---------------------------------------------------------
/// Failed draws allowed per targeted item before generation gives up.
pub const RETRY_FACTOR: usize = 10;

// Configuration defaults --------------------------------------------------
pub(crate) const DEFAULT_MAX_COIN_VALUE: u64 = 5_000;
pub(crate) const DEFAULT_MIN_ITEMS: u32 = 1;
pub(crate) const DEFAULT_MAX_ITEMS: u32 = 5;
pub(crate) const DEFAULT_MAX_MAGIC_ATTRIBUTES: u8 = 2;
pub(crate) const DEFAULT_MAX_ENHANCEMENT_BONUS: u8 = 5;

// Seed domains ------------------------------------------------------------
pub const SEED_DOMAIN_GENERATE: &[u8] = b"trove.generate";
pub const SEED_DOMAIN_REROLL: &[u8] = b"trove.reroll";

// Logging targets ---------------------------------------------------------
pub(crate) const LOG_TARGET_GENERATE: &str = "trove::generate";
pub(crate) const LOG_TARGET_REROLL: &str = "trove::reroll";
pub(crate) const LOG_TARGET_POOL: &str = "trove::pool";
