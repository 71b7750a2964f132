//! Reproducible random streams derived from a single user-visible seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Derive an independent 64-bit seed for `domain_tag` from `user_seed`.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    // HMAC accepts keys of any length, so construction cannot fail.
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Random stream for one concern (generation, rerolls, ...) of a hoard.
#[must_use]
pub fn loot_rng(user_seed: u64, domain_tag: &[u8]) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(derive_stream_seed(user_seed, domain_tag))
}

/// Fresh seed from OS entropy for callers that did not pick one.
#[must_use]
pub fn entropy_seed() -> u64 {
    rand::random()
}
