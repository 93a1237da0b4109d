//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in the engine flows through generators created here and is
//! passed explicitly to the functions that need it. The text model's sampler
//! gets its own seed derived from the same base seed, so one request seed
//! fixes every random source.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Resolves the base seed for a request.
///
/// A request seed is reinterpreted bit-for-bit as `u64`; without one, a fresh
/// seed is drawn from the thread RNG.
pub fn base_seed(request_seed: Option<i64>) -> u64 {
    match request_seed {
        Some(seed) => seed as u64,
        None => rand::random(),
    }
}

/// Derives a seed for a named component from the base seed.
///
/// Uses BLAKE3 over the base seed (little-endian) followed by the component
/// key, truncated to 32 bits.
///
/// # Arguments
/// * `base_seed` - The request's base seed
/// * `key` - A string identifier for the component (e.g., "model")
pub fn derive_component_seed(base_seed: u64, key: &str) -> u32 {
    let mut input = Vec::with_capacity(8 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);

    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.as_bytes()[0..4]);
    u32::from_le_bytes(bytes)
}
