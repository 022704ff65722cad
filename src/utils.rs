use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, SeedableRng};

/// Builds the random source of an engine.
///
/// # Parameters
/// - `seed`: `Some(value)` gives a reproducible sequence. `None` seeds from the
///           current time, so two engines created apart draw different moves.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng{
    StdRng::seed_from_u64(seed.unwrap_or_else(time_seed))
}

/// A seed taken from the system clock.
pub fn time_seed() -> u64{
    SystemTime::now().duration_since(UNIX_EPOCH)
        .map(|elapsed| (elapsed.as_nanos() % u64::MAX as u128) as u64)
        .unwrap_or_default()
}

/// Derives the seed of worker `index` from a shared base seed.
///
/// Workers of a parallel search must not replay the same playouts, so each
/// gets a distinct, still reproducible, seed.
#[inline]
pub fn worker_seed(base: u64, index: usize) -> u64{
    base.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
