/// Test data generators

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random walk of fixed-point prices, never dropping below 1
pub fn random_walk(seed: u64, start: u64, steps: usize, max_step: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut prices = Vec::with_capacity(steps);
    let mut price = start;
    for _ in 0..steps {
        let step = rng.gen_range(0..=max_step);
        if rng.gen_bool(0.5) {
            price = price.saturating_add(step);
        } else {
            price = price.saturating_sub(step).max(1);
        }
        prices.push(price);
    }
    prices
}

/// Strictly rising series: start, start + step, ...
pub fn rising_series(start: u64, step: u64, len: usize) -> Vec<u64> {
    (0..len as u64).map(|i| start + i * step).collect()
}

/// Strictly falling series, saturating at 1
pub fn falling_series(start: u64, step: u64, len: usize) -> Vec<u64> {
    (0..len as u64)
        .map(|i| start.saturating_sub(i * step).max(1))
        .collect()
}

/// Proptest strategy for plausible 8-decimal fixed-point prices
pub fn price_strategy() -> impl Strategy<Value = u64> {
    // a cent up to ten million units
    1_000_000u64..1_000_000_000_000_000u64
}

/// Proptest strategy for order amounts that never overflow notional math
pub fn amount_strategy() -> impl Strategy<Value = u64> {
    1u64..1_000_000_000u64
}
