//! Clamping and dice helpers shared by every model type.

use rand::Rng;

/// Clamp a percentage-style stat to `0..=100`.
pub fn clamp_pct(value: i32) -> i32 {
    value.clamp(0, 100)
}

/// True with probability `1/n`. `n <= 1` always succeeds.
pub fn one_in(rng: &mut impl Rng, n: u32) -> bool {
    n <= 1 || rng.random_range(1..=n) == 1
}

/// Roll a d100 and succeed when the roll is at or under `chance`.
pub fn roll_percent(rng: &mut impl Rng, chance: i32) -> bool {
    rng.random_range(1..=100) <= chance
}

/// Pick a uniformly random element of a non-empty slice.
pub fn pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}
