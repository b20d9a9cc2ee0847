// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The random source behind every draw.
//!
//! All randomness in the engine flows through a `Lottery` passed in by the
//! caller. Tests use `Lottery::seeded` so that quota draws, order draws and
//! redistribution are reproducible; production callers use
//! `Lottery::from_entropy`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};

/// An injected random number source.
pub struct Lottery {
    seed: u64,
    rng: StdRng,
}

impl Lottery {
    /// Creates a reproducible lottery from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a lottery from a freshly drawn seed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    /// The seed this lottery was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffles `items` uniformly in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Picks one element uniformly, or `None` if `items` is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl std::fmt::Debug for Lottery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lottery").field("seed", &self.seed).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_shuffle() {
        let mut a: Lottery = Lottery::seeded(7);
        let mut b: Lottery = Lottery::seeded(7);

        let mut left: Vec<u32> = (0..20).collect();
        let mut right: Vec<u32> = (0..20).collect();
        a.shuffle(&mut left);
        b.shuffle(&mut right);

        assert_eq!(left, right);
        assert_eq!(a.seed(), 7);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut lottery: Lottery = Lottery::seeded(99);
        let mut items: Vec<u32> = (0..50).collect();
        lottery.shuffle(&mut items);
        items.sort_unstable();

        assert_eq!(items, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_pick_from_empty_is_none() {
        let mut lottery: Lottery = Lottery::seeded(1);
        let empty: [u8; 0] = [];

        assert!(lottery.pick(&empty).is_none());
        assert_eq!(lottery.pick(&[4]), Some(&4));
    }
}
