//! Seeded random stream
//!
//! Park-Miller "minimal standard" generator. The exact recurrence matters:
//! recorded action logs are only meaningful if every client reproduces the
//! same lane sequence for the same seed, so the arithmetic is fixed to
//! `state = state * 16807 mod (2^31 - 1)` on integers.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// Mersenne prime 2^31 - 1
pub const MODULUS: u64 = 2_147_483_647;
/// Multiplier of the minimal standard generator
pub const MULTIPLIER: u64 = 16_807;

/// Deterministic random stream shared by every randomized gameplay choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkMiller {
    state: u64,
}

impl ParkMiller {
    /// Create a stream from an arbitrary seed.
    ///
    /// The seed is reduced modulo 2^31 - 1; a zero residue is mapped to
    /// 2^31 - 2 since zero is a fixed point of the recurrence.
    pub fn new(seed: u64) -> Self {
        let mut state = seed % MODULUS;
        if state == 0 {
            state += MODULUS - 1;
        }
        Self { state }
    }

    /// Current internal state (always in 1..MODULUS)
    pub fn state(&self) -> u64 {
        self.state
    }

    fn advance(&mut self) -> u64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        self.state
    }

    /// Next value in [0, 1)
    pub fn next_unit(&mut self) -> f64 {
        let s = self.advance();
        (s - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Uniform index into a collection of `len` items
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index requires a non-empty range");
        let idx = (self.next_unit() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl RngCore for ParkMiller {
    fn next_u32(&mut self) -> u32 {
        // Raw states cover 1..2^31-1, so only the high 16 of their 31 bits
        // are taken from each of two draws
        let hi = self.advance() >> 15;
        let lo = self.advance() >> 15;
        ((hi << 16) | lo) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for ParkMiller {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::Rng;

    #[test]
    fn test_known_sequence() {
        // Seed 1 is the textbook start of the minimal standard sequence
        let mut rng = ParkMiller::new(1);
        assert_eq!(rng.advance(), 16_807);
        assert_eq!(rng.advance(), 282_475_249);
        assert_eq!(rng.advance(), 1_622_650_073);
    }

    #[test]
    fn test_rng_core_covers_every_bit() {
        let mut rng = ParkMiller::new(114_114);
        let mut or32 = 0u32;
        let mut or64 = 0u64;
        for _ in 0..10_000 {
            or32 |= rng.next_u32();
            or64 |= rng.next_u64();
        }
        assert_eq!(or32, u32::MAX);
        assert_eq!(or64, u64::MAX);

        let upper = (0..10_000)
            .filter(|_| rng.random::<u32>() >= 1 << 31)
            .count();
        assert!((4_000..6_000).contains(&upper), "upper half drawn {upper} times");
    }

    #[test]
    fn test_next_u32_packs_high_bits_of_two_draws() {
        let mut a = ParkMiller::new(1);
        let mut b = ParkMiller::new(1);
        let hi = b.advance() >> 15;
        let lo = b.advance() >> 15;
        assert_eq!(a.next_u32() as u64, (hi << 16) | lo);
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let rng = ParkMiller::new(0);
        assert_eq!(rng.state(), MODULUS - 1);
        let rng = ParkMiller::new(MODULUS);
        assert_eq!(rng.state(), MODULUS - 1);
    }

    #[test]
    fn test_unit_range() {
        let mut rng = ParkMiller::new(114_114);
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_seedable_matches_new() {
        let mut a = ParkMiller::seed_from_u64(42);
        let mut b = ParkMiller::new(42);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_sequence(seed in any::<u64>()) {
            let mut a = ParkMiller::new(seed);
            let mut b = ParkMiller::new(seed);
            for _ in 0..64 {
                prop_assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
            }
        }

        #[test]
        fn prop_pick_index_in_bounds(seed in any::<u64>(), len in 1usize..16) {
            let mut rng = ParkMiller::new(seed);
            for _ in 0..32 {
                prop_assert!(rng.pick_index(len) < len);
            }
        }
    }
}
