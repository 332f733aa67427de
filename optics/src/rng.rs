//! Random Number Generator.

use crate::common::*;

/// 64-bit precision value for 1 - epsilon.
pub const DOUBLE_ONE_MINUS_EPSILON: f64 = hexf64!("0x1.fffffffffffffp-1"); // 0.99999999999999989

/// 1 - epsilon in the precision we've selected for `Float`.
pub const ONE_MINUS_EPSILON: Float = DOUBLE_ONE_MINUS_EPSILON;

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// Implements the PCG32 pseudo-random number generator. Each sequence index
/// selects an independent stream, so concurrent simulations seeded with
/// distinct indices never share random numbers.
#[derive(Clone)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Return a new instance of `RNG` with default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` by seeding it with the given starting sequence.
    ///
    /// * `sequence_index` - The starting sequence to seed with.
    pub fn new(sequence_index: u64) -> Self {
        let mut ret = Self { state: 0, inc: 0 };
        ret.set_sequence(sequence_index);
        ret
    }

    /// Initialize the random number generator sequence.
    ///
    /// * `init_seq` - The starting sequence to seed with.
    #[inline(always)]
    fn set_sequence(&mut self, init_seq: u64) {
        self.state = 0;
        self.inc = init_seq.wrapping_shl(1) | 1;
        let _ = self.uniform_u32();

        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        let _ = self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;

        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value over the half open interval [0.0, 1.0)
    /// with 53 bits of precision.
    #[inline]
    pub fn uniform_float(&mut self) -> Float {
        let hi = self.uniform_u32() as u64;
        let lo = self.uniform_u32() as u64;
        let bits = ((hi << 32) | lo) >> 11;
        (bits as Float * hexf64!("0x1.0p-53")).min(ONE_MINUS_EPSILON)
    }

    /// Returns a uniformly distributed value over the half open interval
    /// [low, high).
    ///
    /// * `low`  - The lower bound.
    /// * `high` - The upper bound.
    #[inline]
    pub fn uniform_range(&mut self, low: Float, high: Float) -> Float {
        lerp(self.uniform_float(), low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_sequence_same_values() {
        let mut a = RNG::new(7);
        let mut b = RNG::new(7);
        for _ in 0..100 {
            assert_eq!(a.uniform_u32(), b.uniform_u32());
        }
    }

    #[test]
    fn distinct_sequences_differ() {
        let mut a = RNG::new(1);
        let mut b = RNG::new(2);
        let va: Vec<u32> = (0..16).map(|_| a.uniform_u32()).collect();
        let vb: Vec<u32> = (0..16).map(|_| b.uniform_u32()).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn uniform_float_mean() {
        let mut rng = RNG::new(42);
        let n = 100_000;
        let mean = (0..n).map(|_| rng.uniform_float()).sum::<Float>() / n as Float;
        assert!((mean - 0.5).abs() < 0.01, "mean = {mean}");
    }

    proptest! {
        #[test]
        fn uniform_float_half_open(seed in 0..10_000u64) {
            let mut rng = RNG::new(seed);
            for _ in 0..64 {
                let u = rng.uniform_float();
                prop_assert!((0.0..1.0).contains(&u));
            }
        }

        #[test]
        fn uniform_range_bounds(seed in 0..10_000u64, low in -10.0..0.0f64, span in 0.001..10.0f64) {
            let mut rng = RNG::new(seed);
            let high = low + span;
            for _ in 0..64 {
                let v = rng.uniform_range(low, high);
                prop_assert!(v >= low && v <= high);
            }
        }
    }
}
