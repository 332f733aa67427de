//! Termination Policy

use optics::Float;

/// Default relative shot noise required at both detectors.
pub const DEFAULT_SHOT_NOISE_THRESHOLD: Float = 0.01;

/// Stops a run once the relative shot noise `sqrt(N)/N` of both detector
/// totals is at most `threshold`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShotNoise {
    /// Largest accepted `sqrt(N)/N`.
    pub threshold: Float,
}

impl Default for ShotNoise {
    fn default() -> Self {
        Self::new(DEFAULT_SHOT_NOISE_THRESHOLD)
    }
}

impl ShotNoise {
    /// Create a new `ShotNoise` policy.
    ///
    /// * `threshold` - Relative noise level.
    pub fn new(threshold: Float) -> Self {
        Self { threshold }
    }

    /// Returns `true` if another round is needed. A zero total always needs
    /// another round.
    ///
    /// * `total1` - Detector 1 total.
    /// * `total2` - Detector 2 total.
    pub fn should_continue(&self, total1: Float, total2: Float) -> bool {
        !(self.converged(total1) && self.converged(total2))
    }

    fn converged(&self, total: Float) -> bool {
        total > 0.0 && total.sqrt() / total <= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn crossover_at_ten_thousand() {
        let policy = ShotNoise::default();
        assert!(!policy.should_continue(10_000.0, 10_000.0));
        assert!(policy.should_continue(9_999.0, 9_999.0));
        assert!(policy.should_continue(10_000.0, 9_999.0));
        assert!(policy.should_continue(9_999.0, 1e9));
    }

    #[test]
    fn zero_threshold_never_stops() {
        let policy = ShotNoise::new(0.0);
        assert!(policy.should_continue(1e12, 1e12));
    }

    proptest! {
        #[test]
        fn zero_total_continues(n in 1e-6..1e12f64) {
            let policy = ShotNoise::default();
            prop_assert!(policy.should_continue(0.0, n));
            prop_assert!(policy.should_continue(n, 0.0));
        }
    }
}
