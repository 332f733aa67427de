//! Boundary Filter

use crate::ensemble::Ensemble;
use crate::params::ScatterParams;
use optics::Float;

/// Calculation volume. Packets outside it are dropped from the ensemble.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundaryFilter {
    /// Lateral bound on `|x|` and `|y|`.
    pub lateral: Float,

    /// Depth bound on `z`.
    pub depth: Float,
}

impl BoundaryFilter {
    /// Create a new `BoundaryFilter`.
    ///
    /// * `lateral` - Lateral bound.
    /// * `depth`   - Depth bound.
    pub fn new(lateral: Float, depth: Float) -> Self {
        Self { lateral, depth }
    }

    /// Create the calculation volume for a parameter set. The lateral bound is
    /// five times the far detector distance and the depth is the full stack.
    ///
    /// * `params` - Scatter parameters.
    pub fn from_params(params: &ScatterParams) -> Self {
        Self::new(5.0 * params.detector2_distance, params.total_thickness())
    }

    /// Returns `true` if the point lies inside the volume. Faces are inclusive.
    #[inline]
    pub fn contains(&self, x: Float, y: Float, z: Float) -> bool {
        x.abs() <= self.lateral && y.abs() <= self.lateral && z >= 0.0 && z <= self.depth
    }

    /// Returns the indices of the packets inside the volume.
    ///
    /// * `ensemble` - The packets.
    pub fn retained_indices(&self, ensemble: &Ensemble) -> Vec<usize> {
        (0..ensemble.len())
            .filter(|&i| self.contains(ensemble.x[i], ensemble.y[i], ensemble.z[i]))
            .collect()
    }

    /// Drop the packets outside the volume and return the number retained.
    ///
    /// * `ensemble` - The packets.
    pub fn apply(&self, ensemble: &mut Ensemble) -> usize {
        ensemble.retain(|e, i| self.contains(e.x[i], e.y[i], e.z[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optics::rng::RNG;
    use proptest::prelude::*;

    fn ensemble(x: &[Float], y: &[Float], z: &[Float]) -> Ensemble {
        let mut e = Ensemble::default();
        for i in 0..x.len() {
            e.push(x[i], y[i], z[i], i as Float, 1.0);
        }
        e
    }

    #[test]
    fn retains_inside_volume() {
        let e = ensemble(
            &[1.0, 0.1, 100.0, 1.5, 0.5, 0.3],
            &[1.5, 0.3, 1.1, 0.7, 10.0, 0.17],
            &[11.0, 0.7, 1.2, 1.7, 1.8, 0.2],
        );
        let filter = BoundaryFilter::new(1.0, 1.0);
        assert_eq!(filter.retained_indices(&e), vec![1, 5]);
    }

    #[test]
    fn drops_packets_above_skin() {
        let e = ensemble(
            &[1.0, 0.1, 100.0, 1.5, 0.5, 0.3],
            &[1.5, 0.3, 1.1, 0.7, 10.0, 0.17],
            &[11.0, -0.7, 1.2, 1.7, 1.8, 0.2],
        );
        let filter = BoundaryFilter::new(1.0, 1.0);
        assert_eq!(filter.retained_indices(&e), vec![5]);
    }

    #[test]
    fn apply_matches_retained_indices() {
        let mut e = ensemble(
            &[1.0, 0.1, 100.0, 1.5, 0.5, 0.3],
            &[1.5, 0.3, 1.1, 0.7, 10.0, 0.17],
            &[11.0, 0.7, 1.2, 1.7, 1.8, 0.2],
        );
        let filter = BoundaryFilter::new(1.0, 1.0);
        assert_eq!(filter.apply(&mut e), 2);
        assert_eq!(e.path, vec![1.0, 5.0]);
        assert_eq!(e.x, vec![0.1, 0.3]);
    }

    #[test]
    fn faces_are_inclusive() {
        let filter = BoundaryFilter::new(1.5, 4.05);
        assert!(filter.contains(-1.5, 1.5, 0.0));
        assert!(filter.contains(0.0, 0.0, 4.05));
        assert!(!filter.contains(0.0, 0.0, -1e-12));
    }

    #[test]
    fn from_example_params() {
        let filter = BoundaryFilter::from_params(&ScatterParams::example());
        assert!((filter.lateral - 1.5).abs() < 1e-12);
        assert!((filter.depth - 4.05).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn apply_is_idempotent(seed in 0..1_000u64, n in 0..200usize) {
            let mut rng = RNG::new(seed);
            let mut e = Ensemble::default();
            for _ in 0..n {
                e.push(
                    rng.uniform_range(-2.0, 2.0),
                    rng.uniform_range(-2.0, 2.0),
                    rng.uniform_range(-1.0, 3.0),
                    0.0,
                    1.0,
                );
            }

            let filter = BoundaryFilter::new(1.0, 2.0);
            let once = filter.apply(&mut e);
            let snapshot = e.clone();
            let twice = filter.apply(&mut e);
            prop_assert_eq!(once, twice);
            prop_assert_eq!(e, snapshot);
        }
    }
}
