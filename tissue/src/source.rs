//! Photon Source

use crate::ensemble::Ensemble;
use optics::rng::RNG;
use optics::Float;

/// Square aperture at the entry plane. Injected packets start in a thin slab
/// one skin mean free path deep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Source {
    /// Half-width of the aperture.
    pub half_width: Float,

    /// Depth of the starting slab.
    pub depth: Float,
}

impl Source {
    /// Create a new `Source`.
    ///
    /// * `half_width` - Aperture half-width.
    /// * `mu_skin`    - Skin scattering coefficient.
    pub fn new(half_width: Float, mu_skin: Float) -> Self {
        Self {
            half_width,
            depth: 1.0 / mu_skin,
        }
    }

    /// Append `count` packets with the given amplitude and zero path length.
    ///
    /// * `ensemble`  - Receives the packets.
    /// * `count`     - Number of packets.
    /// * `amplitude` - Starting amplitude.
    /// * `rng`       - Random number generator.
    pub fn inject(&self, ensemble: &mut Ensemble, count: usize, amplitude: Float, rng: &mut RNG) {
        ensemble.reserve(count);
        for _ in 0..count {
            let x = rng.uniform_range(-self.half_width, self.half_width);
            let y = rng.uniform_range(-self.half_width, self.half_width);
            let z = rng.uniform_range(0.0, self.depth);
            ensemble.push(x, y, z, 0.0, amplitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injects_inside_aperture() {
        let source = Source::new(0.05, 31.0);
        let mut e = Ensemble::default();
        e.push(9.0, 9.0, 9.0, 9.0, 9.0);
        source.inject(&mut e, 1000, 1.0, &mut RNG::new(3));

        assert_eq!(e.len(), 1001);
        assert_eq!(e.x[0], 9.0);
        for i in 1..e.len() {
            assert!(e.x[i].abs() <= 0.05);
            assert!(e.y[i].abs() <= 0.05);
            assert!(e.z[i] >= 0.0 && e.z[i] <= 1.0 / 31.0);
            assert_eq!(e.path[i], 0.0);
            assert_eq!(e.amplitude[i], 1.0);
        }
    }

    #[test]
    fn same_seed_same_packets() {
        let source = Source::new(0.05, 20.0);
        let mut a = Ensemble::default();
        let mut b = Ensemble::default();
        source.inject(&mut a, 100, 100.0, &mut RNG::new(8));
        source.inject(&mut b, 100, 100.0, &mut RNG::new(8));
        assert_eq!(a, b);
    }
}
