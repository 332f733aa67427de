//! Common sampling functions.

use crate::common::*;
use crate::rng::*;

/// Sample a free-flight distance from an exponential distribution with mean
/// `1/mu` by inverting its CDF. The result is always finite and non-negative.
///
/// * `u`  - The random sample in [0, 1).
/// * `mu` - The rate (inverse mean free path).
#[inline]
pub fn sample_exponential(u: Float, mu: Float) -> Float {
    -(1.0 - u).ln() / mu
}

/// Draw an exponentially distributed distance with mean `1/mu`.
///
/// * `rng` - Random number generator.
/// * `mu`  - The rate (inverse mean free path).
#[inline]
pub fn exponential(rng: &mut RNG, mu: Float) -> Float {
    sample_exponential(rng.uniform_float(), mu)
}

/// Polar and azimuthal angles of a scattering direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Angles {
    /// Polar angle measured from the entry plane, in [-π/2, π/2].
    pub theta: Float,

    /// Azimuth in [0, 2π).
    pub phi: Float,
}

/// Draw a direction with `theta` uniform in [-π/2, π/2] and `phi` uniform in
/// [0, 2π). This is uniform in angle, not in solid angle.
///
/// * `rng` - Random number generator.
#[inline]
pub fn uniform_angles(rng: &mut RNG) -> Angles {
    let theta = rng.uniform_range(-PI_OVER_TWO, PI_OVER_TWO);
    let phi = rng.uniform_range(0.0, TWO_PI);
    Angles { theta, phi }
}
