//! Stepper

use crate::ensemble::Ensemble;
use optics::rng::RNG;
use optics::sampling::*;
use optics::Float;

/// Optical coefficients of one layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerCoefficients {
    /// Scattering coefficient μ (1/cm), the inverse mean free path.
    pub mu: Float,

    /// Absorption coefficient α (1/cm).
    pub alpha: Float,
}

/// How the step displacement is combined with the current position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// The displacement becomes the new position.
    #[default]
    Replace,

    /// The displacement is added to the current position.
    Accumulate,
}

/// How the sampled angles map onto the lateral axes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// x and y both receive `d cos θ cos φ`, so every step lands on the
    /// diagonal x = y.
    #[default]
    MirroredXY,

    /// y receives `d cos θ sin φ`.
    Spherical,
}

/// Geometry of a scattering step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepModel {
    /// How the displacement updates the position.
    pub placement: Placement,

    /// How the angles map onto the lateral axes.
    pub direction: Direction,
}

impl StepModel {
    /// Returns the displacement of a step of length `d` along `angles`.
    ///
    /// * `d`      - Step length.
    /// * `angles` - Sampled direction.
    #[inline]
    pub fn displacement(&self, d: Float, angles: &Angles) -> (Float, Float, Float) {
        let (sin_theta, cos_theta) = angles.theta.sin_cos();
        let (sin_phi, cos_phi) = angles.phi.sin_cos();
        let dx = d * cos_theta * cos_phi;
        let dy = match self.direction {
            Direction::MirroredXY => dx,
            Direction::Spherical => d * cos_theta * sin_phi,
        };
        (dx, dy, d * sin_theta)
    }
}

/// Advance the packets at `indices` by one scattering event in a layer with
/// the given coefficients. Path lengths never decrease and, for `alpha >= 0`,
/// amplitudes never increase.
///
/// * `ensemble` - The packets.
/// * `indices`  - Packets in the layer.
/// * `coeffs`   - Layer coefficients.
/// * `model`    - Step geometry.
/// * `rng`      - Random number generator.
pub fn step(
    ensemble: &mut Ensemble,
    indices: &[usize],
    coeffs: LayerCoefficients,
    model: StepModel,
    rng: &mut RNG,
) {
    for &i in indices {
        let d = exponential(rng, coeffs.mu);
        let angles = uniform_angles(rng);
        let (dx, dy, dz) = model.displacement(d, &angles);

        match model.placement {
            Placement::Replace => {
                ensemble.x[i] = dx;
                ensemble.y[i] = dy;
                ensemble.z[i] = dz;
            }
            Placement::Accumulate => {
                ensemble.x[i] += dx;
                ensemble.y[i] += dy;
                ensemble.z[i] += dz;
            }
        }

        ensemble.path[i] += d;
        if coeffs.alpha != 0.0 {
            ensemble.amplitude[i] *= (-coeffs.alpha * d).exp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn packets(n: usize) -> Ensemble {
        let mut e = Ensemble::with_capacity(n);
        for i in 0..n {
            e.push(0.01, -0.01, 0.02, i as Float * 0.1, 100.0);
        }
        e
    }

    #[test]
    fn mirrored_xy_after_one_step() {
        let mut e = packets(1000);
        let all: Vec<usize> = (0..e.len()).collect();
        let coeffs = LayerCoefficients { mu: 31.0, alpha: 0.0 };
        step(&mut e, &all, coeffs, StepModel::default(), &mut RNG::new(12345));

        assert_eq!(e.x, e.y);
        assert!(e.x.iter().any(|&x| x != 0.01));
    }

    #[test]
    fn spherical_breaks_xy_symmetry() {
        let mut e = packets(1000);
        let all: Vec<usize> = (0..e.len()).collect();
        let model = StepModel {
            direction: Direction::Spherical,
            ..StepModel::default()
        };
        let coeffs = LayerCoefficients { mu: 31.0, alpha: 0.0 };
        step(&mut e, &all, coeffs, model, &mut RNG::new(12345));

        assert!(e.x.iter().zip(e.y.iter()).any(|(x, y)| x != y));
    }

    #[test]
    fn replace_ignores_previous_position() {
        let angles = Angles {
            theta: 0.0,
            phi: 0.0,
        };
        let (dx, dy, dz) = StepModel::default().displacement(2.0, &angles);
        assert_eq!((dx, dy, dz), (2.0, 2.0, 0.0));

        let mut a = packets(10);
        let mut b = packets(10);
        for i in 0..b.len() {
            b.x[i] = 5.0;
            b.y[i] = -5.0;
            b.z[i] = 1.0;
        }
        let all: Vec<usize> = (0..10).collect();
        let coeffs = LayerCoefficients { mu: 10.0, alpha: 0.0 };
        step(&mut a, &all, coeffs, StepModel::default(), &mut RNG::new(9));
        step(&mut b, &all, coeffs, StepModel::default(), &mut RNG::new(9));
        assert_eq!(a.x, b.x);
        assert_eq!(a.z, b.z);
    }

    #[test]
    fn accumulate_adds_displacement() {
        let mut replaced = packets(10);
        let mut accumulated = packets(10);
        let all: Vec<usize> = (0..10).collect();
        let coeffs = LayerCoefficients { mu: 10.0, alpha: 0.0 };
        let model = StepModel {
            placement: Placement::Accumulate,
            ..StepModel::default()
        };
        step(&mut replaced, &all, coeffs, StepModel::default(), &mut RNG::new(4));
        step(&mut accumulated, &all, coeffs, model, &mut RNG::new(4));
        for i in 0..10 {
            assert_eq!(accumulated.x[i], 0.01 + replaced.x[i]);
            assert_eq!(accumulated.z[i], 0.02 + replaced.z[i]);
        }
    }

    #[test]
    fn only_selected_packets_move() {
        let mut e = packets(4);
        let coeffs = LayerCoefficients { mu: 10.0, alpha: 1.0 };
        step(&mut e, &[1, 3], coeffs, StepModel::default(), &mut RNG::new(1));
        assert_eq!(e.x[0], 0.01);
        assert_eq!(e.path[0], 0.0);
        assert_eq!(e.amplitude[2], 100.0);
        assert!(e.path[1] >= 0.1);
    }

    #[test]
    fn zero_absorption_keeps_amplitude() {
        let mut e = packets(100);
        let all: Vec<usize> = (0..e.len()).collect();
        let coeffs = LayerCoefficients { mu: 18.0, alpha: 0.0 };
        step(&mut e, &all, coeffs, StepModel::default(), &mut RNG::new(77));
        assert!(e.amplitude.iter().all(|&a| a == 100.0));
    }

    proptest! {
        #[test]
        fn path_grows_and_amplitude_decays(
            seed in 0..1_000u64,
            mu in 0.5..50.0f64,
            alpha in 0.0..5.0f64,
        ) {
            let mut e = packets(64);
            let before = e.clone();
            let all: Vec<usize> = (0..e.len()).collect();
            let coeffs = LayerCoefficients { mu, alpha };
            step(&mut e, &all, coeffs, StepModel::default(), &mut RNG::new(seed));

            for i in 0..e.len() {
                prop_assert!(e.path[i] >= before.path[i]);
                prop_assert!(e.amplitude[i] <= before.amplitude[i]);
                prop_assert!(e.amplitude[i] > 0.0 || alpha > 0.0);
            }
        }
    }
}
