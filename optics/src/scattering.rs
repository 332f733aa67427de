//! Tissue Scattering Coefficients

use crate::common::Float;

/// Reference wavelength of the power law in nanometers.
pub const REFERENCE_WAVELENGTH: Float = 500.0;

/// Power law `μ = a (λ/λref)^b` for the reduced scattering coefficient of a
/// tissue type. Constants are from Jacques, Phys. Med. Biol. 58 (2013)
/// R37-R61: mean values for skin and bone, Tromberg (1996) for muscle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PowerLaw {
    /// Scattering coefficient at the reference wavelength (1/cm).
    pub a: Float,

    /// Scattering power.
    pub b: Float,
}

impl PowerLaw {
    /// Skin.
    pub const SKIN: PowerLaw = PowerLaw { a: 46.0, b: -1.421 };

    /// Bone.
    pub const BONE: PowerLaw = PowerLaw { a: 22.9, b: -0.716 };

    /// Muscle.
    pub const MUSCLE: PowerLaw = PowerLaw { a: 13.0, b: -1.470 };

    /// Evaluate the scattering coefficient in 1/cm.
    ///
    /// * `wavelength` - Wavelength in nanometers.
    pub fn eval(&self, wavelength: Float) -> Float {
        self.a * (wavelength / REFERENCE_WAVELENGTH).powf(self.b)
    }
}

/// Scattering coefficients of the three tissue layers at one wavelength.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatteringCoefficients {
    /// Skin μ (1/cm).
    pub skin: Float,

    /// Bone μ (1/cm).
    pub bone: Float,

    /// Muscle μ (1/cm).
    pub muscle: Float,
}

impl ScatteringCoefficients {
    /// Returns the scattering coefficients for the given wavelength.
    ///
    /// * `wavelength` - Wavelength in nanometers.
    pub fn at(wavelength: Float) -> Self {
        Self {
            skin: PowerLaw::SKIN.eval(wavelength),
            bone: PowerLaw::BONE.eval(wavelength),
            muscle: PowerLaw::MUSCLE.eval(wavelength),
        }
    }
}
