//! Scatter Parameters

use crate::error::*;
use optics::Float;
use std::fmt;

/// Physical inputs of one scatter simulation. Lengths are in centimeters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatterParams {
    /// Wavelength in nanometers.
    pub wavelength: Float,

    /// Radial distance from the source axis to the first ring detector.
    pub detector1_distance: Float,

    /// Radial distance to the second ring detector. Must exceed
    /// `detector1_distance`.
    pub detector2_distance: Float,

    /// Half-width of the square source aperture and of both detector rings.
    pub aperture_half_width: Float,

    /// Skin thickness.
    pub skin_thickness: Float,

    /// Muscle thickness.
    pub muscle_thickness: Float,

    /// Bone thickness. Photons that go through the bone are dropped.
    pub bone_thickness: Float,

    /// Hemoglobin concentration in the muscle.
    pub hemoglobin_concentration: Float,

    /// Fraction of oxygenated hemoglobin in [0, 1].
    pub oxygen_ratio: Float,
}

impl ScatterParams {
    /// Returns the example parameter set: 660 nm, detectors at 1 mm and 3 mm,
    /// 0.5 mm half-width, 0.5 mm skin over 1 cm muscle and 3 cm bone, 0.150
    /// hemoglobin at 90% oxygenation.
    pub fn example() -> Self {
        Self {
            wavelength: 660.0,
            detector1_distance: 0.1,
            detector2_distance: 0.3,
            aperture_half_width: 0.05,
            skin_thickness: 0.05,
            muscle_thickness: 1.0,
            bone_thickness: 3.0,
            hemoglobin_concentration: 0.150,
            oxygen_ratio: 0.9,
        }
    }

    /// Returns the total depth of the layered model.
    pub fn total_thickness(&self) -> Float {
        self.skin_thickness + self.muscle_thickness + self.bone_thickness
    }

    /// Check that the physical parameters describe a usable geometry.
    pub fn validate(&self) -> Result<(), ScatterError> {
        let all = [
            ("wavelength", self.wavelength),
            ("detector1_distance", self.detector1_distance),
            ("detector2_distance", self.detector2_distance),
            ("aperture_half_width", self.aperture_half_width),
            ("skin_thickness", self.skin_thickness),
            ("muscle_thickness", self.muscle_thickness),
            ("bone_thickness", self.bone_thickness),
            ("hemoglobin_concentration", self.hemoglobin_concentration),
            ("oxygen_ratio", self.oxygen_ratio),
        ];
        for (name, value) in all {
            if !value.is_finite() {
                return Err(invalid(name, value, "must be finite"));
            }
        }

        if self.wavelength <= 0.0 {
            return Err(invalid("wavelength", self.wavelength, "must be positive"));
        }
        if self.aperture_half_width <= 0.0 {
            return Err(invalid(
                "aperture_half_width",
                self.aperture_half_width,
                "must be positive",
            ));
        }
        if self.detector1_distance < 0.0 {
            return Err(invalid(
                "detector1_distance",
                self.detector1_distance,
                "must not be negative",
            ));
        }
        if self.detector2_distance <= self.detector1_distance {
            return Err(invalid(
                "detector2_distance",
                self.detector2_distance,
                "must be greater than detector1_distance",
            ));
        }

        let thicknesses = [
            ("skin_thickness", self.skin_thickness),
            ("muscle_thickness", self.muscle_thickness),
            ("bone_thickness", self.bone_thickness),
        ];
        for (name, value) in thicknesses {
            if value < 0.0 {
                return Err(invalid(name, value, "must not be negative"));
            }
        }

        if self.hemoglobin_concentration < 0.0 {
            return Err(invalid(
                "hemoglobin_concentration",
                self.hemoglobin_concentration,
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.oxygen_ratio) {
            return Err(invalid(
                "oxygen_ratio",
                self.oxygen_ratio,
                "must be within [0, 1]",
            ));
        }

        Ok(())
    }
}

impl fmt::Display for ScatterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "λ = {} nm, detectors = ({}, {}) cm, half-width = {} cm, \
             layers = ({}, {}, {}) cm, concentration = {}, ratio = {}",
            self.wavelength,
            self.detector1_distance,
            self.detector2_distance,
            self.aperture_half_width,
            self.skin_thickness,
            self.muscle_thickness,
            self.bone_thickness,
            self.hemoglobin_concentration,
            self.oxygen_ratio
        )
    }
}

fn invalid(name: &'static str, value: Float, reason: &'static str) -> ScatterError {
    ScatterError::InvalidParameter {
        name,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_name(p: &ScatterParams) -> &'static str {
        match p.validate() {
            Err(ScatterError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn example_is_valid() {
        assert_eq!(ScatterParams::example().validate(), Ok(()));
    }

    #[test]
    fn degenerate_aperture_and_detectors() {
        let p = ScatterParams {
            aperture_half_width: 0.0,
            detector1_distance: 0.0,
            detector2_distance: 0.0,
            ..ScatterParams::example()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn detectors_must_be_ordered() {
        let p = ScatterParams {
            detector1_distance: 0.3,
            detector2_distance: 0.1,
            ..ScatterParams::example()
        };
        assert_eq!(rejected_name(&p), "detector2_distance");

        let p = ScatterParams {
            detector2_distance: 0.1,
            ..ScatterParams::example()
        };
        assert_eq!(rejected_name(&p), "detector2_distance");
    }

    #[test]
    fn negative_thickness() {
        let p = ScatterParams {
            muscle_thickness: -1.0,
            ..ScatterParams::example()
        };
        assert_eq!(rejected_name(&p), "muscle_thickness");
    }

    #[test]
    fn zero_thickness_is_allowed() {
        let p = ScatterParams {
            bone_thickness: 0.0,
            ..ScatterParams::example()
        };
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn ratio_and_concentration_domains() {
        let p = ScatterParams {
            oxygen_ratio: 1.2,
            ..ScatterParams::example()
        };
        assert_eq!(rejected_name(&p), "oxygen_ratio");

        let p = ScatterParams {
            hemoglobin_concentration: -0.1,
            ..ScatterParams::example()
        };
        assert_eq!(rejected_name(&p), "hemoglobin_concentration");
    }

    #[test]
    fn non_finite() {
        let p = ScatterParams {
            skin_thickness: Float::NAN,
            ..ScatterParams::example()
        };
        assert_eq!(rejected_name(&p), "skin_thickness");
    }
}
