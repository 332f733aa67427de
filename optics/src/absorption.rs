//! Hemoglobin Absorption

use crate::common::*;
use crate::table::*;

/// Molar mass of hemoglobin in mg/mol.
pub const HEMOGLOBIN_MG_PER_MOL: Float = 64500.0;

/// Built-in molar extinction coefficients of hemoglobin in cm⁻¹/M, after the
/// compilation by S. Prahl (Oregon Medical Laser Center) at 10 nm spacing.
/// Each row is `[wavelength (nm), HbO2, Hb]`. Other published tables differ,
/// e.g. Hb at 450 nm is 58000 in some; load those with
/// `AbsorptionTable::from_file`.
const HEMOGLOBIN_EXTINCTION: [[Float; 3]; 56] = [
    [450.0, 62816.0, 103292.0],
    [460.0, 44480.0, 23388.8],
    [470.0, 33209.2, 16156.4],
    [480.0, 26629.2, 14550.0],
    [490.0, 23684.4, 16684.0],
    [500.0, 20932.8, 20035.2],
    [510.0, 20035.2, 25773.6],
    [520.0, 24202.4, 31589.6],
    [530.0, 39956.8, 39036.4],
    [540.0, 53236.0, 46592.0],
    [550.0, 43016.0, 53412.0],
    [560.0, 32613.2, 53788.0],
    [570.0, 44496.0, 45072.0],
    [580.0, 50104.0, 37020.0],
    [590.0, 14400.8, 28324.4],
    [600.0, 3200.0, 14677.2],
    [610.0, 1506.0, 9443.6],
    [620.0, 942.0, 6509.6],
    [630.0, 610.0, 5148.8],
    [640.0, 442.0, 4345.2],
    [650.0, 368.0, 3750.12],
    [660.0, 319.6, 3226.56],
    [670.0, 294.0, 2795.12],
    [680.0, 277.6, 2407.92],
    [690.0, 276.0, 2051.96],
    [700.0, 290.0, 1794.28],
    [710.0, 314.0, 1540.48],
    [720.0, 348.0, 1325.88],
    [730.0, 390.0, 1102.2],
    [740.0, 446.0, 1115.88],
    [750.0, 518.0, 1405.24],
    [760.0, 586.0, 1548.52],
    [770.0, 650.0, 1311.88],
    [780.0, 710.0, 1075.44],
    [790.0, 756.0, 890.8],
    [800.0, 816.0, 761.72],
    [810.0, 864.0, 717.08],
    [820.0, 916.0, 693.76],
    [830.0, 974.0, 693.04],
    [840.0, 1022.0, 692.36],
    [850.0, 1058.0, 691.32],
    [860.0, 1092.0, 694.32],
    [870.0, 1128.0, 705.84],
    [880.0, 1154.0, 726.44],
    [890.0, 1178.0, 743.6],
    [900.0, 1198.0, 761.84],
    [910.0, 1214.0, 774.56],
    [920.0, 1224.0, 777.36],
    [930.0, 1222.0, 763.84],
    [940.0, 1214.0, 693.44],
    [950.0, 1204.0, 602.24],
    [960.0, 1186.0, 525.56],
    [970.0, 1162.0, 429.32],
    [980.0, 1128.0, 359.656],
    [990.0, 1080.0, 283.22],
    [1000.0, 1024.0, 206.784],
];

/// Molar extinction coefficients of deoxygenated and oxygenated hemoglobin at
/// one wavelength, in cm⁻¹/M.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HemoglobinAbsorption {
    /// Deoxygenated hemoglobin (Hb).
    pub deoxy: Float,

    /// Oxygenated hemoglobin (HbO2).
    pub oxy: Float,
}

/// Tabulated hemoglobin extinction coefficients indexed by wavelength.
#[derive(Clone, Debug)]
pub struct AbsorptionTable {
    /// Wavelengths in nanometers, strictly ascending.
    wavelengths: Vec<Float>,

    /// HbO2 coefficients.
    oxy: Vec<Float>,

    /// Hb coefficients.
    deoxy: Vec<Float>,
}

impl Default for AbsorptionTable {
    /// Returns the built-in table.
    fn default() -> Self {
        Self {
            wavelengths: HEMOGLOBIN_EXTINCTION.iter().map(|r| r[0]).collect(),
            oxy: HEMOGLOBIN_EXTINCTION.iter().map(|r| r[1]).collect(),
            deoxy: HEMOGLOBIN_EXTINCTION.iter().map(|r| r[2]).collect(),
        }
    }
}

impl AbsorptionTable {
    /// Create a table from rows of `[wavelength, HbO2, Hb]`.
    ///
    /// * `rows` - The table rows.
    pub fn new(rows: &[[Float; 3]]) -> Result<Self, String> {
        if rows.len() < 2 {
            return Err(format!(
                "Absorption table needs at least 2 rows, got {}.",
                rows.len()
            ));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(format!("Absorption table row {} is not finite.", i + 1));
            }
            if row[1] < 0.0 || row[2] < 0.0 {
                return Err(format!(
                    "Absorption table row {} has a negative coefficient.",
                    i + 1
                ));
            }
            if i > 0 && row[0] <= rows[i - 1][0] {
                return Err(format!(
                    "Absorption table wavelengths must be strictly ascending (row {}: {} nm).",
                    i + 1,
                    row[0]
                ));
            }
        }

        Ok(Self {
            wavelengths: rows.iter().map(|r| r[0]).collect(),
            oxy: rows.iter().map(|r| r[1]).collect(),
            deoxy: rows.iter().map(|r| r[2]).collect(),
        })
    }

    /// Load a table from a text file of `wavelength HbO2 Hb` triplets.
    /// See `parse_float_file()` for the file syntax.
    ///
    /// * `path` - Path to file.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let values = parse_float_file(path)?;
        if values.len() % 3 != 0 {
            return Err(format!(
                "Absorption table '{}' has {} values, expected triplets of wavelength, HbO2, Hb.",
                path,
                values.len()
            ));
        }

        let rows: Vec<[Float; 3]> = values.chunks(3).map(|c| [c[0], c[1], c[2]]).collect();
        let table = Self::new(&rows).map_err(|e| format!("'{}': {}", path, e))?;
        info!(
            "Loaded absorption table '{}' with {} rows ({} - {} nm)",
            path,
            rows.len(),
            table.min_wavelength(),
            table.max_wavelength()
        );
        Ok(table)
    }

    /// Returns the smallest tabulated wavelength.
    pub fn min_wavelength(&self) -> Float {
        self.wavelengths[0]
    }

    /// Returns the largest tabulated wavelength.
    pub fn max_wavelength(&self) -> Float {
        self.wavelengths[self.wavelengths.len() - 1]
    }

    /// Returns the extinction coefficients at the given wavelength using
    /// linear interpolation between rows. Wavelengths outside the tabulated
    /// range are rejected.
    ///
    /// * `wavelength` - Wavelength in nanometers.
    pub fn coefficients(&self, wavelength: Float) -> Result<HemoglobinAbsorption, String> {
        if !(wavelength >= self.min_wavelength() && wavelength <= self.max_wavelength()) {
            return Err(format!(
                "Wavelength {} nm is outside the absorption table range {} - {} nm.",
                wavelength,
                self.min_wavelength(),
                self.max_wavelength()
            ));
        }

        let nodes = &self.wavelengths;
        let i = find_interval(nodes.len(), |k| nodes[k] <= wavelength);
        let t = (wavelength - nodes[i]) / (nodes[i + 1] - nodes[i]);

        Ok(HemoglobinAbsorption {
            deoxy: lerp(t, self.deoxy[i], self.deoxy[i + 1]),
            oxy: lerp(t, self.oxy[i], self.oxy[i + 1]),
        })
    }
}

/// Returns the absorption coefficient (1/cm) of blood with the given
/// hemoglobin concentration (mg/l) and oxygenated fraction. The two species
/// attenuate independently, so by Beer's law their coefficients add.
///
/// * `absorption`    - Molar extinction coefficients at the wavelength.
/// * `concentration` - Hemoglobin concentration.
/// * `ratio`         - Fraction of oxygenated hemoglobin in [0, 1].
pub fn blood_absorption(
    absorption: &HemoglobinAbsorption,
    concentration: Float,
    ratio: Float,
) -> Float {
    let oxy = concentration * ratio * absorption.oxy / HEMOGLOBIN_MG_PER_MOL;
    let deoxy = concentration * (1.0 - ratio) * absorption.deoxy / HEMOGLOBIN_MG_PER_MOL;
    oxy + deoxy
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use std::io::Write;

    #[test]
    fn tabulated_rows_are_exact() {
        let table = AbsorptionTable::default();
        let a = table.coefficients(600.0).unwrap();
        assert_eq!(a.oxy, 3200.0);
        assert_eq!(a.deoxy, 14677.2);

        let a = table.coefficients(450.0).unwrap();
        assert_eq!(a.oxy, 62816.0);
        assert_eq!(a.deoxy, 103292.0);

        let a = table.coefficients(1000.0).unwrap();
        assert_eq!(a.oxy, 1024.0);
        assert_eq!(a.deoxy, 206.784);
    }

    #[test]
    fn interpolates_between_rows() {
        let table = AbsorptionTable::default();
        let a = table.coefficients(655.0).unwrap();
        assert!(approx_eq!(f64, a.oxy, 0.5 * (368.0 + 319.6), epsilon = 1e-9));
        assert!(approx_eq!(f64, a.deoxy, 0.5 * (3750.12 + 3226.56), epsilon = 1e-9));
    }

    #[test]
    fn rejects_out_of_range() {
        let table = AbsorptionTable::default();
        assert!(table.coefficients(449.0).is_err());
        assert!(table.coefficients(1001.0).is_err());
        assert!(table.coefficients(Float::NAN).is_err());
    }

    #[test]
    fn blood_absorption_mix() {
        let absorption = HemoglobinAbsorption {
            deoxy: 3200.0,
            oxy: 316.0,
        };
        let alpha = blood_absorption(&absorption, 0.150, 0.9);
        assert!(approx_eq!(f64, alpha, 0.001405581395348837, epsilon = 1e-15));
    }

    #[test]
    fn blood_absorption_pure_species() {
        let absorption = HemoglobinAbsorption {
            deoxy: 6450.0,
            oxy: 645.0,
        };
        assert!(approx_eq!(f64, blood_absorption(&absorption, 10.0, 1.0), 0.1, ulps = 4));
        assert!(approx_eq!(f64, blood_absorption(&absorption, 10.0, 0.0), 1.0, ulps = 4));
    }

    #[test]
    fn new_validates_rows() {
        assert!(AbsorptionTable::new(&[[500.0, 1.0, 1.0]]).is_err());
        assert!(AbsorptionTable::new(&[[500.0, 1.0, 1.0], [490.0, 1.0, 1.0]]).is_err());
        assert!(AbsorptionTable::new(&[[500.0, -1.0, 1.0], [510.0, 1.0, 1.0]]).is_err());
        assert!(AbsorptionTable::new(&[[500.0, 1.0, 1.0], [510.0, 2.0, 3.0]]).is_ok());
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("absorption-{}.txt", std::process::id()));
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "# lambda\tHbO2\tHb").unwrap();
            writeln!(f, "600\t3200\t14600").unwrap();
            writeln!(f, "700\t300\t1800").unwrap();
        }

        let table = AbsorptionTable::from_file(path.to_str().unwrap()).unwrap();
        let a = table.coefficients(650.0).unwrap();
        assert!(approx_eq!(f64, a.oxy, 1750.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, a.deoxy, 8200.0, epsilon = 1e-9));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn lab_table_from_file() {
        let path = std::env::temp_dir().join(format!("blood-absorption-{}.txt", std::process::id()));
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "450\t68000\t58000").unwrap();
            writeln!(f, "600\t3200\t14600").unwrap();
            writeln!(f, "995\t1052\t372").unwrap();
        }
        let table = AbsorptionTable::from_file(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        let a = table.coefficients(600.0).unwrap();
        assert_eq!((a.oxy, a.deoxy), (3200.0, 14600.0));
        let a = table.coefficients(450.0).unwrap();
        assert_eq!((a.oxy, a.deoxy), (68000.0, 58000.0));
        let a = table.coefficients(995.0).unwrap();
        assert_eq!((a.oxy, a.deoxy), (1052.0, 372.0));

        assert_eq!(table.max_wavelength(), 995.0);
        assert!(table.coefficients(449.0).is_err());
        assert!(table.coefficients(996.0).is_err());
    }
}
