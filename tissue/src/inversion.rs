//! Inversion
//!
//! Recovers the oxygenation ratio and hemoglobin concentration from runs at
//! three wavelengths. The ratio of the two detector totals at each wavelength
//! removes the source strength, and differences of the log ratios between
//! wavelengths cancel the scattering contribution to first order.

use crate::error::ScatterError;
use crate::simulation::ScatterResult;
use crate::sweep::SweepPoint;
use optics::absorption::AbsorptionTable;
use optics::Float;

/// Oxygenation and concentration recovered from three wavelengths.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Estimate {
    /// Oxygenated fraction. Values outside [0, 1] indicate inconsistent input.
    pub ratio: Float,

    /// Hemoglobin concentration.
    pub concentration: Float,
}

/// Returns the absorption differences `(ln(R1/R2), ln(R1/R3))` where `Ri` is
/// the detector 1 over detector 2 ratio at wavelength `i`.
///
/// * `results` - Runs at the three wavelengths.
pub fn absorption_differences(results: &[ScatterResult; 3]) -> Result<(Float, Float), ScatterError> {
    let mut r = [0.0; 3];
    for (ri, result) in r.iter_mut().zip(results.iter()) {
        if !(result.detector1_count > 0.0 && result.detector2_count > 0.0) {
            return Err(ScatterError::Inversion(format!(
                "detector totals must be positive, got {} and {}",
                result.detector1_count, result.detector2_count
            )));
        }
        *ri = result.detector1_count / result.detector2_count;
    }
    debug!("detector ratios {:?}", r);

    Ok(((r[0] / r[1]).ln(), (r[0] / r[2]).ln()))
}

/// Solve for the oxygenation ratio and concentration.
///
/// * `alpha12`     - Absorption difference between wavelengths 1 and 2.
/// * `alpha13`     - Absorption difference between wavelengths 1 and 3.
/// * `wavelengths` - The three wavelengths in nanometers.
/// * `table`       - Hemoglobin absorption table.
pub fn estimate(
    alpha12: Float,
    alpha13: Float,
    wavelengths: [Float; 3],
    table: &AbsorptionTable,
) -> Result<Estimate, ScatterError> {
    let [a1, a2, a3] = wavelengths.map(|wavelength| table.coefficients(wavelength));
    let (a1, a2, a3) = (
        a1.map_err(ScatterError::Coefficients)?,
        a2.map_err(ScatterError::Coefficients)?,
        a3.map_err(ScatterError::Coefficients)?,
    );
    let (d1, d2, d3) = (a1.deoxy, a2.deoxy, a3.deoxy);
    let (o1, o2, o3) = (a1.oxy, a2.oxy, a3.oxy);

    let top = alpha12 * (d3 + d1) - alpha13 * (d1 + d2);
    let bottom = alpha13 * (o1 - o2 + d1 - d2) - alpha12 * (o1 + o3 - d1 - d3);
    if bottom == 0.0 {
        return Err(ScatterError::Inversion(
            "oxygenation ratio denominator is zero".to_string(),
        ));
    }

    let ratio = (top / bottom).abs();
    if ratio > 1.0 {
        warn!("Oxygenation ratio {} is outside [0, 1]", ratio);
    }
    if alpha12 == 0.0 || ratio == 0.0 || ratio == 1.0 {
        return Err(ScatterError::Inversion(format!(
            "concentration is undefined for ratio {ratio} and absorption difference {alpha12}"
        )));
    }

    let concentration =
        (o2 / ratio + d1 / (1.0 - ratio) - o3 / ratio + d3 / (1.0 - ratio)) / alpha12;
    Ok(Estimate {
        ratio,
        concentration,
    })
}

/// Invert three sweep points taken at different wavelengths.
///
/// * `points` - Sweep results, one per wavelength.
/// * `table`  - Hemoglobin absorption table.
pub fn invert(points: &[SweepPoint], table: &AbsorptionTable) -> Result<Estimate, ScatterError> {
    let [p1, p2, p3] = points else {
        return Err(ScatterError::Inversion(format!(
            "expected 3 sweep points, got {}",
            points.len()
        )));
    };
    let results = [p1.result, p2.result, p3.result];
    let wavelengths = [p1.params.wavelength, p2.params.wavelength, p3.params.wavelength];
    let (alpha12, alpha13) = absorption_differences(&results)?;
    info!(
        "Absorption differences at {:?} nm: {}, {}",
        wavelengths, alpha12, alpha13
    );
    estimate(alpha12, alpha13, wavelengths, table)
}
