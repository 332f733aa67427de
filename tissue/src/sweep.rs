//! Parameter Sweeps

use crate::config::SimulationConfig;
use crate::error::ScatterError;
use crate::params::ScatterParams;
use crate::progress::create_progress_reporter;
use crate::simulation::*;
use itertools::iproduct;
use optics::absorption::AbsorptionTable;
use optics::common::linspace;
use optics::rng::RNG;
use optics::Float;

/// Inclusive range of evenly spaced values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepRange {
    /// First value.
    pub start: Float,

    /// Last value.
    pub end: Float,

    /// Number of values.
    pub steps: usize,
}

impl SweepRange {
    /// Create a new `SweepRange`.
    ///
    /// * `start` - First value.
    /// * `end`   - Last value.
    /// * `steps` - Number of values.
    pub fn new(start: Float, end: Float, steps: usize) -> Self {
        Self { start, end, steps }
    }

    /// Returns the values of the range.
    pub fn values(&self) -> Vec<Float> {
        linspace(self.start, self.end, self.steps)
    }
}

/// One completed job of a sweep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepPoint {
    /// Parameters of the job.
    pub params: ScatterParams,

    /// Outcome of the job.
    pub result: ScatterResult,
}

/// Parallel sweep settings.
#[derive(Clone, Debug)]
pub struct SweepOptions {
    /// Loop settings shared by every job.
    pub config: SimulationConfig,

    /// Job `i` uses random stream `seed + i`.
    pub seed: u64,

    /// Number of worker threads.
    pub threads: usize,

    /// Hide the progress bar.
    pub quiet: bool,
}

/// Returns `base` at every wavelength of `wavelengths`.
///
/// * `base`        - Parameters held fixed.
/// * `wavelengths` - Wavelengths in nanometers.
pub fn spectrum(base: &ScatterParams, wavelengths: SweepRange) -> Vec<ScatterParams> {
    wavelengths
        .values()
        .into_iter()
        .map(|wavelength| ScatterParams {
            wavelength,
            ..*base
        })
        .collect()
}

/// Returns `base` at every oxygenation ratio of `ratios`.
///
/// * `base`   - Parameters held fixed.
/// * `ratios` - Oxygenated fractions.
pub fn oxygen_ratios(base: &ScatterParams, ratios: SweepRange) -> Vec<ScatterParams> {
    ratios
        .values()
        .into_iter()
        .map(|oxygen_ratio| ScatterParams {
            oxygen_ratio,
            ..*base
        })
        .collect()
}

/// Returns `base` at every hemoglobin concentration of `concentrations`.
///
/// * `base`           - Parameters held fixed.
/// * `concentrations` - Hemoglobin concentrations.
pub fn concentrations(base: &ScatterParams, concentrations: SweepRange) -> Vec<ScatterParams> {
    concentrations
        .values()
        .into_iter()
        .map(|hemoglobin_concentration| ScatterParams {
            hemoglobin_concentration,
            ..*base
        })
        .collect()
}

/// Returns the full grid wavelength x concentration x ratio, with the ratio
/// varying fastest.
///
/// * `base`           - Parameters held fixed.
/// * `wavelengths`    - Wavelengths in nanometers.
/// * `concentrations` - Hemoglobin concentrations.
/// * `ratios`         - Oxygenated fractions.
pub fn scan(
    base: &ScatterParams,
    wavelengths: SweepRange,
    concentrations: SweepRange,
    ratios: SweepRange,
) -> Vec<ScatterParams> {
    let wavelengths = wavelengths.values();
    let concentrations = concentrations.values();
    let ratios = ratios.values();
    iproduct!(wavelengths, concentrations, ratios)
        .map(|(wavelength, hemoglobin_concentration, oxygen_ratio)| ScatterParams {
            wavelength,
            hemoglobin_concentration,
            oxygen_ratio,
            ..*base
        })
        .collect()
}

/// Run every job on a pool of worker threads. Results are returned in job
/// order and are the same for any thread count. If any job fails, the error
/// of the first failing job is returned.
///
/// * `jobs`    - Parameters of each job.
/// * `table`   - Hemoglobin absorption table.
/// * `options` - Sweep settings.
pub fn run_sweep(
    jobs: &[ScatterParams],
    table: &AbsorptionTable,
    options: &SweepOptions,
) -> Result<Vec<SweepPoint>, ScatterError> {
    if options.threads == 0 {
        return Err(ScatterError::InvalidConfig {
            name: "threads",
            reason: "must be greater than zero".to_string(),
        });
    }

    // Validate every job before spawning workers.
    let simulations = jobs
        .iter()
        .map(|params| Simulation::new(params, &options.config, table))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Running {} jobs on {} threads",
        simulations.len(),
        options.threads
    );
    let progress = create_progress_reporter(simulations.len() as u64, options.quiet);
    progress.set_message("Scattering");

    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    let scoped = crossbeam::scope(|scope| {
        let (tx, rx) = crossbeam_channel::bounded::<usize>(options.threads);

        // Spawn worker threads.
        for _ in 0..options.threads {
            let rxc = rx.clone();
            let result_tx = result_tx.clone();
            let simulations = &simulations;
            let progress = &progress;
            scope.spawn(move |_| {
                for job_idx in rxc.iter() {
                    let mut rng = RNG::new(options.seed.wrapping_add(job_idx as u64));
                    let result = simulations[job_idx].run(&mut rng);
                    progress.inc(1);
                    if result_tx.send((job_idx, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(rx);

        // Send work.
        for job_idx in 0..simulations.len() {
            if tx.send(job_idx).is_err() {
                break;
            }
        }
    });
    if let Err(panic) = scoped {
        std::panic::resume_unwind(panic);
    }
    drop(result_tx);

    let mut results: Vec<Option<Result<ScatterResult, ScatterError>>> =
        vec![None; simulations.len()];
    for (job_idx, result) in result_rx.iter() {
        results[job_idx] = Some(result);
    }
    progress.finish_with_message("Sweep complete");

    simulations
        .iter()
        .zip(results)
        .enumerate()
        .map(|(job_idx, (simulation, result))| match result {
            Some(result) => result.map(|result| SweepPoint {
                params: simulation.params,
                result,
            }),
            None => Err(ScatterError::InvalidConfig {
                name: "threads",
                reason: format!("job {job_idx} was not run"),
            }),
        })
        .collect()
}
