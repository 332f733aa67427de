//! Simulation Loop

use crate::boundary::*;
use crate::config::*;
use crate::detector::*;
use crate::ensemble::*;
use crate::error::*;
use crate::layer::*;
use crate::params::*;
use crate::source::*;
use crate::stepper::*;
use crate::termination::*;
use optics::absorption::*;
use optics::rng::RNG;
use optics::scattering::ScatteringCoefficients;
use optics::Float;
use std::fmt;
use std::time::Instant;

/// Outcome of a converged run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatterResult {
    /// Detected amplitude at detector 1.
    pub detector1_count: Float,

    /// Detected amplitude at detector 2.
    pub detector2_count: Float,

    /// Mean path length of packets reaching detector 1.
    pub mean_path_length1: Float,

    /// Mean path length of packets reaching detector 2.
    pub mean_path_length2: Float,

    /// Number of rounds performed.
    pub rounds: usize,

    /// Number of packets injected.
    pub photons_injected: u64,
}

impl fmt::Display for ScatterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "detector1 = {:.3}, detector2 = {:.3}, path1 = {:.5} cm, path2 = {:.5} cm \
             ({} rounds, {} photons)",
            self.detector1_count,
            self.detector2_count,
            self.mean_path_length1,
            self.mean_path_length2,
            self.rounds,
            self.photons_injected
        )
    }
}

/// A prepared scatter simulation: validated inputs and the derived
/// coefficients of every layer.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// Scatter parameters.
    pub params: ScatterParams,

    /// Loop settings.
    pub config: SimulationConfig,

    /// Layer geometry.
    pub layers: LayerModel,

    /// Skin coefficients. Skin holds no blood.
    pub skin: LayerCoefficients,

    /// Muscle coefficients.
    pub muscle: LayerCoefficients,

    /// Bone coefficients. Bone holds no blood.
    pub bone: LayerCoefficients,

    /// Calculation volume.
    pub boundary: BoundaryFilter,

    /// Near detector.
    pub detector1: RingDetector,

    /// Far detector.
    pub detector2: RingDetector,

    /// Photon source.
    pub source: Source,

    /// Stopping rule.
    pub termination: ShotNoise,
}

impl Simulation {
    /// Validate the inputs and derive the optical coefficients.
    ///
    /// * `params` - Scatter parameters.
    /// * `config` - Loop settings.
    /// * `table`  - Hemoglobin absorption table.
    pub fn new(
        params: &ScatterParams,
        config: &SimulationConfig,
        table: &AbsorptionTable,
    ) -> Result<Self, ScatterError> {
        params.validate()?;
        config.validate()?;

        let hemoglobin = table
            .coefficients(params.wavelength)
            .map_err(ScatterError::Coefficients)?;
        let alpha = blood_absorption(
            &hemoglobin,
            params.hemoglobin_concentration,
            params.oxygen_ratio,
        );
        let mu = ScatteringCoefficients::at(params.wavelength);
        debug!(
            "λ = {} nm: μ skin = {}, μ muscle = {}, μ bone = {}, α muscle = {}",
            params.wavelength, mu.skin, mu.muscle, mu.bone, alpha
        );

        let half_width = params.aperture_half_width;
        Ok(Self {
            params: *params,
            config: config.clone(),
            layers: LayerModel::from_params(params, config.layer_bounds),
            skin: LayerCoefficients {
                mu: mu.skin,
                alpha: 0.0,
            },
            muscle: LayerCoefficients {
                mu: mu.muscle,
                alpha,
            },
            bone: LayerCoefficients {
                mu: mu.bone,
                alpha: 0.0,
            },
            boundary: BoundaryFilter::from_params(params),
            detector1: RingDetector::new(params.detector1_distance, half_width),
            detector2: RingDetector::new(params.detector2_distance, half_width),
            source: Source::new(half_width, mu.skin),
            termination: ShotNoise::new(config.shot_noise_threshold),
        })
    }

    /// Run rounds until both detectors reach the shot noise threshold or a
    /// budget runs out.
    ///
    /// * `rng` - Random number generator.
    pub fn run(&self, rng: &mut RNG) -> Result<ScatterResult, ScatterError> {
        let config = &self.config;
        let started = Instant::now();

        let mut ensemble = Ensemble::with_capacity(config.initial_batch);
        self.source
            .inject(&mut ensemble, config.initial_batch, config.initial_amplitude, rng);
        let mut photons_injected = config.initial_batch as u64;

        let mut partition = LayerPartition::default();
        let mut tally1 = DetectorTally::default();
        let mut tally2 = DetectorTally::default();
        let mut rounds = 0;

        loop {
            self.layers.partition(&ensemble, &mut partition);
            let model = config.step_model;
            step(&mut ensemble, &partition.skin, self.skin, model, rng);
            step(&mut ensemble, &partition.muscle, self.muscle, model, rng);
            step(&mut ensemble, &partition.bone, self.bone, model, rng);

            // Detectors see the packets before the out of volume ones are dropped.
            tally1.record(self.detector1.collect(&ensemble));
            tally2.record(self.detector2.collect(&ensemble));
            let remaining = self.boundary.apply(&mut ensemble);
            rounds += 1;

            debug!(
                "round {}: detector1 = {}, detector2 = {}, {} packets in volume",
                rounds, tally1.total, tally2.total, remaining
            );

            if !self.termination.should_continue(tally1.total, tally2.total) {
                break;
            }

            let out_of_time = config
                .time_limit
                .map_or(false, |limit| started.elapsed() >= limit);
            if rounds >= config.max_rounds || out_of_time {
                return Err(self.no_convergence(rounds, photons_injected, &tally1, &tally2));
            }

            if remaining < config.replenish_floor {
                let batch = config.replenish_batch as u64;
                if photons_injected + batch > config.max_photons {
                    return Err(self.no_convergence(rounds, photons_injected, &tally1, &tally2));
                }
                self.source.inject(
                    &mut ensemble,
                    config.replenish_batch,
                    config.replenish_amplitude,
                    rng,
                );
                photons_injected += batch;
                self.boundary.apply(&mut ensemble);
            }
        }

        // Both totals are positive, so both detectors saw at least one packet.
        let result = ScatterResult {
            detector1_count: tally1.total,
            detector2_count: tally2.total,
            mean_path_length1: tally1.mean_path_length().unwrap_or(0.0),
            mean_path_length2: tally2.mean_path_length().unwrap_or(0.0),
            rounds,
            photons_injected,
        };
        info!("{}: {}", self.params, result);
        Ok(result)
    }

    fn no_convergence(
        &self,
        rounds: usize,
        photons_injected: u64,
        tally1: &DetectorTally,
        tally2: &DetectorTally,
    ) -> ScatterError {
        warn!(
            "{}: giving up after {} rounds and {} photons",
            self.params, rounds, photons_injected
        );
        ScatterError::NoConvergence {
            rounds,
            photons_injected,
            detector1: tally1.total,
            detector2: tally2.total,
        }
    }
}

/// Validate the inputs, then run one simulation.
///
/// * `params` - Scatter parameters.
/// * `config` - Loop settings.
/// * `table`  - Hemoglobin absorption table.
/// * `rng`    - Random number generator.
pub fn scatter(
    params: &ScatterParams,
    config: &SimulationConfig,
    table: &AbsorptionTable,
    rng: &mut RNG,
) -> Result<ScatterResult, ScatterError> {
    Simulation::new(params, config, table)?.run(rng)
}

#[cfg(test)]
pub(crate) fn test_config() -> SimulationConfig {
    SimulationConfig {
        initial_batch: 50_000,
        replenish_floor: 2_000,
        replenish_batch: 20_000,
        shot_noise_threshold: 0.1,
        max_rounds: 200,
        max_photons: 5_000_000,
        ..SimulationConfig::default()
    }
}

/// Unit amplitude packets in small batches, so a run takes several rounds
/// and replenishes before both detectors converge.
#[cfg(test)]
pub(crate) fn multi_round_config() -> SimulationConfig {
    SimulationConfig {
        initial_batch: 20_000,
        initial_amplitude: 1.0,
        max_rounds: 2_000,
        max_photons: 50_000_000,
        ..test_config()
    }
}
