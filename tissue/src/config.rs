//! Simulation Configuration

use crate::error::*;
use crate::layer::LayerBounds;
use crate::stepper::StepModel;
use optics::Float;
use std::time::Duration;

/// Tunable constants of the transport loop.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of packets injected at the start of a run.
    pub initial_batch: usize,

    /// Amplitude of the initial packets.
    pub initial_amplitude: Float,

    /// Replenish when fewer packets than this remain in the volume.
    pub replenish_floor: usize,

    /// Number of packets injected per replenishment.
    pub replenish_batch: usize,

    /// Amplitude of replenished packets. Defaults to 1, unlike the initial
    /// amplitude of 100.
    pub replenish_amplitude: Float,

    /// Relative shot noise `sqrt(N)/N` required at both detectors.
    pub shot_noise_threshold: Float,

    /// Maximum number of rounds before giving up.
    pub max_rounds: usize,

    /// Maximum number of packets injected over a run before giving up.
    pub max_photons: u64,

    /// Optional wall clock limit for one run.
    pub time_limit: Option<Duration>,

    /// How z is mapped onto layers.
    pub layer_bounds: LayerBounds,

    /// How a scattering step moves a packet.
    pub step_model: StepModel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_batch: 5_000_000,
            initial_amplitude: 100.0,
            replenish_floor: 100_000,
            replenish_batch: 5_000_000,
            replenish_amplitude: 1.0,
            shot_noise_threshold: 0.01,
            max_rounds: 1_000,
            max_photons: 500_000_000,
            time_limit: None,
            layer_bounds: LayerBounds::default(),
            step_model: StepModel::default(),
        }
    }
}

impl SimulationConfig {
    /// Check the settings.
    pub fn validate(&self) -> Result<(), ScatterError> {
        let counts = [
            ("initial_batch", self.initial_batch),
            ("replenish_batch", self.replenish_batch),
            ("max_rounds", self.max_rounds),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ScatterError::InvalidConfig {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let amplitudes = [
            ("initial_amplitude", self.initial_amplitude),
            ("replenish_amplitude", self.replenish_amplitude),
        ];
        for (name, value) in amplitudes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScatterError::InvalidConfig {
                    name,
                    reason: format!("{value} is not a positive amplitude"),
                });
            }
        }

        if !(self.shot_noise_threshold.is_finite() && self.shot_noise_threshold >= 0.0) {
            return Err(ScatterError::InvalidConfig {
                name: "shot_noise_threshold",
                reason: format!("{} is not a non-negative number", self.shot_noise_threshold),
            });
        }

        if (self.initial_batch as u64) > self.max_photons {
            return Err(ScatterError::InvalidConfig {
                name: "max_photons",
                reason: format!(
                    "budget {} is smaller than the initial batch {}",
                    self.max_photons, self.initial_batch
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_batches() {
        let config = SimulationConfig {
            replenish_batch: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScatterError::InvalidConfig {
                name: "replenish_batch",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_threshold_and_amplitude() {
        let config = SimulationConfig {
            shot_noise_threshold: -0.1,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            initial_amplitude: 0.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn budget_must_cover_initial_batch() {
        let config = SimulationConfig {
            max_photons: 10,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
