//! Application related stuff

use clap::{Args, Parser, Subcommand};
use optics::Float;
use tissue::*;

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// System wide options.
#[derive(Parser, Clone)]
#[command(author, version, about = "Monte Carlo light transport through skin, muscle and bone.", long_about = None)]
pub struct Options {
    /// Number of threads to use for sweeps.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 1,
        global = true,
        help = "Use specified number of threads for sweeps."
    )]
    n_threads: usize,

    /// Random stream of the first run.
    #[arg(
        long,
        short = 's',
        value_name = "NUM",
        default_value_t = 0,
        global = true,
        help = "Seed of the first run. Sweep job i uses seed + i."
    )]
    pub seed: u64,

    /// Path to an absorption table.
    #[arg(
        long = "table",
        value_name = "FILE",
        global = true,
        help = "Read hemoglobin extinction coefficients from the given file."
    )]
    pub table_file: Option<String>,

    /// Relative shot noise threshold.
    #[arg(
        long,
        value_name = "FLOAT",
        global = true,
        help = "Stop once sqrt(N)/N is at most this value at both detectors."
    )]
    pub threshold: Option<Float>,

    /// Round budget.
    #[arg(long = "max-rounds", value_name = "NUM", global = true)]
    pub max_rounds: Option<usize>,

    /// Number of packets injected at the start of a run.
    #[arg(long = "initial-batch", value_name = "NUM", global = true)]
    pub initial_batch: Option<usize>,

    /// Stack layers by cumulative depth.
    #[arg(long = "cumulative-layers", global = true)]
    pub cumulative_layers: bool,

    /// Accumulate positions and use distinct x and y directions.
    #[arg(long = "corrected-steps", global = true)]
    pub corrected_steps: bool,

    /// Suppress progress output.
    #[arg(long, global = true, help = "Suppress progress output.")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => {
                warn!("Invalid nthreads");
                1
            }
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the simulation settings selected on the command line.
    pub fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        if let Some(threshold) = self.threshold {
            config.shot_noise_threshold = threshold;
        }
        if let Some(max_rounds) = self.max_rounds {
            config.max_rounds = max_rounds;
        }
        if let Some(initial_batch) = self.initial_batch {
            config.initial_batch = initial_batch;
        }
        if self.cumulative_layers {
            config.layer_bounds = LayerBounds::Cumulative;
        }
        if self.corrected_steps {
            config.step_model = StepModel {
                placement: Placement::Accumulate,
                direction: Direction::Spherical,
            };
        }
        config
    }

    /// Returns the sweep settings selected on the command line.
    pub fn sweep_options(&self) -> tissue::sweep::SweepOptions {
        tissue::sweep::SweepOptions {
            config: self.config(),
            seed: self.seed,
            threads: self.threads(),
            quiet: self.quiet,
        }
    }
}

/// Subcommands.
#[derive(Subcommand, Clone)]
pub enum Command {
    /// Run a single simulation.
    Scatter(ParamArgs),

    /// Sweep the wavelength.
    Spectrum {
        #[command(flatten)]
        params: ParamArgs,

        /// First wavelength (nm).
        #[arg(long, default_value_t = 450.0)]
        start: Float,

        /// Last wavelength (nm).
        #[arg(long, default_value_t = 1000.0)]
        end: Float,

        /// Number of wavelengths.
        #[arg(long, default_value_t = 12)]
        steps: usize,
    },

    /// Sweep the oxygenation ratio.
    Oxygen {
        #[command(flatten)]
        params: ParamArgs,

        /// First ratio.
        #[arg(long, default_value_t = 0.0)]
        start: Float,

        /// Last ratio.
        #[arg(long, default_value_t = 1.0)]
        end: Float,

        /// Number of ratios.
        #[arg(long, default_value_t = 11)]
        steps: usize,
    },

    /// Sweep the hemoglobin concentration.
    Concentration {
        #[command(flatten)]
        params: ParamArgs,

        /// First concentration.
        #[arg(long, default_value_t = 0.05)]
        start: Float,

        /// Last concentration.
        #[arg(long, default_value_t = 0.3)]
        end: Float,

        /// Number of concentrations.
        #[arg(long, default_value_t = 6)]
        steps: usize,
    },

    /// Sweep the full wavelength x concentration x ratio grid.
    Scan {
        #[command(flatten)]
        params: ParamArgs,

        #[arg(long = "wavelength-start", default_value_t = 450.0)]
        wavelength_start: Float,

        #[arg(long = "wavelength-end", default_value_t = 900.0)]
        wavelength_end: Float,

        #[arg(long = "wavelength-steps", default_value_t = 3)]
        wavelength_steps: usize,

        #[arg(long = "concentration-start", default_value_t = 0.05)]
        concentration_start: Float,

        #[arg(long = "concentration-end", default_value_t = 0.25)]
        concentration_end: Float,

        #[arg(long = "concentration-steps", default_value_t = 3)]
        concentration_steps: usize,

        #[arg(long = "ratio-start", default_value_t = 0.0)]
        ratio_start: Float,

        #[arg(long = "ratio-end", default_value_t = 1.0)]
        ratio_end: Float,

        #[arg(long = "ratio-steps", default_value_t = 3)]
        ratio_steps: usize,
    },

    /// Run three wavelengths and estimate oxygenation and concentration.
    Invert {
        #[command(flatten)]
        params: ParamArgs,

        /// The three wavelengths (nm).
        #[arg(
            long = "wavelengths",
            value_name = "NM",
            num_args = 3,
            default_values_t = [450.0, 660.0, 900.0]
        )]
        wavelengths: Vec<Float>,
    },
}

/// Physical parameters of a run. Lengths are in centimeters.
#[derive(Args, Clone, Debug)]
pub struct ParamArgs {
    /// Wavelength (nm).
    #[arg(long, default_value_t = 660.0)]
    pub wavelength: Float,

    /// Distance to the near detector.
    #[arg(long = "detector1", default_value_t = 0.1)]
    pub detector1_distance: Float,

    /// Distance to the far detector.
    #[arg(long = "detector2", default_value_t = 0.3)]
    pub detector2_distance: Float,

    /// Half-width of the source and the detector rings.
    #[arg(long = "half-width", default_value_t = 0.05)]
    pub aperture_half_width: Float,

    /// Skin thickness.
    #[arg(long, default_value_t = 0.05)]
    pub skin: Float,

    /// Muscle thickness.
    #[arg(long, default_value_t = 1.0)]
    pub muscle: Float,

    /// Bone thickness.
    #[arg(long, default_value_t = 3.0)]
    pub bone: Float,

    /// Hemoglobin concentration.
    #[arg(long, default_value_t = 0.150)]
    pub concentration: Float,

    /// Oxygenated fraction of hemoglobin.
    #[arg(long, default_value_t = 0.9)]
    pub ratio: Float,
}

impl ParamArgs {
    /// Returns the scatter parameters.
    pub fn params(&self) -> ScatterParams {
        ScatterParams {
            wavelength: self.wavelength,
            detector1_distance: self.detector1_distance,
            detector2_distance: self.detector2_distance,
            aperture_half_width: self.aperture_half_width,
            skin_thickness: self.skin,
            muscle_thickness: self.muscle,
            bone_thickness: self.bone,
            hemoglobin_concentration: self.concentration,
            oxygen_ratio: self.ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_defaults_match_example() {
        let options = Options::try_parse_from(["tissue-scatter", "scatter"]).unwrap();
        match options.command {
            Command::Scatter(ref args) => assert_eq!(args.params(), ScatterParams::example()),
            _ => panic!("expected scatter"),
        }
        assert_eq!(options.config(), SimulationConfig::default());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let options = Options::try_parse_from([
            "tissue-scatter",
            "spectrum",
            "--steps",
            "3",
            "--threshold",
            "0.05",
            "--seed",
            "9",
            "--cumulative-layers",
        ])
        .unwrap();
        let config = options.config();
        assert_eq!(config.shot_noise_threshold, 0.05);
        assert_eq!(config.layer_bounds, LayerBounds::Cumulative);
        assert_eq!(options.seed, 9);
        assert!(matches!(options.command, Command::Spectrum { steps: 3, .. }));
    }

    #[test]
    fn invert_takes_three_wavelengths() {
        let options = Options::try_parse_from([
            "tissue-scatter",
            "invert",
            "--wavelengths",
            "500",
            "600",
            "700",
        ])
        .unwrap();
        match options.command {
            Command::Invert { wavelengths, .. } => assert_eq!(wavelengths, vec![500.0, 600.0, 700.0]),
            _ => panic!("expected invert"),
        }
    }

    #[test]
    fn zero_threads_falls_back_to_one() {
        let options = Options::try_parse_from(["tissue-scatter", "-t", "0", "scatter"]).unwrap();
        assert_eq!(options.threads(), 1);
    }
}
