#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod app;

use app::*;
use optics::absorption::AbsorptionTable;
use optics::rng::RNG;
use tissue::inversion::invert;
use tissue::sweep::*;
use tissue::*;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    // In case of error report it and exit.
    if let Err(e) = run(&OPTIONS) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), ScatterError> {
    let table = match &options.table_file {
        Some(path) => AbsorptionTable::from_file(path).map_err(ScatterError::Table)?,
        None => AbsorptionTable::default(),
    };

    match &options.command {
        Command::Scatter(args) => {
            let mut rng = RNG::new(options.seed);
            let result = scatter(&args.params(), &options.config(), &table, &mut rng)?;
            println!("{result}");
        }
        Command::Spectrum {
            params,
            start,
            end,
            steps,
        } => {
            let jobs = spectrum(&params.params(), SweepRange::new(*start, *end, *steps));
            print_points(&run_sweep(&jobs, &table, &options.sweep_options())?);
        }
        Command::Oxygen {
            params,
            start,
            end,
            steps,
        } => {
            let jobs = oxygen_ratios(&params.params(), SweepRange::new(*start, *end, *steps));
            print_points(&run_sweep(&jobs, &table, &options.sweep_options())?);
        }
        Command::Concentration {
            params,
            start,
            end,
            steps,
        } => {
            let jobs = concentrations(&params.params(), SweepRange::new(*start, *end, *steps));
            print_points(&run_sweep(&jobs, &table, &options.sweep_options())?);
        }
        Command::Scan {
            params,
            wavelength_start,
            wavelength_end,
            wavelength_steps,
            concentration_start,
            concentration_end,
            concentration_steps,
            ratio_start,
            ratio_end,
            ratio_steps,
        } => {
            let jobs = scan(
                &params.params(),
                SweepRange::new(*wavelength_start, *wavelength_end, *wavelength_steps),
                SweepRange::new(*concentration_start, *concentration_end, *concentration_steps),
                SweepRange::new(*ratio_start, *ratio_end, *ratio_steps),
            );
            print_points(&run_sweep(&jobs, &table, &options.sweep_options())?);
        }
        Command::Invert {
            params,
            wavelengths,
        } => {
            let wavelengths = three(wavelengths, "wavelengths")?;
            let base = params.params();
            let jobs = wavelengths.map(|wavelength| ScatterParams { wavelength, ..base });
            let points = run_sweep(&jobs, &table, &options.sweep_options())?;
            print_points(&points);

            let estimate = invert(&points, &table)?;
            println!(
                "ratio = {:.4}, concentration = {:.4}",
                estimate.ratio, estimate.concentration
            );
        }
    }

    Ok(())
}

/// Returns the values as an array of exactly three.
///
/// * `values` - The values.
/// * `name`   - Name used in the error message.
fn three<T: Copy>(values: &[T], name: &'static str) -> Result<[T; 3], ScatterError> {
    <[T; 3]>::try_from(values).map_err(|_| ScatterError::InvalidConfig {
        name,
        reason: format!("expected 3 values, got {}", values.len()),
    })
}

fn print_points(points: &[SweepPoint]) {
    println!("wavelength\tconcentration\tratio\tdetector1\tdetector2\tpath1\tpath2");
    for p in points {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            p.params.wavelength,
            p.params.hemoglobin_concentration,
            p.params.oxygen_ratio,
            p.result.detector1_count,
            p.result.detector2_count,
            p.result.mean_path_length1,
            p.result.mean_path_length2
        );
    }
}
