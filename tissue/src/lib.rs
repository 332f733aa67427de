//! Monte Carlo photon transport through layered tissue.

#[macro_use]
extern crate log;

mod boundary;
mod config;
mod detector;
mod ensemble;
mod error;
mod layer;
mod params;
mod simulation;
mod source;
mod stepper;
mod termination;

pub mod inversion;
pub mod progress;
pub mod sweep;

// Re-export.
pub use boundary::*;
pub use config::*;
pub use detector::*;
pub use ensemble::*;
pub use error::*;
pub use layer::*;
pub use params::*;
pub use simulation::*;
pub use source::*;
pub use stepper::*;
pub use termination::*;
