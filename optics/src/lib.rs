//! Optics

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;
#[macro_use]
extern crate pest_derive;

pub mod absorption;
pub mod common;
pub mod rng;
pub mod sampling;
pub mod scattering;
pub mod table;

// Re-export.
pub use common::Float;
