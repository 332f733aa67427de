//! Errors

use optics::Float;
use thiserror::Error;

/// Errors returned by a scatter simulation. A run either completes with both
/// detector outputs or fails with one of these; there are no partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScatterError {
    /// A physical input parameter is outside its valid domain.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: Float,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A simulation setting is unusable.
    #[error("invalid configuration '{name}': {reason}")]
    InvalidConfig {
        /// Setting name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Optical coefficients are unavailable for the requested wavelength.
    #[error("coefficients unavailable: {0}")]
    Coefficients(String),

    /// The shot noise threshold was not reached within the configured budget.
    #[error(
        "no convergence after {rounds} rounds and {photons_injected} photons \
         (detector 1 = {detector1}, detector 2 = {detector2})"
    )]
    NoConvergence {
        /// Rounds completed.
        rounds: usize,
        /// Photon packets injected in total.
        photons_injected: u64,
        /// Detector 1 total when the budget ran out.
        detector1: Float,
        /// Detector 2 total when the budget ran out.
        detector2: Float,
    },

    /// An absorption table could not be loaded.
    #[error("absorption table: {0}")]
    Table(String),

    /// Detector measurements cannot be inverted.
    #[error("inversion failed: {0}")]
    Inversion(String),
}
