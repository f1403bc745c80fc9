//! Error taxonomy for the analysis engine.

use std::time::Duration;
use thiserror::Error;

/// Errors produced by the analysis engine.
///
/// Every failure is returned to the caller as an explicit result value;
/// the engine never logs-and-swallows a failure and never emits star
/// records with undefined numeric fields.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Detection exceeded its time budget at a phase checkpoint.
    ///
    /// No partial star list is returned.
    #[error("detection exceeded {budget:?} time budget after {phase}")]
    Timeout {
        /// The caller-supplied time budget.
        budget: Duration,
        /// Name of the phase whose checkpoint tripped.
        phase: &'static str,
    },

    /// Buffer or configuration failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Analysis completed but produced no usable stars.
    ///
    /// A normal, non-fatal empty result. Distinct from [`EngineError::InvalidInput`].
    #[error("no usable stars in analysis")]
    NoData,
}

/// Standard result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
