//! Error types for the odds engine.

use crate::regime::OddsRegime;

/// Errors that can occur when configuring an odds model or evaluating
/// statistics over it.
#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    /// The regime is declared but has no roll model.
    #[error("odds regime not implemented: {0}")]
    Unimplemented(OddsRegime),

    /// Flat odds must be a finite value greater than 1.
    #[error("invalid base odds: {0} (expected a finite value > 1)")]
    InvalidBaseOdds(f64),

    /// A success probability outside `[0, 1]` or not finite.
    #[error("invalid probability: {0}")]
    InvalidProbability(f64),

    /// A regime label that could not be parsed.
    #[error("unknown odds regime: \"{0}\" (expected old, new, chain, or flat:<n>)")]
    UnknownRegime(String),
}

/// Convenience result type for odds operations.
pub type OddsResult<T> = Result<T, OddsError>;
