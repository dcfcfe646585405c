//! Odds engine for Huntlog.
//!
//! Converts raw attempt counts into equivalent independent rolls under an
//! odds regime, evaluates the probability of no success so far, and
//! provides the binomial distribution used to pool luck across campaigns.

/// Binomial CDF via the regularized incomplete beta function.
pub mod binomial;
/// Error types for the odds engine.
pub mod error;
/// Cached per-phase probability state.
pub mod progress;
/// Odds regimes and their roll models.
pub mod regime;

/// Re-export of the binomial CDF.
pub use binomial::binomial_cdf;
/// Re-export error types.
pub use error::{OddsError, OddsResult};
/// Re-export progress types.
pub use progress::{Progress, survival};
/// Re-export regime types and the standing flat-odds configurations.
pub use regime::{CHAIN_BASE_ODDS, NEW_ODDS, OLD_ODDS, OddsRegime};
