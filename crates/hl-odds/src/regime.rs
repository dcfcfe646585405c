//! Odds regimes and their roll models.
//!
//! A regime decides two things: how many independent trials ("rolls") a raw
//! attempt count is worth, and the per-trial success probability.
//!
//! - **Flat odds**: every attempt is one roll at `1/base_odds`; the charm
//!   triples the rolls.
//! - **Chained odds**: attempts deeper in a chain are worth more rolls at a
//!   fixed `1/4096`; the charm adds two rolls per attempt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OddsError, OddsResult};

/// Base odds of the chained regime.
pub const CHAIN_BASE_ODDS: f64 = 4096.0;

/// The historical full odds, 1/8192.
pub const OLD_ODDS: OddsRegime = OddsRegime::FlatOdds { base_odds: 8192.0 };

/// The current full odds, 1/4096.
pub const NEW_ODDS: OddsRegime = OddsRegime::FlatOdds { base_odds: 4096.0 };

/// Roll multiplier applied to flat odds while the charm is held.
const FLAT_CHARM_FACTOR: u64 = 3;

/// Extra rolls per chained attempt while the charm is held.
const CHAIN_CHARM_BONUS: u64 = 2;

/// Chain depth brackets: `(first step, last step, rolls per step)`.
/// Steps past the last bracket are worth [`CHAIN_TAIL_WEIGHT`].
const CHAIN_BRACKETS: [(u64, u64, u64); 3] = [(0, 10, 1), (11, 20, 5), (21, 30, 9)];

/// Rolls per step beyond step 30.
const CHAIN_TAIL_WEIGHT: u64 = 13;

/// The odds model governing a phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OddsRegime {
    /// One roll per attempt at a fixed `1/base_odds`.
    FlatOdds {
        /// Denominator of the per-roll success probability.
        base_odds: f64,
    },
    /// Escalating rolls per attempt at a fixed `1/4096`.
    ChainedOdds,
    /// Declared but unsupported. Rejected wherever a model is built.
    Unimplemented,
}

impl OddsRegime {
    /// Check that this regime can back a roll model.
    pub fn validate(self) -> OddsResult<Self> {
        self.base_odds().map(|_| self)
    }

    /// Denominator of the per-roll success probability.
    pub fn base_odds(self) -> OddsResult<f64> {
        match self {
            Self::FlatOdds { base_odds } if base_odds.is_finite() && base_odds > 1.0 => {
                Ok(base_odds)
            }
            Self::FlatOdds { base_odds } => Err(OddsError::InvalidBaseOdds(base_odds)),
            Self::ChainedOdds => Ok(CHAIN_BASE_ODDS),
            Self::Unimplemented => Err(OddsError::Unimplemented(self)),
        }
    }

    /// Per-roll success probability, `1 / base_odds`.
    pub fn success_probability(self) -> OddsResult<f64> {
        self.base_odds().map(|odds| 1.0 / odds)
    }

    /// Whether every phase of a campaign under this regime is a separate
    /// completion. Chained campaigns complete once, however many phases
    /// they hold.
    pub fn has_phases(self) -> bool {
        matches!(self, Self::FlatOdds { .. })
    }

    /// Whether this regime escalates along a chain.
    pub fn is_chain(self) -> bool {
        matches!(self, Self::ChainedOdds)
    }

    /// Number of equivalent rolls for `count` attempts.
    pub fn rolls_for(self, count: u64, has_charm: bool) -> OddsResult<u64> {
        self.validate()?;
        Ok(match self {
            Self::FlatOdds { .. } => flat_rolls(count, has_charm),
            _ => chain_rolls(count, has_charm),
        })
    }
}

/// Rolls under flat odds: one per attempt, tripled by the charm.
pub(crate) fn flat_rolls(count: u64, has_charm: bool) -> u64 {
    if has_charm {
        count.saturating_mul(FLAT_CHARM_FACTOR)
    } else {
        count
    }
}

/// Rolls under chained odds for steps `0..count`.
///
/// Evaluated per bracket rather than per step so large chains cost the same
/// as short ones.
pub(crate) fn chain_rolls(count: u64, has_charm: bool) -> u64 {
    let mut rolls = CHAIN_BRACKETS
        .iter()
        .map(|&(first, last, weight)| {
            let steps = count.min(last + 1).saturating_sub(first);
            steps * weight
        })
        .sum::<u64>();

    let tail_start = CHAIN_BRACKETS[CHAIN_BRACKETS.len() - 1].1 + 1;
    rolls = rolls.saturating_add(
        count
            .saturating_sub(tail_start)
            .saturating_mul(CHAIN_TAIL_WEIGHT),
    );

    if has_charm {
        rolls = rolls.saturating_add(count.saturating_mul(CHAIN_CHARM_BONUS));
    }
    rolls
}

impl fmt::Display for OddsRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::FlatOdds { base_odds } if base_odds == 8192.0 => write!(f, "old odds (1/8192)"),
            Self::FlatOdds { base_odds } if base_odds == 4096.0 => write!(f, "new odds (1/4096)"),
            Self::FlatOdds { base_odds } => write!(f, "flat odds (1/{base_odds})"),
            Self::ChainedOdds => write!(f, "chain (1/{CHAIN_BASE_ODDS})"),
            Self::Unimplemented => write!(f, "unimplemented"),
        }
    }
}

impl FromStr for OddsRegime {
    type Err = OddsError;

    /// Parse `old`, `new`, `chain`, `flat:<n>`, or `unimplemented`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        match tag.as_str() {
            "old" => Ok(OLD_ODDS),
            "new" => Ok(NEW_ODDS),
            "chain" => Ok(Self::ChainedOdds),
            "unimplemented" => Ok(Self::Unimplemented),
            other => {
                let base_odds = other
                    .strip_prefix("flat:")
                    .and_then(|n| n.parse::<f64>().ok())
                    .ok_or_else(|| OddsError::UnknownRegime(s.to_string()))?;
                Ok(Self::FlatOdds { base_odds })
            }
        }
    }
}
