//! Per-phase probability state.
//!
//! A [`Progress`] caches the rolls derived from a phase's attempt count and
//! the probability of having seen no success in that many rolls. Both are
//! recomputed eagerly by every setter, so reads never observe a stale value.

use serde::{Deserialize, Serialize};

use crate::error::{OddsError, OddsResult};
use crate::regime::{self, OddsRegime};

/// Validated roll model. Unlike [`OddsRegime`] it cannot name an
/// unsupported regime.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Model {
    Flat { odds: f64 },
    Chain,
}

impl Model {
    fn from_regime(regime: OddsRegime) -> OddsResult<Self> {
        match regime {
            OddsRegime::FlatOdds { .. } => Ok(Self::Flat {
                odds: regime.base_odds()?,
            }),
            OddsRegime::ChainedOdds => Ok(Self::Chain),
            OddsRegime::Unimplemented => Err(OddsError::Unimplemented(regime)),
        }
    }

    fn odds(self) -> f64 {
        match self {
            Self::Flat { odds } => odds,
            Self::Chain => regime::CHAIN_BASE_ODDS,
        }
    }

    fn rolls(self, count: u64, has_charm: bool) -> u64 {
        match self {
            Self::Flat { .. } => regime::flat_rolls(count, has_charm),
            Self::Chain => regime::chain_rolls(count, has_charm),
        }
    }
}

/// Probability state of a single phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ProgressRecord", try_from = "ProgressRecord")]
pub struct Progress {
    model: Model,
    rolls: u64,
    has_charm: bool,
    progress: f64,
}

impl Progress {
    /// Build the state for `count` attempts under `regime`.
    pub fn new(regime: OddsRegime, count: u64, has_charm: bool) -> OddsResult<Self> {
        let model = Model::from_regime(regime)?;
        let mut progress = Self {
            model,
            rolls: 0,
            has_charm,
            progress: 1.0,
        };
        progress.set_rolls_from_count(count);
        Ok(progress)
    }

    /// The regime this state was built for.
    pub fn regime(&self) -> OddsRegime {
        match self.model {
            Model::Flat { odds } => OddsRegime::FlatOdds { base_odds: odds },
            Model::Chain => OddsRegime::ChainedOdds,
        }
    }

    /// Denominator of the per-roll success probability.
    pub fn odds(&self) -> f64 {
        self.model.odds()
    }

    /// Equivalent number of independent rolls.
    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    /// Whether the charm modifier is applied.
    pub fn has_charm(&self) -> bool {
        self.has_charm
    }

    /// Probability of no success in [`rolls`](Self::rolls) trials.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Re-derive rolls (and the cached probability) from an attempt count.
    pub fn set_rolls_from_count(&mut self, count: u64) {
        self.rolls = self.model.rolls(count, self.has_charm);
        self.progress = survival(1.0 / self.model.odds(), self.rolls);
    }

    /// Toggle the charm, rescaling from the current `count`.
    pub fn set_charm(&mut self, has_charm: bool, count: u64) {
        self.has_charm = has_charm;
        self.set_rolls_from_count(count);
    }
}

/// Probability of zero successes in `rolls` independent trials at `p`.
///
/// Evaluated in log space so that millions of rolls at small `p` keep full
/// precision.
pub fn survival(p: f64, rolls: u64) -> f64 {
    if rolls == 0 {
        return 1.0;
    }
    ((rolls as f64) * (-p).ln_1p()).exp().clamp(0.0, 1.0)
}

/// Serialized form of [`Progress`], tagged by regime.
///
/// `rolls` and `progress` are written for readers of the file; on load the
/// progress is recomputed from `rolls`, and owners that know the attempt
/// count re-derive the rolls as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ProgressRecord {
    FlatOdds {
        odds: f64,
        rolls: u64,
        has_charm: bool,
        progress: f64,
    },
    ChainedOdds {
        rolls: u64,
        has_charm: bool,
        progress: f64,
    },
}

impl From<Progress> for ProgressRecord {
    fn from(p: Progress) -> Self {
        match p.model {
            Model::Flat { odds } => Self::FlatOdds {
                odds,
                rolls: p.rolls,
                has_charm: p.has_charm,
                progress: p.progress,
            },
            Model::Chain => Self::ChainedOdds {
                rolls: p.rolls,
                has_charm: p.has_charm,
                progress: p.progress,
            },
        }
    }
}

impl TryFrom<ProgressRecord> for Progress {
    type Error = OddsError;

    fn try_from(record: ProgressRecord) -> Result<Self, Self::Error> {
        let (regime, rolls, has_charm) = match record {
            ProgressRecord::FlatOdds {
                odds,
                rolls,
                has_charm,
                ..
            } => (OddsRegime::FlatOdds { base_odds: odds }, rolls, has_charm),
            ProgressRecord::ChainedOdds {
                rolls, has_charm, ..
            } => (OddsRegime::ChainedOdds, rolls, has_charm),
        };
        let model = Model::from_regime(regime)?;
        Ok(Self {
            model,
            rolls,
            has_charm,
            progress: survival(1.0 / model.odds(), rolls),
        })
    }
}
