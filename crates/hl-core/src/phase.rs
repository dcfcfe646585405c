//! A single lockable run of attempts.
//!
//! While a phase is completed its counters are frozen: count, time, charm,
//! and regime mutators return `None` and change nothing. Renaming and the
//! completion flag itself stay writable so a phase can be reopened.

use std::time::Duration;

use hl_odds::{OddsRegime, Progress};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::notify::Field;

/// One contiguous run of attempts within a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PhaseRecord")]
pub struct Phase {
    name: String,
    count: u64,
    elapsed: Duration,
    progress: Progress,
    is_completed: bool,
}

impl Phase {
    /// Create an empty, unlocked phase.
    pub fn new(name: impl Into<String>, regime: OddsRegime) -> CoreResult<Self> {
        Self::with_charm(name, regime, false)
    }

    /// Create an empty, unlocked phase with the charm already applied.
    pub fn with_charm(
        name: impl Into<String>,
        regime: OddsRegime,
        has_charm: bool,
    ) -> CoreResult<Self> {
        Ok(Self {
            name: name.into(),
            count: 0,
            elapsed: Duration::ZERO,
            progress: Progress::new(regime, 0, has_charm)?,
            is_completed: false,
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw attempt count.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Time spent on this phase.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether this phase is locked.
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Probability of no success so far.
    pub fn progress(&self) -> f64 {
        self.progress.progress()
    }

    /// The regime this phase is counted under.
    pub fn progress_type(&self) -> OddsRegime {
        self.progress.regime()
    }

    /// Equivalent independent rolls.
    pub fn rolls(&self) -> u64 {
        self.progress.rolls()
    }

    /// Per-roll odds denominator of this phase's regime.
    pub fn odds(&self) -> f64 {
        self.progress.odds()
    }

    /// Whether the charm is applied.
    pub fn has_charm(&self) -> bool {
        self.progress.has_charm()
    }

    /// Full probability state.
    pub fn progress_state(&self) -> &Progress {
        &self.progress
    }

    /// Add `delta` attempts. `delta` may be negative but may not take the
    /// count below zero.
    pub fn increase_by(&mut self, delta: i64) -> CoreResult<Option<Field>> {
        if self.is_completed {
            return Ok(None);
        }
        let count = self.count.checked_add_signed(delta).ok_or_else(|| {
            warn!(phase = %self.name, count = self.count, delta, "rejected count change");
            CoreError::InvariantViolation(format!(
                "count of {} cannot change by {delta} from {}",
                self.name, self.count
            ))
        })?;
        Ok(self.set_count(count))
    }

    /// Overwrite the attempt count.
    pub fn set_count(&mut self, count: u64) -> Option<Field> {
        if self.is_completed {
            return None;
        }
        self.count = count;
        self.progress.set_rolls_from_count(count);
        Some(Field::Count)
    }

    /// Add elapsed time.
    pub fn add_time(&mut self, time: Duration) -> Option<Field> {
        if self.is_completed {
            return None;
        }
        self.elapsed = self.elapsed.saturating_add(time);
        Some(Field::Time)
    }

    /// Overwrite the elapsed time.
    pub fn set_time(&mut self, time: Duration) -> Option<Field> {
        if self.is_completed {
            return None;
        }
        self.elapsed = time;
        Some(Field::Time)
    }

    /// Lock (`true`) or unlock (`false`) the phase.
    pub fn set_completed(&mut self, is_completed: bool) -> Field {
        self.is_completed = is_completed;
        Field::IsCompleted
    }

    /// Rename the phase.
    pub fn rename(&mut self, name: impl Into<String>) -> Field {
        self.name = name.into();
        Field::Name
    }

    /// Toggle the charm, rescaling rolls from the current count.
    pub fn set_charm(&mut self, has_charm: bool) -> Option<Field> {
        if self.is_completed {
            return None;
        }
        self.progress.set_charm(has_charm, self.count);
        Some(Field::HasCharm)
    }

    /// Recount this phase under a different regime, keeping the charm.
    pub fn set_regime(&mut self, regime: OddsRegime) -> CoreResult<Option<Field>> {
        if self.is_completed {
            return Ok(None);
        }
        self.progress = Progress::new(regime, self.count, self.progress.has_charm())?;
        Ok(Some(Field::ProgressType))
    }
}

/// Wire form of a [`Phase`]. Rolls are re-derived from `count` on load so a
/// stale or hand-edited file cannot desynchronise them.
#[derive(Deserialize)]
struct PhaseRecord {
    name: String,
    count: u64,
    elapsed: Duration,
    progress: Progress,
    is_completed: bool,
}

impl From<PhaseRecord> for Phase {
    fn from(record: PhaseRecord) -> Self {
        let mut progress = record.progress;
        progress.set_rolls_from_count(record.count);
        Self {
            name: record.name,
            count: record.count,
            elapsed: record.elapsed,
            progress,
            is_completed: record.is_completed,
        }
    }
}
