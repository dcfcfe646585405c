use std::path::PathBuf;
use std::time::Duration;

use hl_odds::{NEW_ODDS, OddsRegime};

use crate::error::CoreResult;

/// Shortest tick interval a [`Ticker`](crate::Ticker) is started with.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Tracker settings shared by front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Regime for new campaigns and phases when none is given.
    pub default_regime: OddsRegime,
    /// How often the ticker posts elapsed time.
    pub tick_interval: Duration,
    /// Where the save file lives.
    pub save_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_regime: NEW_ODDS,
            tick_interval: Duration::from_secs(1),
            save_path: PathBuf::from("huntlog.json"),
        }
    }
}

impl TrackerConfig {
    /// Set the regime used when none is given.
    pub fn with_default_regime(mut self, regime: OddsRegime) -> Self {
        self.default_regime = regime;
        self
    }

    /// Set the ticker interval. Clamped to [`MIN_TICK_INTERVAL`].
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(MIN_TICK_INTERVAL);
        self
    }

    /// Set the save file location.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }

    /// Check that the default regime can actually be counted under.
    pub fn validate(&self) -> CoreResult<()> {
        self.default_regime.validate()?;
        Ok(())
    }
}
