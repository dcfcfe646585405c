pub mod charm;
pub mod complete;
pub mod count;
pub mod list;
pub mod luck;
pub mod new;
pub mod odds;
pub mod phase;
pub mod remove;
pub mod rename;
pub mod show;
pub mod time;
pub mod timer;

use std::time::Duration;

use colored::{ColoredString, Colorize};
use hl_core::{CampaignId, ChangeLog, Population, TrackerConfig, store};
use hl_odds::OddsRegime;

/// Population as loaded by the CLI. The change log tells whether a command
/// actually modified anything.
type Hunts = Population<ChangeLog>;

/// Load the save file, or start empty when it does not exist yet.
fn load(config: &TrackerConfig) -> Result<Hunts, String> {
    let path = &config.save_path;
    if !path.exists() {
        return Ok(Population::with_observer(ChangeLog::new()));
    }
    store::load(path)
        .and_then(|file| file.into_population(ChangeLog::new()))
        .map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Write the population back if any change was recorded.
fn save(config: &TrackerConfig, hunts: &Hunts) -> Result<(), String> {
    if hunts.observer().is_empty() {
        return Ok(());
    }
    store::save(&config.save_path, hunts)
        .map_err(|e| format!("cannot write {}: {e}", config.save_path.display()))
}

/// Look up a campaign by name (case-insensitive).
fn find(hunts: &Hunts, name: &str) -> Result<CampaignId, String> {
    hunts
        .find_by_name(name)
        .map(|c| c.id())
        .ok_or_else(|| format!("campaign not found: \"{name}\""))
}

/// Parse an `--odds` value, falling back to `default`.
fn parse_odds(odds: Option<&str>, default: OddsRegime) -> Result<OddsRegime, String> {
    let regime = match odds {
        Some(s) => s.parse::<OddsRegime>().map_err(|e| e.to_string())?,
        None => default,
    };
    regime.validate().map_err(|e| e.to_string())
}

/// Convert a 1-based phase number from the command line to an index.
fn phase_index(phase: usize) -> Result<usize, String> {
    phase
        .checked_sub(1)
        .ok_or_else(|| "phases are numbered from 1".to_string())
}

/// `1h 02m 03s` style duration.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

/// Chance of having found it by now, coloured like a progress bar: green
/// under one half, yellow while still under the base odds, then orange and
/// red as the hunt runs long.
fn format_progress(progress: f64, count: u64, regime: OddsRegime) -> ColoredString {
    let fraction = (1.0 - progress).clamp(0.0, 1.0);
    let text = format!("{:.3}%", fraction * 100.0);
    let under_odds = match regime {
        OddsRegime::FlatOdds { base_odds } => (count as f64) < base_odds,
        _ => false,
    };
    if fraction < 0.5 {
        text.green()
    } else if under_odds {
        text.yellow()
    } else if fraction < 0.75 {
        text.truecolor(255, 165, 0)
    } else {
        text.red()
    }
}
