use std::thread;
use std::time::{Duration, Instant};

use colored::Colorize;
use hl_core::{Selection, Ticker, TimeFeed, TrackerConfig};
use tracing::debug;

/// Run a ticker against the named (or active) campaign for `length`.
pub fn run(config: &TrackerConfig, name: Option<&str>, length: Duration) -> Result<(), String> {
    let mut hunts = super::load(config)?;

    let id = match name {
        Some(name) => {
            let id = super::find(&hunts, name)?;
            hunts
                .set_active(vec![Selection::Campaign(id)])
                .map_err(|e| e.to_string())?;
            id
        }
        None => hunts
            .first_active()
            .map(Selection::campaign)
            .ok_or("no active campaign; name one or start one with `huntlog new`")?,
    };
    let label = hunts
        .get(id)
        .map(|c| c.name().to_string())
        .unwrap_or_default();

    println!(
        "  {} {} for {}",
        "Timing".green(),
        label.bold(),
        super::format_duration(length)
    );

    let (sender, feed) = TimeFeed::channel();
    let ticker = Ticker::spawn(config.tick_interval, sender);
    let deadline = Instant::now() + length;
    let mut applied = Duration::ZERO;

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(config.tick_interval.min(deadline - now));
        applied += hunts.drain_time(&feed).map_err(|e| e.to_string())?;
    }
    ticker.stop();
    applied += hunts.drain_time(&feed).map_err(|e| e.to_string())?;
    debug!(?applied, "timer finished");

    super::save(config, &hunts)?;
    let total = hunts.get(id).map(|c| c.get_time()).unwrap_or_default();
    println!(
        "  {label}: +{} ({} total)",
        super::format_duration(applied),
        super::format_duration(total)
    );
    Ok(())
}
