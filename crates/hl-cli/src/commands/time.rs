use std::time::Duration;

use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig, name: &str, time: Duration, total: bool) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    if total {
        hunts.set_time(id, time).map_err(|e| e.to_string())?;
    } else {
        hunts.add_time(id, time).map_err(|e| e.to_string())?;
    }

    if hunts.observer().is_empty() {
        println!("  {name} is completed; reopen it to track time.");
        return Ok(());
    }
    super::save(config, &hunts)?;

    let elapsed = hunts.get(id).map(|c| c.get_time()).unwrap_or_default();
    println!("  {name}: {}", super::format_duration(elapsed));
    Ok(())
}
