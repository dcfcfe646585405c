use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig, name: &str, on: bool) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    hunts.set_charm(id, on).map_err(|e| e.to_string())?;

    if hunts.observer().is_empty() {
        println!("  {name} is completed; the charm was not changed.");
        return Ok(());
    }
    super::save(config, &hunts)?;

    let rolls = hunts.get(id).map(|c| c.get_rolls()).unwrap_or_default();
    println!(
        "  charm {} for {name} ({rolls} rolls)",
        if on { "on" } else { "off" }
    );
    Ok(())
}
