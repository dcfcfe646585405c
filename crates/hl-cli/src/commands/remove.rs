use colored::Colorize;
use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig, name: &str) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    let removed = hunts.remove_campaign(id).map_err(|e| e.to_string())?;
    super::save(config, &hunts)?;

    println!(
        "  {} {} ({} attempts)",
        "Removed".red(),
        removed.name(),
        removed.get_count()
    );
    Ok(())
}
