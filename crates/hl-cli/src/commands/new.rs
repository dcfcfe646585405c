use colored::Colorize;
use hl_core::{Selection, TrackerConfig};

pub fn run(
    config: &TrackerConfig,
    name: &str,
    odds: Option<&str>,
    charm: bool,
) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    if hunts.find_by_name(name).is_some() {
        return Err(format!("campaign already exists: \"{name}\""));
    }

    let regime = super::parse_odds(odds, config.default_regime)?;
    let id = hunts
        .create_campaign(name, regime)
        .map_err(|e| e.to_string())?;
    if charm {
        hunts.set_charm(id, true).map_err(|e| e.to_string())?;
    }
    hunts
        .set_active(vec![Selection::Campaign(id)])
        .map_err(|e| e.to_string())?;
    super::save(config, &hunts)?;

    println!(
        "  {} {} {}",
        "Started".green(),
        name.bold(),
        format!("({regime}{})", if charm { ", charm" } else { "" }).dimmed()
    );
    Ok(())
}
