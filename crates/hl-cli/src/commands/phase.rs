use colored::Colorize;
use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig, name: &str, odds: Option<&str>) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    let current = hunts
        .get(id)
        .map(|c| c.regime())
        .unwrap_or(config.default_regime);
    let regime = super::parse_odds(odds, current)?;

    let index = hunts.new_phase(id, regime).map_err(|e| e.to_string())?;
    super::save(config, &hunts)?;

    let phase = hunts
        .get(id)
        .and_then(|c| c.phase(index))
        .map(|p| p.name().to_string())
        .unwrap_or_default();
    println!("  {} {phase} of {name} ({regime})", "Started".green());
    Ok(())
}
