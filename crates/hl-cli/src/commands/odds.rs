use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig, name: &str, odds: &str) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    let regime = super::parse_odds(Some(odds), config.default_regime)?;
    hunts.set_regime(id, regime).map_err(|e| e.to_string())?;
    super::save(config, &hunts)?;

    println!("  {name} now counts at {regime}");
    Ok(())
}
