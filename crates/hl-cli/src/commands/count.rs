use hl_core::{CampaignId, TrackerConfig};

/// Add `n` attempts to the named campaign.
pub fn add(config: &TrackerConfig, name: &str, n: i64) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    hunts.increase_by(id, n).map_err(|e| e.to_string())?;
    report(config, &hunts, id)
}

/// Overwrite the named campaign's total count.
pub fn set(config: &TrackerConfig, name: &str, total: u64) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    hunts.set_count(id, total).map_err(|e| e.to_string())?;
    report(config, &hunts, id)
}

fn report(config: &TrackerConfig, hunts: &super::Hunts, id: CampaignId) -> Result<(), String> {
    let campaign = hunts
        .get(id)
        .ok_or_else(|| format!("campaign not found: {id}"))?;
    if hunts.observer().is_empty() {
        println!("  {} is completed; reopen it to keep counting.", campaign.name());
        return Ok(());
    }
    super::save(config, hunts)?;

    let last = campaign.last_phase();
    println!(
        "  {}: {} ({} rolls, {})",
        campaign.name(),
        campaign.get_count(),
        campaign.get_rolls(),
        super::format_progress(last.progress(), last.count(), last.progress_type())
    );
    Ok(())
}
