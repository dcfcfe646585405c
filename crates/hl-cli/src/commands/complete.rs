use colored::Colorize;
use hl_core::TrackerConfig;

/// Lock (`flag = true`) or reopen a campaign, or a single 1-based phase.
pub fn run(
    config: &TrackerConfig,
    name: &str,
    phase: Option<usize>,
    flag: bool,
) -> Result<(), String> {
    let mut hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;

    let what = match phase {
        Some(number) => {
            let index = super::phase_index(number)?;
            hunts
                .set_phase_completed(id, index, flag)
                .map_err(|e| e.to_string())?;
            format!("{name} phase {number}")
        }
        None => {
            hunts.set_completed(id, flag).map_err(|e| e.to_string())?;
            name.to_string()
        }
    };
    super::save(config, &hunts)?;

    if flag {
        println!("  {} {what}", "Completed".green());
    } else {
        println!("  {} {what}", "Reopened".yellow());
    }
    Ok(())
}
