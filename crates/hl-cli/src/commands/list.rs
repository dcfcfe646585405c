use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig) -> Result<(), String> {
    let hunts = super::load(config)?;

    if hunts.is_empty() {
        println!("  No campaigns yet. Start one with `huntlog new <name>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Name", "Odds", "Count", "Time", "Phases", "Rolls", "Progress", "Status",
    ]);

    for campaign in hunts.campaigns() {
        let last = campaign.last_phase();
        let status = if campaign.is_completed() {
            "completed".to_string()
        } else {
            "hunting".to_string()
        };
        table.add_row(vec![
            campaign.name().to_string(),
            campaign.regime().to_string(),
            campaign.get_count().to_string(),
            super::format_duration(campaign.get_time()),
            campaign.phases().len().to_string(),
            campaign.get_rolls().to_string(),
            super::format_progress(last.progress(), last.count(), last.progress_type())
                .to_string(),
            status,
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} campaigns, {} attempts, {}",
        hunts.len(),
        hunts.total_count(),
        super::format_duration(hunts.total_time()).dimmed()
    );

    Ok(())
}
