use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use hl_core::TrackerConfig;

pub fn run(config: &TrackerConfig, name: &str) -> Result<(), String> {
    let hunts = super::load(config)?;
    let id = super::find(&hunts, name)?;
    let campaign = hunts
        .get(id)
        .ok_or_else(|| format!("campaign not found: \"{name}\""))?;

    println!(
        "  {} [{}]",
        campaign.name().bold(),
        campaign.regime().to_string().dimmed()
    );
    println!();
    println!("  count:    {}", campaign.get_count());
    println!("  time:     {}", super::format_duration(campaign.get_time()));
    println!("  rolls:    {}", campaign.get_rolls());
    println!("  charm:    {}", if campaign.has_charm() { "yes" } else { "no" });
    if let Some(odds) = campaign.effective_odds() {
        println!("  odds:     1/{odds:.1} per attempt");
    }
    println!(
        "  chance:   {:.3}% at base odds",
        (1.0 - campaign.get_chance()) * 100.0
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Phase", "Count", "Time", "Rolls", "Progress", "Locked"]);

    for (i, phase) in campaign.phases().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            phase.name().to_string(),
            phase.count().to_string(),
            super::format_duration(phase.elapsed()),
            phase.rolls().to_string(),
            super::format_progress(phase.progress(), phase.count(), phase.progress_type())
                .to_string(),
            if phase.is_completed() { "yes" } else { "" }.to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}
