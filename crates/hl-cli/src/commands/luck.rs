use colored::{ColoredString, Colorize};
use hl_core::{CoreError, TrackerConfig};

pub fn run(config: &TrackerConfig, json: bool) -> Result<(), String> {
    let hunts = super::load(config)?;

    let report = match hunts.luck_report() {
        Ok(report) => report,
        Err(CoreError::InsufficientData(reason)) if !json => {
            println!("  Not enough data for luck yet: {reason}.");
            return Ok(());
        }
        Err(e) => return Err(e.to_string()),
    };

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!("  {}", "Luck".bold());
    println!();
    println!("  campaigns:  {}", report.campaigns);
    println!("  attempts:   {}", report.total_count);
    println!("  rolls:      {}", report.total_rolls);
    println!("  odds:       1/{:.1}", report.average_odds);
    println!(
        "  found:      {} (expected {:.2})",
        report.completed, report.expected
    );
    println!();
    println!("  luck:       {}", luck_band(report.luck));
    Ok(())
}

/// Luck as a signed offset from the median, coloured by band.
fn luck_band(luck: f64) -> ColoredString {
    let text = format!("{:+.3}%", luck * 100.0 - 50.0);
    if luck < 0.3 {
        text.red()
    } else if luck < 0.4 {
        text.truecolor(255, 165, 0)
    } else if luck < 0.5 {
        text.yellow()
    } else {
        text.green()
    }
}
