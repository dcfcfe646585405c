//! CLI frontend for the Huntlog hunt tracker.

mod commands;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use hl_core::TrackerConfig;
use hl_odds::OddsRegime;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "huntlog",
    about = "Huntlog: track shiny hunts and how lucky you have been",
    version,
    propagate_version = true
)]
struct Cli {
    /// Save file to read and write
    #[arg(short, long, global = true, default_value = "huntlog.json")]
    file: PathBuf,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Regime used when a command does not name one: old, new, chain, or flat:<n>
    #[arg(long, global = true, default_value = "new")]
    default_odds: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new campaign
    New {
        /// Campaign name
        name: String,

        /// Odds regime: old, new, chain, or flat:<n>
        #[arg(short, long)]
        odds: Option<String>,

        /// Start with the charm applied
        #[arg(long)]
        charm: bool,
    },

    /// List all campaigns
    List,

    /// Show a campaign's phases
    Show {
        /// Campaign name (case-insensitive)
        name: String,
    },

    /// Add attempts to a campaign (negative to correct)
    #[command(allow_negative_numbers = true)]
    Add {
        /// Campaign name
        name: String,

        /// Attempts to add
        #[arg(default_value = "1")]
        n: i64,
    },

    /// Set a campaign's total attempt count
    Set {
        /// Campaign name
        name: String,

        /// New total
        total: u64,
    },

    /// Add elapsed time to a campaign
    Time {
        /// Campaign name
        name: String,

        /// Seconds to add
        seconds: u64,

        /// Overwrite the campaign's total time instead of adding
        #[arg(long)]
        total: bool,
    },

    /// Track time live until the duration ends
    Timer {
        /// Campaign name (default: the active campaign)
        name: Option<String>,

        /// How long to run, in seconds
        #[arg(short, long, default_value = "60")]
        seconds: u64,

        /// Tick interval in milliseconds
        #[arg(long, default_value = "1000")]
        interval_ms: u64,
    },

    /// Start a new phase after a find
    Phase {
        /// Campaign name
        name: String,

        /// Odds regime for the new phase (default: the campaign's)
        #[arg(short, long)]
        odds: Option<String>,
    },

    /// Mark a campaign (or one phase) as completed
    Complete {
        /// Campaign name
        name: String,

        /// Lock only this phase (1-based)
        #[arg(short, long)]
        phase: Option<usize>,
    },

    /// Reopen a completed campaign (or one phase)
    Reopen {
        /// Campaign name
        name: String,

        /// Unlock only this phase (1-based)
        #[arg(short, long)]
        phase: Option<usize>,
    },

    /// Toggle the charm
    Charm {
        /// Campaign name
        name: String,

        /// on or off
        state: Toggle,
    },

    /// Change a campaign's odds regime
    Odds {
        /// Campaign name
        name: String,

        /// old, new, chain, or flat:<n>
        odds: String,
    },

    /// Rename a campaign (or one phase)
    Rename {
        /// Current campaign name
        name: String,

        /// New name
        new_name: String,

        /// Rename this phase instead (1-based)
        #[arg(short, long)]
        phase: Option<usize>,
    },

    /// Delete a campaign
    Remove {
        /// Campaign name
        name: String,
    },

    /// Show luck across all campaigns
    Luck {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_config(file: PathBuf, default_odds: &str) -> Result<TrackerConfig, String> {
    let regime = default_odds
        .parse::<OddsRegime>()
        .map_err(|e| format!("--default-odds: {e}"))?;
    let config = TrackerConfig::default()
        .with_default_regime(regime)
        .with_save_path(file);
    config
        .validate()
        .map_err(|e| format!("--default-odds: {e}"))?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match build_config(cli.file, &cli.default_odds) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::New { name, odds, charm } => {
            commands::new::run(&config, &name, odds.as_deref(), charm)
        }
        Commands::List => commands::list::run(&config),
        Commands::Show { name } => commands::show::run(&config, &name),
        Commands::Add { name, n } => commands::count::add(&config, &name, n),
        Commands::Set { name, total } => commands::count::set(&config, &name, total),
        Commands::Time {
            name,
            seconds,
            total,
        } => commands::time::run(&config, &name, Duration::from_secs(seconds), total),
        Commands::Timer {
            name,
            seconds,
            interval_ms,
        } => {
            let config = config.with_tick_interval(Duration::from_millis(interval_ms));
            commands::timer::run(&config, name.as_deref(), Duration::from_secs(seconds))
        }
        Commands::Phase { name, odds } => commands::phase::run(&config, &name, odds.as_deref()),
        Commands::Complete { name, phase } => {
            commands::complete::run(&config, &name, phase, true)
        }
        Commands::Reopen { name, phase } => commands::complete::run(&config, &name, phase, false),
        Commands::Charm { name, state } => {
            commands::charm::run(&config, &name, matches!(state, Toggle::On))
        }
        Commands::Odds { name, odds } => commands::odds::run(&config, &name, &odds),
        Commands::Rename {
            name,
            new_name,
            phase,
        } => commands::rename::run(&config, &name, &new_name, phase),
        Commands::Remove { name } => commands::remove::run(&config, &name),
        Commands::Luck { json } => commands::luck::run(&config, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
