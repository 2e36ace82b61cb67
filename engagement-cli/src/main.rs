//! Engagement: inspect and edit line engagement configuration per zone.
//!
//! # Usage
//!
//! ```text
//! engagement show --zone <zone> [--json]
//! engagement edit --zone <zone> [--row N] [--cycle-time X] [--efficiency P]
//!                 [--engage I]... [--disengage I]... [--check-all|--uncheck-all] [--dry-run]
//! engagement config show|init|set-api <url>
//! ```
//!
//! `--api` (or `ENGAGEMENT_API`) overrides the API base from the settings file.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config::ConfigCommand, edit::EditArgs, show::ShowArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "engagement",
    version,
    about = "Inspect and edit line engagement configuration per zone",
    long_about = None,
)]
struct Cli {
    /// Base path of the configuration API (overrides the settings file).
    #[arg(long, global = true, env = "ENGAGEMENT_API")]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a zone and print its heading and partner table.
    Show(ShowArgs),

    /// Load a zone, apply edits and save every row.
    Edit(EditArgs),

    /// Manage the settings file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Show(args) => args.run(cli.api),
        Commands::Edit(args) => args.run(cli.api),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
