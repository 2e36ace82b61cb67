//! `engagement config`: inspect and write the settings file.

use anyhow::{Context, Result};
use clap::Subcommand;

use engagement_core::settings::{self, Settings};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings and where they come from.
    Show,
    /// Write a settings file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Set the configuration API base path.
    SetApi {
        /// e.g. `https://plant.example/api/config`
        url: String,
    },
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let path = settings::settings_path_at(&home);

    match command {
        ConfigCommand::Show => {
            let current = settings::load_at(&home).context("failed to read settings")?;
            let source = if path.exists() {
                path.display().to_string()
            } else {
                "defaults (no settings file)".to_string()
            };
            println!("# {source}");
            print!("{}", serde_yaml::to_string(&current)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                println!("settings already exist at {}", path.display());
                return Ok(());
            }
            let written = settings::save_at(&home, &Settings::default())
                .context("failed to write settings")?;
            println!("wrote {}", written.display());
        }
        ConfigCommand::SetApi { url } => {
            let mut current = settings::load_at(&home).context("failed to read settings")?;
            current.api_base = url;
            let written = settings::save_at(&home, &current).context("failed to write settings")?;
            println!("api_base set to {} in {}", current.api_base, written.display());
        }
    }
    Ok(())
}
