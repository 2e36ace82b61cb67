//! `engagement show`: load a zone and print it.

use anyhow::{Context, Result};
use clap::Args;

use super::{connect, print_events, print_view, runtime};

/// Arguments for `engagement show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Zone whose partner group is loaded.
    #[arg(long)]
    pub zone: String,

    /// Emit the view as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self, api: Option<String>) -> Result<()> {
        let (mut engine, mut events) = connect(api)?;
        runtime()?
            .block_on(engine.mount(self.zone.as_str()))
            .with_context(|| format!("failed to load zone '{}'", self.zone))?;

        let view = engine.view();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }

        print_events(&mut events);
        print_view(&view);
        Ok(())
    }
}
