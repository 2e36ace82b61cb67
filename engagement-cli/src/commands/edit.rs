//! `engagement edit`: load a zone, apply edits, save.

use anyhow::{bail, Context, Result};
use clap::Args;

use engagement_core::gate;
use engagement_engine::{ConfigAggregationEngine, EngineError};

use super::{connect, print_events, print_view, runtime};

/// Arguments for `engagement edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Zone whose partner group is loaded.
    #[arg(long)]
    pub zone: String,

    /// Row to edit (0-based, as listed by `show`).
    #[arg(long)]
    pub row: Option<usize>,

    /// New target cycle time for the row.
    #[arg(long, requires = "row", allow_negative_numbers = true)]
    pub cycle_time: Option<f64>,

    /// New target efficiency for the row, in percent.
    #[arg(long, requires = "row", allow_negative_numbers = true)]
    pub efficiency: Option<f64>,

    /// Shift slot to engage (repeatable).
    #[arg(long, requires = "row")]
    pub engage: Vec<usize>,

    /// Shift slot to disengage (repeatable).
    #[arg(long, requires = "row")]
    pub disengage: Vec<usize>,

    /// Engage every slot of every row.
    #[arg(long, conflicts_with = "uncheck_all")]
    pub check_all: bool,

    /// Disengage every slot of every row.
    #[arg(long)]
    pub uncheck_all: bool,

    /// Apply and validate edits without saving.
    #[arg(long)]
    pub dry_run: bool,
}

impl EditArgs {
    pub fn run(self, api: Option<String>) -> Result<()> {
        let runtime = runtime()?;
        let (mut engine, mut events) = connect(api)?;
        runtime
            .block_on(engine.mount(self.zone.as_str()))
            .with_context(|| format!("failed to load zone '{}'", self.zone))?;

        self.apply(&mut engine).context("edit rejected")?;
        print_events(&mut events);
        print_view(&engine.view());

        if !engine.save_enabled() {
            for issue in gate::issues(engine.rows()) {
                eprintln!("  {issue}");
            }
            bail!("save disabled: fix the invalid fields above");
        }

        if self.dry_run {
            println!("[dry-run] would save {} row(s)", engine.rows().len());
            return Ok(());
        }

        let saved = runtime.block_on(engine.save());
        print_events(&mut events);
        match saved {
            Ok(()) => Ok(()),
            Err(EngineError::Save(err)) => {
                bail!("save failed: {} ({} of {} rows)", err.first_reason, err.failed, err.total)
            }
            Err(err) => Err(err).context("save failed"),
        }
    }

    fn apply(&self, engine: &mut ConfigAggregationEngine) -> Result<(), EngineError> {
        if self.check_all {
            engine.check_all()?;
        }
        if self.uncheck_all {
            engine.uncheck_all()?;
        }

        let Some(row) = self.row else {
            return Ok(());
        };
        if let Some(cycle_time) = self.cycle_time {
            engine.set_cycle_time(row, cycle_time)?;
        }
        if let Some(efficiency) = self.efficiency {
            engine.set_efficiency_percent(row, efficiency)?;
        }
        for slot in &self.engage {
            engine.set_shift(row, *slot, true)?;
        }
        for slot in &self.disengage {
            engine.set_shift(row, *slot, false)?;
        }
        Ok(())
    }
}
