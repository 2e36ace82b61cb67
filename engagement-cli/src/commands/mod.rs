pub mod config;
pub mod edit;
pub mod show;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;

use engagement_core::settings;
use engagement_engine::{
    ConfigAggregationEngine, ConfigFetcher, ConfigTransport, EngagementView, EngineEvent,
    HttpTransport,
};

/// Engine wired to the HTTP API: `--api` / `ENGAGEMENT_API`, else the
/// settings file, else the default base.
pub fn connect(
    api: Option<String>,
) -> Result<(ConfigAggregationEngine, UnboundedReceiver<EngineEvent>)> {
    let settings = settings::load().context("failed to read settings")?;
    let base = api.unwrap_or(settings.api_base);
    tracing::debug!(%base, "using configuration API");
    let http = HttpTransport::new(base, Duration::from_secs(settings.request_timeout_secs))
        .context("failed to build HTTP client")?;
    let transport: Arc<dyn ConfigTransport> = Arc::new(http);
    let mut engine = ConfigAggregationEngine::new(ConfigFetcher::new(transport));
    let events = engine.subscribe();
    Ok((engine, events))
}

/// Single-threaded runtime for one command. The HTTP client pools
/// connections on it, so a command keeps the same runtime for every request.
pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Print notifications queued by the engine.
pub fn print_events(events: &mut UnboundedReceiver<EngineEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            EngineEvent::TitleExtension { title } => println!("{}", title.bold()),
            EngineEvent::Saved { zone, rows } => {
                println!("{} saved {rows} row(s) for '{zone}'", "✓".green().bold());
            }
            EngineEvent::SaveFailed { zone, reason } => {
                eprintln!("{} save failed for '{zone}': {reason}", "✗".red().bold());
            }
            EngineEvent::Loaded { .. } | EngineEvent::LoadFailed { .. } => {}
        }
    }
}

#[derive(Tabled)]
struct PartnerTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "partner")]
    key: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "cycle time")]
    cycle_time: String,
    #[tabled(rename = "efficiency %")]
    efficiency: String,
    #[tabled(rename = "engaged")]
    engaged: String,
    #[tabled(rename = "slots")]
    slots: String,
}

pub fn print_view(view: &EngagementView) {
    if !view.heading.is_empty() {
        let labels: Vec<String> = view.heading.iter().map(|c| c.label()).collect();
        println!("week: {}", labels.join(" | "));
    }

    if !view.rows.is_empty() {
        let rows: Vec<PartnerTableRow> = view
            .rows
            .iter()
            .enumerate()
            .map(|(index, r)| PartnerTableRow {
                index,
                key: r.row.key.to_string(),
                title: r.row.title.clone(),
                cycle_time: mark_invalid(r.row.target_cycle_time, r.validity.cycle_time),
                efficiency: mark_invalid(r.row.efficiency_percent, r.validity.efficiency),
                engaged: format!("{}/{}", r.row.engaged_count(), r.row.shift_engaged.len()),
                slots: r
                    .row
                    .shift_engaged
                    .iter()
                    .map(|engaged| if *engaged { '■' } else { '·' })
                    .collect(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    let save = if view.save_enabled {
        "enabled".green()
    } else {
        "disabled".yellow()
    };
    println!("save: {save}");
}

fn mark_invalid(value: f64, valid: bool) -> String {
    if valid {
        value.to_string()
    } else {
        format!("{value} (invalid)").red().to_string()
    }
}
