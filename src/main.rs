//! Start-draw command line entry point.
//!
//! Loads settings, imports the entry list, draws the start list, and
//! exports it in the configured format. A validation failure after the
//! draw aborts the run; nothing is exported.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use start_draw::config::{ExporterKind, ImporterKind, Settings};
use start_draw::error::DrawError;
use start_draw::io::{JsonExporter, JsonImporter, XmlExporter, XmlStartListCreator};
use start_draw::ip::MicroLpProvider;
use start_draw::models::{roster_from_entries, NationSummary};
use start_draw::solver::StartListSolver;
use start_draw::validation::{validate_roster, validate_start_list};

/// Draws fair start lists for multi-heat race events.
#[derive(Parser)]
#[command(name = "start-draw", version)]
struct Cli {
    /// Path to the settings file.
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Overrides the anchor-draw seed from the settings file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level.level_filter())
        .init();

    run(&settings, cli.seed).context("start draw failed")?;
    Ok(())
}

fn run(settings: &Settings, seed_override: Option<u64>) -> Result<(), DrawError> {
    let entries = match settings.importer {
        ImporterKind::Json => JsonImporter::new(&settings.source_file).import()?,
    };
    info!(entries = entries.len(), "entry list imported");

    let roster = roster_from_entries(entries);
    let nations = NationSummary::tally(&roster);
    validate_roster(settings.heats, &roster).map_err(DrawError::Validation)?;

    let mut rng = match seed_override.or(settings.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let solver = StartListSolver::new(MicroLpProvider::new())
        .with_max_correction(settings.max_correction);
    let start_list = solver.solve(settings.heats, roster.clone(), nations, &mut rng)?;

    validate_start_list(&roster, &start_list, settings.heats).map_err(DrawError::Validation)?;

    match settings.exporter {
        ExporterKind::Json => {
            JsonExporter::new(&settings.destination_file).export(&start_list)?;
        }
        ExporterKind::Xml => {
            let document = XmlStartListCreator::new().create(
                &settings.event_name,
                chrono::Utc::now(),
                &start_list,
            );
            XmlExporter::new(&settings.destination_file).export(&document)?;
        }
    }

    for entry in start_list.entries() {
        debug!(
            heat = entry.heat + 1,
            timeslot = entry.timeslot,
            name = %entry.competitor.full_name(),
            federation = %entry.competitor.federation,
            seed_rank = entry.competitor.seed_rank,
            "drawn"
        );
    }
    info!(destination = %settings.destination_file.display(), "start list exported");

    Ok(())
}
