mod script;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use layout::catalog::{CatalogError, PanelCatalog};
use layout::doc::Ignored;
use layout::engine::EngineCore;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::script::Report;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid panel catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("line {line}: invalid command: {source}")]
    Script { line: usize, source: serde_json::Error },
    #[error("line {line}: {op} was ignored: {reason:?}")]
    Rejected { line: usize, op: &'static str, reason: Ignored },
    #[error("an outline needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("no panel model selected; metrics are unavailable")]
    NoPanelSelected,
    #[error("gap must be a finite, non-negative pixel count, got {0}")]
    InvalidGap(f64),
}

#[derive(Parser, Debug)]
#[command(name = "solarplan", about = "Offline rooftop solar layout driver")]
struct Cli {
    #[arg(long, env = "PANEL_CATALOG_PATH", default_value = "data/panels.json")]
    catalog: PathBuf,

    #[arg(long, env = "LAYOUT_GAP_PX", default_value_t = layout::consts::PANEL_GAP_PX)]
    gap_px: f64,

    #[arg(long, env = "HISTORY_LIMIT")]
    history_limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the panel models in the catalog.
    Catalog,
    /// Auto-tile one roof outline with a panel model.
    Plan(PlanArgs),
    /// Apply a JSONL command script to a fresh session.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[arg(long, help = "Panel model name from the catalog")]
    panel: String,

    #[arg(long, default_value = "-", help = "Outline JSON file ([{x,y},...]), or - for stdin")]
    polygon: String,

    #[arg(long, value_enum, default_value_t = Report::Metrics)]
    report: Report,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,

    #[arg(long, value_enum, default_value_t = Report::View)]
    report: Report,

    #[arg(long, default_value_t = false, help = "Fail on the first ignored command")]
    strict: bool,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solarplan=warn,layout=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(&cli.catalog)?;
    let settings = script::settings(cli.gap_px, cli.history_limit)?;

    let rendered = match cli.command {
        Command::Catalog => serde_json::to_string_pretty(catalog.panels())?,
        Command::Plan(args) => run_plan(EngineCore::new(catalog, settings), args)?,
        Command::Replay(args) => run_replay(EngineCore::new(catalog, settings), args)?,
    };
    println!("{rendered}");
    Ok(())
}

fn run_plan(mut engine: EngineCore, args: PlanArgs) -> Result<String, CliError> {
    let points = script::parse_polygon(&read_input(&args.polygon)?)?;
    script::plan(&mut engine, &points, &args.panel)?;
    info!(panel = %args.panel, placed = engine.doc.panel_count(), "plan: outline tiled");
    script::render(&engine, args.report)
}

fn run_replay(mut engine: EngineCore, args: ReplayArgs) -> Result<String, CliError> {
    let summary = if args.input == "-" {
        script::replay(&mut engine, io::stdin().lock(), args.strict)?
    } else {
        let file = File::open(&args.input).map_err(|source| CliError::Read { path: args.input.clone().into(), source })?;
        script::replay(&mut engine, BufReader::new(file), args.strict)?
    };
    info!(applied = summary.applied, ignored = summary.ignored.len(), "replay: finished");
    script::render(&engine, args.report)
}

fn load_catalog(path: &Path) -> Result<PanelCatalog, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })?;
    Ok(PanelCatalog::from_json(&text)?)
}

fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(input).map_err(|source| CliError::Read { path: input.into(), source })
}
