mod report;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use ordermetrics::ingest::write_csv_path;
use ordermetrics::{discover_data_files, Pipeline, Selection, ValueMetric};

use settings::LoadedConfig;

#[derive(Parser)]
#[command(name = "ordermetrics", version, about = "Order and funnel analytics for sales exports")]
struct Cli {
    /// Config file; falls back to the per-user config, then built-in defaults.
    #[arg(long, global = true, env = "ORDERMETRICS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the data files available for analysis.
    List {
        #[arg(long, env = "DATA_PATH")]
        data_dir: Option<PathBuf>,
    },
    /// Print the event names found in a data file.
    Events { file: PathBuf },
    /// Compute the dashboard figures for a data file.
    Analyze {
        file: PathBuf,

        /// Event name to keep; repeat for several. Defaults to all events.
        #[arg(long = "event")]
        events: Vec<String>,

        #[arg(long, default_value_t = ValueMetric::AverageSpend)]
        metric: ValueMetric,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the confirmed orders to this CSV file.
        #[arg(long)]
        export_confirmed: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let loaded = settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::List { data_dir } => list(&loaded, data_dir),
        Command::Events { file } => events(&loaded, &file),
        Command::Analyze {
            file,
            events,
            metric,
            format,
            export_confirmed,
        } => {
            let selection = Selection::events(events).with_metric(metric);
            analyze(&loaded, &file, &selection, format, export_confirmed.as_deref())
        }
    }
}

fn list(loaded: &LoadedConfig, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => loaded.pipeline_config()?.data_directory,
    };

    let files = discover_data_files(&dir)?;
    if files.is_empty() {
        info!("No data files found in {}", dir.display());
    }
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

fn events(loaded: &LoadedConfig, file: &Path) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(loaded.pipeline_config()?);
    let session = pipeline
        .open_path(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    for name in session.available_events() {
        println!("{}", name);
    }
    Ok(())
}

fn analyze(
    loaded: &LoadedConfig,
    file: &Path,
    selection: &Selection,
    format: OutputFormat,
    export_confirmed: Option<&Path>,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(loaded.pipeline_config()?);
    let session = pipeline
        .open_path(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let available = session.available_events();
    for name in &selection.events {
        if !available.contains(name) {
            warn!("Event '{}' does not occur in {}", name, file.display());
        }
    }

    let bundle = session.compute(selection);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bundle)?),
        OutputFormat::Text => print!("{}", report::render_text(&bundle)),
    }

    if let Some(path) = export_confirmed {
        write_csv_path(&bundle.confirmed_orders.to_raw_table(), path)?;
        info!(
            "Exported {} confirmed orders to {}",
            bundle.confirmed_orders.rows.len(),
            path.display()
        );
    }

    Ok(())
}
