//! CLI entry point for the crash weather overview.
//!
//! Loads the accident CSV, cleans and aggregates it per weather condition,
//! then renders the multi-panel chart or logs the aggregates.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use crash_weather_overview::{
    aggregate::summarize,
    clean::clean_with_stats,
    config::PipelineConfig,
    loader::load_records,
    output::{print_json, print_pretty, write_counts_csv},
    render::render_figure,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "crash_weather_overview")]
#[command(about = "Charts accident counts per weather condition over the years", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the per-weather panel chart (the default command)
    Render {
        #[command(flatten)]
        common: CommonArgs,

        /// Image file to write; `.svg` selects SVG output, anything else PNG
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Log the per-weather aggregates as JSON
    Summary {
        #[command(flatten)]
        common: CommonArgs,

        /// Optional: also write all counts to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct CommonArgs {
    /// Accident CSV to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON file with pipeline settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First year to keep (inclusive)
    #[arg(long)]
    year_min: Option<i32>,

    /// Last year to keep (inclusive)
    #[arg(long)]
    year_max: Option<i32>,
}

impl CommonArgs {
    fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(year) = self.year_min {
            config.year_min = year;
        }
        if let Some(year) = self.year_max {
            config.year_max = year;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/crash_weather_overview.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("crash_weather_overview.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = CommonArgs::default().resolve()?;
            render(&config)?;
        }
        Some(Commands::Render { common, output }) => {
            let mut config = common.resolve()?;
            if let Some(output) = output {
                config.output = output;
            }
            render(&config)?;
        }
        Some(Commands::Summary { common, export }) => {
            let config = common.resolve()?;
            summary(&config, export.as_deref())?;
        }
    }

    Ok(())
}

/// Load, clean, aggregate, draw.
#[tracing::instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
fn render(config: &PipelineConfig) -> Result<()> {
    let records = load_records(&config.input)?;
    let (cleaned, stats) = clean_with_stats(&records, &config.years());
    let summaries = summarize(&cleaned);
    print_pretty(&summaries);

    let report = render_figure(&config.output, &summaries, &config.render())?;
    info!(
        rows_loaded = stats.input_rows,
        rows_kept = stats.kept,
        panels = report.panels,
        legend_entries = report.legend_entries,
        "Overview rendered"
    );
    Ok(())
}

/// Load, clean, aggregate, then log (and optionally export) the counts.
#[tracing::instrument(skip_all, fields(input = %config.input.display()))]
fn summary(config: &PipelineConfig, export: Option<&Path>) -> Result<()> {
    let records = load_records(&config.input)?;
    let (cleaned, stats) = clean_with_stats(&records, &config.years());
    let summaries = summarize(&cleaned);

    print_json(&summaries)?;
    info!(
        rows_loaded = stats.input_rows,
        rows_kept = stats.kept,
        bad_timestamp = stats.bad_timestamp,
        year_out_of_range = stats.year_out_of_range,
        unsupported_weather = stats.unsupported_weather,
        weathers = summaries.len(),
        "Summary complete"
    );

    if let Some(path) = export {
        let rows = write_counts_csv(path, &summaries)?;
        info!(path = %path.display(), rows, "Counts exported");
    }
    Ok(())
}
