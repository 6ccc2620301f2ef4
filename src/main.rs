//! CLI entry point for the trip hotspot analyzer.
//!
//! Provides subcommands for ranking the busiest zones, the busiest
//! (zone, hour) slots, or producing a full report of both.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_hotspots::{
    HotspotReport, TripAnalyzer,
    config::IngestConfig,
    layout::ColumnLayout,
    output::{print_json, print_pretty, to_json_string, write_slots_csv, write_zones_csv},
};

#[derive(Parser)]
#[command(name = "trip_hotspots")]
#[command(about = "Rank the busiest zones and hours in a trip file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IngestArgs {
    /// Trip CSV file
    #[arg(value_name = "FILE")]
    source: String,

    /// JSON ingestion config
    #[arg(long)]
    config: Option<String>,

    /// Header name of the zone column (needs --datetime-column)
    #[arg(long, requires = "datetime_column")]
    zone_column: Option<String>,

    /// Header name of the datetime column (needs --zone-column)
    #[arg(long, requires = "zone_column")]
    datetime_column: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Busiest zones by trip count
    Zones {
        #[command(flatten)]
        ingest: IngestArgs,

        /// Number of zones to show
        #[arg(short, default_value_t = 10, allow_negative_numbers = true)]
        k: i64,
    },
    /// Busiest (zone, hour) slots by trip count
    Slots {
        #[command(flatten)]
        ingest: IngestArgs,

        /// Number of slots to show
        #[arg(short, default_value_t = 10, allow_negative_numbers = true)]
        k: i64,
    },
    /// Both rankings plus ingestion diagnostics
    Report {
        #[command(flatten)]
        ingest: IngestArgs,

        /// Number of zones in the report
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        zones: i64,

        /// Number of slots in the report
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        slots: i64,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Also write the zone ranking to this CSV file
        #[arg(long)]
        zones_csv: Option<String>,

        /// Also write the slot ranking to this CSV file
        #[arg(long)]
        slots_csv: Option<String>,

        /// Write the JSON report to this file instead of logging it
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trip_hotspots.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_hotspots.log"));

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
        Commands::Zones { ingest, k } => {
            let (analyzer, _) = load(&ingest)?;
            for (rank, z) in analyzer.top_zones(k).iter().enumerate() {
                info!(rank = rank + 1, zone = %z.zone, count = z.count, "Zone");
            }
        }
        Commands::Slots { ingest, k } => {
            let (analyzer, _) = load(&ingest)?;
            for (rank, s) in analyzer.top_busy_slots(k).iter().enumerate() {
                info!(rank = rank + 1, zone = %s.zone, hour = s.hour, count = s.count, "Slot");
            }
        }
        Commands::Report {
            ingest,
            zones,
            slots,
            format,
            zones_csv,
            slots_csv,
            output,
        } => {
            let (analyzer, summary) = load(&ingest)?;
            let report = HotspotReport::build(&ingest.source, &analyzer, summary, zones, slots);

            if let Some(path) = zones_csv {
                write_zones_csv(&path, &report.top_zones)?;
                info!(path = %path, "Zone ranking written");
            }
            if let Some(path) = slots_csv {
                write_slots_csv(&path, &report.top_slots)?;
                info!(path = %path, "Slot ranking written");
            }

            match (output, format) {
                (Some(path), _) => {
                    std::fs::write(&path, to_json_string(&report)?)?;
                    info!(path = %path, "Report written");
                }
                (None, Format::Json) => print_json(&report)?,
                (None, Format::Pretty) => print_pretty(&report),
            }
        }
    }

    Ok(())
}

/// Builds the analyzer from CLI flags and ingests the source.
///
/// Column flags take precedence over a config file.
#[tracing::instrument(skip_all, fields(source = %args.source))]
fn load(args: &IngestArgs) -> Result<(TripAnalyzer, trip_hotspots::IngestSummary)> {
    let layout = match (&args.zone_column, &args.datetime_column, &args.config) {
        (Some(zone), Some(datetime), _) => ColumnLayout::Named {
            zone: zone.clone(),
            datetime: datetime.clone(),
        },
        (None, None, Some(path)) => IngestConfig::load(path)?.layout,
        (None, None, None) => ColumnLayout::default(),
        _ => bail!("--zone-column and --datetime-column must be given together"),
    };

    let mut analyzer = TripAnalyzer::with_layout(layout);
    let summary = analyzer.ingest(&args.source);

    info!(
        status = ?summary.source_status,
        rows_accepted = summary.rows_accepted,
        rows_skipped = summary.rows_skipped(),
        zones = analyzer.distinct_zones(),
        "Trip file ingested"
    );

    Ok((analyzer, summary))
}
