use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use workbook_compare::sync::{self, RunSummary};
use workbook_compare::{CompareConfig, Result, ToolError};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Run(args) => execute_run(args),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|error| ToolError::Logging(error.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_run(args: RunArgs) -> Result<()> {
    for input in [&args.current, &args.previous] {
        if !input.exists() {
            return Err(ToolError::MissingInput(input.clone()));
        }
    }

    let config = args.resolve_config()?;
    let summary = sync::compare_files(&args.current, &args.previous, &args.output, &config)?;

    if let Some(path) = &args.summary {
        sync::write_summary(path, &summary)?;
    }
    print_summary(&args.output, &summary);
    Ok(())
}

fn print_summary(output: &Path, summary: &RunSummary) {
    println!(
        "wrote {} (sheets: {})",
        output.display(),
        summary.sheets.join(", ")
    );
    println!(
        "flagged rows: {} across {} sheet(s)",
        summary.flagged.matched_rows, summary.flagged.sheets_with_matches
    );
    if let Some(markets) = &summary.markets {
        println!(
            "markets: {} matched, {} unmatched, {} not OK at {}%",
            markets.matched, markets.unmatched, markets.not_ok, summary.threshold
        );
    }
    if let Some(periods) = &summary.periods {
        println!(
            "periods: {} compared, {} above {}%",
            periods.periods, periods.above_threshold, summary.threshold
        );
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compare a current and a previous workbook into one report."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two workbooks and write the comparison report.
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Current workbook (.xlsx).
    #[arg(long)]
    current: PathBuf,

    /// Previous workbook (.xlsx).
    #[arg(long)]
    previous: PathBuf,

    /// Report file path.
    #[arg(long, default_value = "Comparison_Report.xlsx")]
    output: PathBuf,

    /// Percentage threshold above which a market is reported as "Not OK".
    #[arg(long)]
    threshold: Option<f64>,

    /// Phrase flagging a row; repeat to pass several. Replaces the configured list.
    #[arg(long = "marker")]
    markers: Vec<String>,

    /// Optional JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional path receiving the run summary as JSON.
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl RunArgs {
    fn resolve_config(&self) -> Result<CompareConfig> {
        let mut config = match &self.config {
            Some(path) => CompareConfig::from_file(path)?,
            None => CompareConfig::default(),
        };
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if !self.markers.is_empty() {
            config.markers = self.markers.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
