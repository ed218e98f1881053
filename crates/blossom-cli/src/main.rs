use std::path::PathBuf;

use blossom_core::ExportFormat;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "blossom", version, about = "Blossom hormonal wellness companion")]
struct Cli {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete (or redo) onboarding
    Onboard(commands::profile::OnboardArgs),
    /// Show cycle day and phase
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a symptom
    Log(commands::symptoms::LogArgs),
    /// Show the most recent symptoms
    Recent {
        /// Number of entries
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look for phase/symptom patterns
    Patterns {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Trend aggregates for charting
    Trends {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a wellness insight
    Insight,
    /// Talk to Bloom (interactive when no message is given)
    Chat {
        /// One-shot message
        message: Option<String>,
    },
    /// Export the symptom log
    Export {
        /// csv or json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import symptom entries from a CSV or JSON export
    Import {
        /// File to read
        path: PathBuf,
        /// csv or json (defaults to the file extension)
        #[arg(short, long)]
        format: Option<ExportFormat>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BLOSSOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let today = commands::today(cli.date);
    let result = match cli.command {
        Commands::Onboard(args) => commands::profile::onboard(args),
        Commands::Status { json } => commands::profile::status(today, json),
        Commands::Log(args) => commands::symptoms::log(args, today),
        Commands::Recent { count, json } => commands::symptoms::recent(count, json),
        Commands::Patterns { json } => commands::analysis::patterns(json),
        Commands::Trends { json } => commands::analysis::trends(json),
        Commands::Insight => commands::analysis::insight(),
        Commands::Chat { message } => commands::chat::run(message, today),
        Commands::Export { format, output } => commands::transfer::export(format, output),
        Commands::Import { path, format } => commands::transfer::import(&path, format),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
