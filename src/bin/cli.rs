//! foodscores CLI
//!
//! Every command writes its data (CSV or feed XML) to stdout and its logs to
//! stderr, so commands compose with shell redirection.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use foodscores::{
    error::Result,
    models::Config,
    pipeline::{self, FeedFlavor, FeedFormat},
    services::ScoreScraper,
    storage::write_snapshot,
};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "foodscores.toml";

/// foodscores - Food Inspection Score Feeds
#[derive(Parser, Debug)]
#[command(
    name = "foodscores",
    version,
    about = "Scrape food inspection scores and render them as feeds"
)]
struct Cli {
    /// Path to a TOML configuration file (default: ./foodscores.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity; can be used multiple times
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape inspection scores and print them as CSV
    Download {
        /// Zip code to search (default: all configured zip codes)
        #[arg(long = "zip")]
        zip_codes: Vec<String>,
    },

    /// Print the union of CSV snapshots as one CSV
    Union {
        /// CSV files to combine
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Render a feed from a CSV snapshot read on stdin
    Feed {
        /// Feed format
        #[arg(short, long, value_enum, default_value_t = FeedFormat::Atom)]
        format: FeedFormat,

        /// Number of recent inspections to include (default: feed.default_entries)
        #[arg(short = 'n', long)]
        num_entries: Option<usize>,

        /// Which inspections to include
        #[arg(value_enum, default_value_t = FeedFlavor::All)]
        flavor: FeedFlavor,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on the verbosity count.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("foodscores: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            log::info!("Loaded configuration from {}", path.display());
            config
        }
        None => Config::load_or_default(DEFAULT_CONFIG),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Download { zip_codes } => {
            config.validate()?;
            let zip_codes = if zip_codes.is_empty() {
                config.scraper.zip_codes.clone()
            } else {
                zip_codes
            };

            let scraper = ScoreScraper::new(config.scraper.clone())?;
            let records =
                pipeline::run_download(&scraper, &zip_codes, config.scraper.max_concurrent)
                    .await?;
            write_snapshot(&mut out, &records)?;
        }

        Command::Union { files } => {
            let count = pipeline::run_union(&files, &mut out)?;
            log::info!("Wrote {} records", count);
        }

        Command::Feed {
            format,
            num_entries,
            flavor,
        } => {
            let count = num_entries.unwrap_or(config.feed.default_entries);
            let stdin = io::stdin();
            let rendered = pipeline::run_feed(
                &config.feed,
                stdin.lock(),
                "stdin",
                &mut out,
                format,
                flavor,
                count,
            )?;
            log::info!("Rendered {} feed entries", rendered);
        }

        Command::Validate => {
            config.validate()?;
            log::info!("Configuration OK");
            writeln!(out, "Configuration OK")?;
        }
    }

    out.flush()?;
    Ok(())
}
