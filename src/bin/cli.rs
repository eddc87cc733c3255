//! Faculty Crawler CLI
//!
//! Scrapes a faculty listing page and exports the records as JSON and/or CSV.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use faculty_crawler::{
    Scraper,
    error::Result,
    export::{self, Format},
    models::{Config, ProfessorRecord},
};

/// Faculty Crawler - professor contact extraction
#[derive(Parser, Debug)]
#[command(
    name = "faculty-crawler",
    version,
    about = "Extract professor names, emails and departments from faculty listing pages",
    long_about = "Extract professor names, emails and departments from faculty listing pages.\n\n\
        Pages that need JavaScript are rendered with headless Chromium, and the deep crawl \
        of individual profile pages also runs in the browser. Both are only available when \
        the binary is built with `cargo build --features browser`; without that feature \
        only the static listing page is scraped."
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a faculty listing page
    Scrape {
        /// URL of the listing page
        url: String,

        /// Output file path without extension (default: professors_<timestamp>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
        format: OutputFormat,

        /// Do not launch a headless browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Validate the configuration file
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
    Both,
}

impl OutputFormat {
    fn formats(self) -> &'static [Format] {
        match self {
            Self::Json => &[Format::Json],
            Self::Csv => &[Format::Csv],
            Self::Both => &[Format::Json, Format::Csv],
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = if cli.config.exists() {
        let config = Config::load_or_default(&cli.config);
        log::info!("Loaded configuration from {}", cli.config.display());
        config
    } else {
        log::debug!("{} not found; using defaults", cli.config.display());
        Config::default()
    };

    match cli.command {
        Command::Scrape {
            url,
            output,
            format,
            no_browser,
        } => {
            config.validate()?;

            #[cfg(not(feature = "browser"))]
            log::info!("Built without the `browser` feature; rendered retry and deep crawl are off");

            let mut scraper = Scraper::from_config(config)?;
            if no_browser {
                scraper = scraper.without_browser();
            }

            let records = scraper.scrape(&url).await?;
            if records.is_empty() {
                log::warn!("No professor records found at {url}");
                return Ok(());
            }

            for format in format.formats() {
                let path = output_path(output.as_deref(), *format);
                write_export(&path, *format, &records)?;
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}

fn output_path(base: Option<&Path>, format: Format) -> PathBuf {
    match base {
        Some(base) => base.with_extension(format.extension()),
        None => PathBuf::from(export::default_file_name(format)),
    }
}

fn write_export(path: &Path, format: Format, records: &[ProfessorRecord]) -> Result<()> {
    match format {
        Format::Json => export::write_json(path, records)?,
        Format::Csv => {
            export::write_csv(path, records)?;
        }
    }
    log::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
