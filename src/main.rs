//! Origin-Walker main entry point
//!
//! This is the command-line interface for the Origin-Walker site crawler.

use anyhow::Context;
use clap::Parser;
use origin_walker::config::{load_config, Config};
use origin_walker::crawler::run_crawl_until;
use origin_walker::output::{export_csv, filter_by_content_type, group_by_content_type, print_results};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Checkpoint interval used when no config file sets one
const CLI_SAVE_INTERVAL: usize = 25;

/// Origin-Walker: a resumable single-origin site crawler
///
/// Origin-Walker follows every link, image, script and stylesheet on the
/// host of the start URL, records the content type of each, and saves its
/// progress so an interrupted crawl can be resumed.
#[derive(Parser, Debug)]
#[command(name = "origin-walker")]
#[command(version = "1.0.0")]
#[command(about = "A resumable single-origin site crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL", required_unless_present = "export_csv")]
    url: Option<String>,

    /// Only show results whose content type contains this text
    #[arg(short, long, value_name = "FILTER")]
    filter: Option<String>,

    /// Checkpoint file for progress and results
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum link depth from the start URL (unlimited if omitted)
    #[arg(short = 'd', long, value_name = "DEPTH")]
    max_depth: Option<u32>,

    /// Save progress every N crawled URLs
    #[arg(short, long, value_name = "N")]
    save_interval: Option<usize>,

    /// Number of simultaneous requests
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Resume from the checkpoint file if it is for the same URL
    #[arg(short, long)]
    resume: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Convert the checkpoint file into CSV and exit
    #[arg(long, value_name = "CSV", conflicts_with_all = ["filter", "max_depth", "resume"])]
    export_csv: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if let Some(csv_path) = &cli.export_csv {
        return handle_export(&config, csv_path);
    }

    let url = cli.url.as_deref().context("a start URL is required")?;
    handle_crawl(url, config, cli.filter.as_deref()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("origin_walker=info,warn"),
            1 => EnvFilter::new("origin_walker=debug,info"),
            2 => EnvFilter::new("origin_walker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => {
            let mut config = Config::default();
            config.output.save_interval = CLI_SAVE_INTERVAL;
            config
        }
    };

    if let Some(output) = &cli.output {
        config.output.output_file = output.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = Some(depth);
    }
    if let Some(interval) = cli.save_interval {
        config.output.save_interval = interval;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if cli.resume {
        config.output.resume = true;
    }

    Ok(config)
}

/// Handles --export-csv: converts the checkpoint file and exits
fn handle_export(config: &Config, csv_path: &std::path::Path) -> anyhow::Result<()> {
    let input = &config.output.output_file;
    let rows = export_csv(input, csv_path).with_context(|| {
        format!(
            "failed to export {} to {}",
            input.display(),
            csv_path.display()
        )
    })?;

    println!("✓ Wrote {} rows to {}", rows, csv_path.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(url: &str, config: Config, filter: Option<&str>) -> anyhow::Result<()> {
    tracing::info!("Starting crawl from: {}", url);
    tracing::info!(
        "Saving progress to {} every {} URLs, {} simultaneous requests",
        config.output.output_file.display(),
        config.output.save_interval,
        config.crawler.concurrency
    );
    if config.output.resume {
        tracing::info!("Attempting to resume from previous session");
    }

    let output_file = config.output.output_file.clone();
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, waiting for in-flight requests before saving");
            signal_token.cancel();
        }
    });

    let results = run_crawl_until(url, config, cancel.clone())
        .await
        .with_context(|| format!("crawl of {} failed", url))?;

    let shown = match filter {
        Some(filter) => {
            let filtered = filter_by_content_type(&results, filter);
            println!(
                "Filtered by \"{}\": {}/{} URLs\n",
                filter,
                filtered.len(),
                results.len()
            );
            filtered
        }
        None => results.iter().collect(),
    };

    print_results(shown.len(), &group_by_content_type(shown.iter().copied()));

    if cancel.is_cancelled() {
        println!("Progress saved to {}; rerun with --resume to continue", output_file.display());
    } else {
        println!("✓ All results saved to {}", output_file.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["origin-walker", "https://example.com"]).unwrap();
        let config = build_config(&cli).unwrap();

        assert_eq!(cli.url.as_deref(), Some("https://example.com"));
        assert_eq!(config.output.save_interval, CLI_SAVE_INTERVAL);
        assert_eq!(config.crawler.concurrency, 5);
        assert_eq!(config.crawler.max_depth, None);
        assert!(!config.output.resume);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "origin-walker",
            "https://example.com",
            "-d",
            "2",
            "-c",
            "8",
            "-s",
            "10",
            "-o",
            "site.json",
            "-r",
            "-f",
            "image",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.crawler.max_depth, Some(2));
        assert_eq!(config.crawler.concurrency, 8);
        assert_eq!(config.output.save_interval, 10);
        assert_eq!(config.output.output_file, PathBuf::from("site.json"));
        assert!(config.output.resume);
        assert_eq!(cli.filter.as_deref(), Some("image"));
    }

    #[test]
    fn test_cli_requires_url() {
        assert!(Cli::try_parse_from(["origin-walker"]).is_err());
    }

    #[test]
    fn test_cli_export_without_url() {
        let cli =
            Cli::try_parse_from(["origin-walker", "--export-csv", "out.csv", "-o", "site.json"])
                .unwrap();

        assert!(cli.url.is_none());
        assert_eq!(cli.export_csv, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["origin-walker", "https://example.com", "-v", "-q"]).is_err());
    }
}
