use std::path::PathBuf;

use anyhow::{Context, Result};
use apod_scraper::downloader::DEFAULT_N_DAYS;
use apod_scraper::{run, ApodClient, ClientConfig, DownloadOptions};
use clap::Parser;

/// Download recent NASA Astronomy Photos of the Day
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to put the downloaded photos in
    destination: PathBuf,

    /// Number of days to download
    #[arg(short = 'n', long, default_value_t = DEFAULT_N_DAYS)]
    n_days: u32,

    /// Delete photos older than the number of days specified
    #[arg(long)]
    delete_old: bool,

    /// Log each request and skipped file
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let options = DownloadOptions {
        n_days: cli.n_days,
        destination: cli.destination,
        delete_old: cli.delete_old,
    };

    let client = ApodClient::new(ClientConfig::default()).context("Failed to build HTTP client")?;
    let today = chrono::Local::now().date_naive();

    let mut stderr = std::io::stderr().lock();
    run(&client, &options, today, &mut stderr)
        .with_context(|| format!("Failed to download photos into {}", options.destination.display()))?;

    Ok(())
}
