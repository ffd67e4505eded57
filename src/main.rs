mod cli;
mod config;
mod domain;
mod infra;
mod logging;
mod signal;
mod workflows;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;

use cli::Cli;
use config::{Config, ExtractionMode, SeriesConfig};
use domain::catalog::SeriesCatalog;
use infra::downloader::{Downloader, ExternalDownloader};
use infra::listing::{HttpListingFetcher, ListingFetcher};
use infra::status::StatusGuard;
use signal::Interrupt;
use workflows::download::{self, Summary};
use workflows::{layout, scrape};

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match run(cli) {
        Ok(summary) if summary.is_clean() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<Summary> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(downloader) = cli.downloader {
        config.downloader = downloader;
    }
    let output_dir = config.resolve_output_dir(cli.output_dir)?;
    let selected = config.select(&cli.series)?;

    let interrupt = Interrupt::install();
    let fetcher = HttpListingFetcher::new();
    let downloader =
        ExternalDownloader::new(config.downloader.clone(), config.downloader_args.clone());

    let mut total = Summary::default();
    for series in selected {
        if interrupt.is_set() {
            break;
        }

        let summary = match series.mode {
            ExtractionMode::Structured => process_structured(
                &fetcher,
                &downloader,
                series,
                &output_dir,
                cli.dry_run,
                &interrupt,
            )?,
            ExtractionMode::Flat => {
                process_flat(&fetcher, &downloader, series, cli.dry_run, &interrupt)?
            }
        };
        total.merge(summary);
    }

    if !cli.dry_run {
        println!("{} succeeded, {} failed", total.succeeded, total.failed);
    }
    if interrupt.is_set() {
        bail!("Interrupted");
    }

    Ok(total)
}

fn process_structured(
    fetcher: &dyn ListingFetcher,
    downloader: &dyn Downloader,
    series: &SeriesConfig,
    output_dir: &Path,
    dry_run: bool,
    interrupt: &Interrupt,
) -> Result<Summary> {
    if dry_run {
        let mut catalog = SeriesCatalog::new(series.title.as_str());
        scrape::collect_episodes(fetcher, series, &mut catalog, interrupt)?;
        println!("Found {} episode(s) for {}", catalog.len(), series.title);
        for episode in catalog.sorted() {
            println!(
                "  {} -> {}",
                episode.url,
                layout::episode_path(output_dir, &series.title, episode).display()
            );
        }
        return Ok(Summary::default());
    }

    // Created before scraping so a failure anywhere below still leaves a status file
    let mut guard = StatusGuard::new(
        SeriesCatalog::new(series.title.as_str()),
        layout::status_path(output_dir, &series.title),
    );

    scrape::collect_episodes(fetcher, series, &mut guard, interrupt)?;
    if guard.is_empty() {
        eprintln!("Warning: No episodes found for {}", series.title);
    } else {
        println!("Found {} episode(s) for {}", guard.len(), series.title);
    }

    let summary = download::download_episodes(&mut guard, output_dir, downloader, interrupt)?;

    let status_path = guard.path().to_path_buf();
    guard.finish()?;
    println!("Saved download status to {}", status_path.display());

    Ok(summary)
}

fn process_flat(
    fetcher: &dyn ListingFetcher,
    downloader: &dyn Downloader,
    series: &SeriesConfig,
    dry_run: bool,
    interrupt: &Interrupt,
) -> Result<Summary> {
    let urls = scrape::collect_urls(fetcher, series, interrupt)?;
    println!("Found {} episode URL(s) for {}", urls.len(), series.title);

    if dry_run {
        for url in &urls {
            println!("  {url}");
        }
        return Ok(Summary::default());
    }

    download::download_urls(&urls, downloader, interrupt)
}
