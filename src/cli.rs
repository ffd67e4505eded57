use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iplayer-dl")]
#[command(about = "Scrape iPlayer listing pages for a series and download every episode")]
pub struct Cli {
    /// Config file describing the series to download
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only process the series with this title (repeatable)
    #[arg(long = "series")]
    pub series: Vec<String>,

    /// External downloader binary
    #[arg(long)]
    pub downloader: Option<String>,

    /// Root directory for downloads and status files
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Print what would be downloaded without running the downloader
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
