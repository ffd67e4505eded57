use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::layout;
use crate::domain::catalog::SeriesCatalog;
use crate::infra::downloader::Downloader;
use crate::signal::Interrupt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    /// Left untouched because the run was interrupted.
    pub skipped: usize,
}

impl Summary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    pub fn merge(&mut self, other: Summary) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Downloads every catalogued episode in (series, episode) order, recording
/// the outcome on each one. A failed episode does not stop the batch.
pub fn download_episodes(
    catalog: &mut SeriesCatalog,
    root: &Path,
    downloader: &dyn Downloader,
    interrupt: &Interrupt,
) -> Result<Summary> {
    let series_title = catalog.title.clone();
    let mut summary = Summary::default();

    for episode in catalog.sorted_mut() {
        if interrupt.is_set() {
            summary.skipped += 1;
            continue;
        }

        let output_file = layout::episode_path(root, &series_title, episode);
        println!(
            "Downloading Series {} Episode {} - {}",
            episode.series, episode.episode, episode.title
        );
        println!("Saving to {}", output_file.display());

        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let succeeded = downloader.download(&episode.url, Some(&output_file))?;
        episode.record(succeeded);

        if succeeded {
            println!("Downloaded {} successfully", episode.title);
            summary.succeeded += 1;
        } else {
            eprintln!("Error downloading episode {}", episode.title);
            summary.failed += 1;
        }
    }

    if summary.skipped > 0 {
        eprintln!(
            "Interrupted, {} episode(s) were not attempted",
            summary.skipped
        );
    }

    Ok(summary)
}

/// Flat mode: hand each URL to the downloader as-is, with no output path
/// and no status tracking.
pub fn download_urls(
    urls: &[String],
    downloader: &dyn Downloader,
    interrupt: &Interrupt,
) -> Result<Summary> {
    let mut summary = Summary::default();

    for url in urls {
        if interrupt.is_set() {
            summary.skipped += 1;
            continue;
        }

        println!("{url}");
        if downloader.download(url, None)? {
            summary.succeeded += 1;
        } else {
            eprintln!("Error downloading {url}");
            summary.failed += 1;
        }
    }

    Ok(summary)
}
