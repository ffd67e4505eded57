use anyhow::{Context, Result};
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use crate::domain::catalog::SeriesCatalog;

pub fn save(catalog: &SeriesCatalog, path: &Path) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(catalog)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write status file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
pub fn load(path: &Path) -> Result<SeriesCatalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read status file {}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Owns the catalog for the duration of a run and writes the status file
/// exactly once: on `finish`, or on drop if the run bailed out first.
pub struct StatusGuard {
    catalog: SeriesCatalog,
    path: PathBuf,
    saved: bool,
}

impl StatusGuard {
    pub fn new(catalog: SeriesCatalog, path: PathBuf) -> Self {
        Self {
            catalog,
            path,
            saved: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn finish(mut self) -> Result<SeriesCatalog> {
        self.saved = true;
        save(&self.catalog, &self.path)?;
        Ok(std::mem::replace(
            &mut self.catalog,
            SeriesCatalog::new(String::new()),
        ))
    }
}

impl Deref for StatusGuard {
    type Target = SeriesCatalog;

    fn deref(&self) -> &SeriesCatalog {
        &self.catalog
    }
}

impl DerefMut for StatusGuard {
    fn deref_mut(&mut self) -> &mut SeriesCatalog {
        &mut self.catalog
    }
}

impl Drop for StatusGuard {
    fn drop(&mut self) {
        if self.saved {
            return;
        }
        self.saved = true;
        match save(&self.catalog, &self.path) {
            Ok(()) => eprintln!("Saved partial download status to {}", self.path.display()),
            Err(e) => eprintln!("Warning: Failed to save download status: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DownloadStatus, Episode};
    use tempfile::TempDir;

    fn sample_catalog() -> SeriesCatalog {
        let mut catalog = SeriesCatalog::new("Inside No. 9");
        let mut first = Episode::new(
            1,
            1,
            "Sardines".to_string(),
            "https://www.bbc.co.uk/iplayer/episode/b03tvq6n/inside-no-9-series-1-1-sardines"
                .to_string(),
        );
        first.record(true);
        let mut second = Episode::new(
            1,
            2,
            "A Quiet Night In".to_string(),
            "https://www.bbc.co.uk/iplayer/episode/b03v0s3n/inside-no-9-series-1-2-a-quiet-night-in"
                .to_string(),
        );
        second.record(false);
        let third = Episode::new(
            1,
            3,
            "Tom And Gerri".to_string(),
            "https://www.bbc.co.uk/iplayer/episode/b03vnm3c/inside-no-9-series-1-3-tom-and-gerri"
                .to_string(),
        );
        catalog.add(first);
        catalog.add(second);
        catalog.add(third);
        catalog
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Inside No. 9").join("download_status.txt");
        let catalog = sample_catalog();

        save(&catalog, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, catalog);
        assert_eq!(
            loaded.sorted().iter().map(|e| e.status).collect::<Vec<_>>(),
            vec![
                DownloadStatus::Success,
                DownloadStatus::Error,
                DownloadStatus::NotStarted
            ]
        );
    }

    #[test]
    fn test_save_overwrites_previous_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_status.txt");

        save(&sample_catalog(), &path).unwrap();
        save(&SeriesCatalog::new("Inside No. 9"), &path).unwrap();

        assert!(load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_status_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_status.txt");
        save(&sample_catalog(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["title"], "Inside No. 9");
        let episode = &value["episodes"]
            ["https://www.bbc.co.uk/iplayer/episode/b03tvq6n/inside-no-9-series-1-1-sardines"];
        assert_eq!(episode["series"], 1);
        assert_eq!(episode["episode"], 1);
        assert_eq!(episode["title"], "Sardines");
        assert_eq!(episode["status"], "SUCCESS");
    }

    #[test]
    fn test_guard_saves_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("QI").join("download_status.txt");

        {
            let mut guard = StatusGuard::new(SeriesCatalog::new("QI"), path.clone());
            guard.add(Episode::new(1, 1, "Adam".to_string(), "https://a/1".to_string()));
        }

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.title, "QI");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_guard_saves_on_early_error_return() {
        fn failing_run(guard: &mut StatusGuard) -> Result<()> {
            guard.add(Episode::new(1, 1, "Adam".to_string(), "https://a/1".to_string()));
            anyhow::bail!("listing page exploded");
        }

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_status.txt");

        let result = (|| -> Result<()> {
            let mut guard = StatusGuard::new(SeriesCatalog::new("QI"), path.clone());
            failing_run(&mut guard)?;
            guard.finish()?;
            Ok(())
        })();

        assert!(result.is_err());
        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_finish_returns_persisted_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("download_status.txt");

        let guard = StatusGuard::new(sample_catalog(), path.clone());
        assert_eq!(guard.path(), path.as_path());
        let catalog = guard.finish().unwrap();

        assert_eq!(catalog, sample_catalog());
        assert_eq!(load(&path).unwrap(), catalog);
    }
}
