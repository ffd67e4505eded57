use std::path::{Path, PathBuf};

use crate::domain::models::Episode;

pub const STATUS_FILE_NAME: &str = "download_status.txt";

pub fn generate_filename(
    series_title: &str,
    series: u32,
    episode: u32,
    episode_title: &str,
) -> String {
    format!(
        "{} - S{:02}E{:02} - {}.mp4",
        sanitize_filename(series_title),
        series,
        episode,
        sanitize_filename(episode_title)
    )
}

fn sanitize_filename(name: &str) -> String {
    // Remove or replace invalid filename characters
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn series_dir(root: &Path, series_title: &str) -> PathBuf {
    root.join(sanitize_filename(series_title))
}

/// `<root>/<series>/Season <n>/<series> - SxxEyy - <title>.mp4`
pub fn episode_path(root: &Path, series_title: &str, episode: &Episode) -> PathBuf {
    series_dir(root, series_title)
        .join(format!("Season {}", episode.series))
        .join(generate_filename(
            series_title,
            episode.series,
            episode.episode,
            &episode.title,
        ))
}

pub fn status_path(root: &Path, series_title: &str) -> PathBuf {
    series_dir(root, series_title).join(STATUS_FILE_NAME)
}
