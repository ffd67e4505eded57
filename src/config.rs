use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ORIGIN: &str = "https://www.bbc.co.uk";
pub const DEFAULT_DOWNLOADER: &str = "youtube-dl";
const DOWNLOADER_ENV: &str = "IPLAYER_DL_DOWNLOADER";

const BUILTIN_CONFIG: &str = r#"
[[series]]
title = "Inside No. 9"
mode = "structured"
pattern = '/iplayer/episode/[a-z0-9]+/inside-no-9-series-([0-9])-([0-9]+)-([a-zA-Z- ]+)'
urls = [
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=b03tvq6m",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=b05p655x",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=b08ghppm",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=b09lddtr",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=m000f1tc",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=p099qq07",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=m0016mq4",
    "https://www.bbc.co.uk/iplayer/episodes/b05p650r/inside-no-9?seriesId=m001gdvb",
]

[[series]]
title = "QI"
mode = "flat"
pattern = '"/iplayer/episode/[a-z0-9]+/qi-series-[a-z]-[0-9]+-[a-zA-Z- ]+"'
urls = [
    "https://www.bbc.co.uk/iplayer/episodes/b006ml0g/qi?seriesId=b006ml0f",
    "https://www.bbc.co.uk/iplayer/episodes/b006ml0g/qi?seriesId=b0080kf3",
]
"#;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Per-episode metadata, structured file names and a status file.
    Structured,
    /// Bare URLs handed straight to the downloader.
    Flat,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    downloader: Option<String>,
    #[serde(default)]
    downloader_args: Vec<String>,
    output_dir: Option<PathBuf>,
    series: Vec<SeriesFile>,
}

#[derive(Debug, Deserialize)]
struct SeriesFile {
    title: String,
    mode: ExtractionMode,
    origin: Option<String>,
    pattern: String,
    urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SeriesConfig {
    pub title: String,
    pub mode: ExtractionMode,
    pub origin: String,
    pub pattern: Regex,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub downloader: String,
    pub downloader_args: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub series: Vec<SeriesConfig>,
}

impl Config {
    /// Loads the explicit config file if given, else the user config file if
    /// it exists, else the built-in series list.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let content = match explicit {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?,
            None => {
                let config_path = get_config_path();
                if config_path.exists() {
                    tracing::debug!(path = %config_path.display(), "using user config");
                    fs::read_to_string(&config_path)?
                } else {
                    tracing::debug!("no user config, using built-in series");
                    BUILTIN_CONFIG.to_string()
                }
            }
        };

        let mut config = Self::parse(&content)?;
        if let Ok(downloader) = env::var(DOWNLOADER_ENV) {
            config.downloader = downloader;
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;

        let series = file
            .series
            .into_iter()
            .map(SeriesConfig::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            downloader: file
                .downloader
                .unwrap_or_else(|| DEFAULT_DOWNLOADER.to_string()),
            downloader_args: file.downloader_args,
            output_dir: file.output_dir,
            series,
        })
    }

    /// Command line override, then the config file, then `$HOME/Downloads`.
    pub fn resolve_output_dir(&self, cli_override: Option<PathBuf>) -> Result<PathBuf> {
        match cli_override.or_else(|| self.output_dir.clone()) {
            Some(dir) => Ok(dir),
            None => default_output_dir(),
        }
    }

    /// Narrows the configured series to the requested titles (case-insensitive).
    pub fn select(&self, titles: &[String]) -> Result<Vec<&SeriesConfig>> {
        if titles.is_empty() {
            return Ok(self.series.iter().collect());
        }

        titles
            .iter()
            .map(|wanted| {
                match self
                    .series
                    .iter()
                    .find(|s| s.title.eq_ignore_ascii_case(wanted))
                {
                    Some(series) => Ok(series),
                    None => bail!("No configured series titled '{wanted}'"),
                }
            })
            .collect()
    }
}

impl TryFrom<SeriesFile> for SeriesConfig {
    type Error = anyhow::Error;

    fn try_from(file: SeriesFile) -> Result<Self> {
        let pattern = Regex::new(&file.pattern)
            .with_context(|| format!("Invalid pattern for series '{}'", file.title))?;

        // group 0 is the whole match
        if file.mode == ExtractionMode::Structured && pattern.captures_len() < 4 {
            bail!(
                "Pattern for series '{}' needs series, episode and title capture groups",
                file.title
            );
        }

        Ok(Self {
            title: file.title,
            mode: file.mode,
            origin: file.origin.unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            pattern,
            urls: file.urls,
        })
    }
}

fn default_output_dir() -> Result<PathBuf> {
    match env::var("HOME") {
        Ok(home) => Ok(PathBuf::from(home).join("Downloads")),
        Err(_) => bail!("HOME is not set. Pass --output-dir or set output_dir in the config file"),
    }
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("iplayer-dl"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_parses() {
        let config = Config::parse(&format!("output_dir = \"/tmp/dl\"\n{BUILTIN_CONFIG}")).unwrap();
        assert_eq!(config.downloader, "youtube-dl");
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/dl")));
        assert_eq!(config.series.len(), 2);

        let inside = &config.series[0];
        assert_eq!(inside.title, "Inside No. 9");
        assert_eq!(inside.mode, ExtractionMode::Structured);
        assert_eq!(inside.origin, DEFAULT_ORIGIN);
        assert_eq!(inside.urls.len(), 8);

        let qi = &config.series[1];
        assert_eq!(qi.mode, ExtractionMode::Flat);
    }

    #[test]
    fn test_structured_pattern_needs_three_groups() {
        let content = r#"
output_dir = "/tmp/dl"
[[series]]
title = "Broken"
mode = "structured"
pattern = '/iplayer/episode/([a-z0-9]+)'
urls = []
"#;
        let err = Config::parse(content).unwrap_err();
        assert!(err.to_string().contains("capture groups"));
    }

    #[test]
    fn test_flat_pattern_needs_no_groups() {
        let content = r#"
output_dir = "/tmp/dl"
downloader = "yt-dlp"
downloader_args = ["--no-progress"]
[[series]]
title = "QI"
mode = "flat"
origin = "http://localhost:8080"
pattern = '/iplayer/episode/[a-z0-9]+'
urls = ["http://localhost:8080/list"]
"#;
        let config = Config::parse(content).unwrap();
        assert_eq!(config.downloader, "yt-dlp");
        assert_eq!(config.downloader_args, vec!["--no-progress".to_string()]);
        assert_eq!(config.series[0].origin, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let content = r#"
output_dir = "/tmp/dl"
[[series]]
title = "Bad"
mode = "flat"
pattern = '(unclosed'
urls = []
"#;
        let err = Config::parse(content).unwrap_err();
        assert!(err.to_string().contains("Invalid pattern for series 'Bad'"));
    }

    #[test]
    fn test_output_dir_override() {
        let config = Config::parse(BUILTIN_CONFIG).unwrap();
        assert_eq!(config.output_dir, None);
        assert_eq!(
            config
                .resolve_output_dir(Some(PathBuf::from("/mnt/media")))
                .unwrap(),
            PathBuf::from("/mnt/media")
        );

        let config = Config::parse(&format!("output_dir = \"/tmp/dl\"\n{BUILTIN_CONFIG}")).unwrap();
        assert_eq!(
            config.resolve_output_dir(None).unwrap(),
            PathBuf::from("/tmp/dl")
        );
    }

    #[test]
    fn test_select_series() {
        let config = Config::parse(&format!("output_dir = \"/tmp/dl\"\n{BUILTIN_CONFIG}")).unwrap();

        assert_eq!(config.select(&[]).unwrap().len(), 2);

        let picked = config.select(&["qi".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].title, "QI");

        assert!(config.select(&["Sherlock".to_string()]).is_err());
    }
}
