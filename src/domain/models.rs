use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownloadStatus {
    #[default]
    NotStarted,
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Episode {
    pub series: u32,
    pub episode: u32,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub status: DownloadStatus,
}

impl Episode {
    pub fn new(series: u32, episode: u32, title: String, url: String) -> Self {
        Self {
            series,
            episode,
            title,
            url,
            status: DownloadStatus::NotStarted,
        }
    }

    /// Records the outcome of the download attempt. Only the first outcome
    /// sticks; a finished episode never goes back.
    pub fn record(&mut self, succeeded: bool) {
        if self.status != DownloadStatus::NotStarted {
            return;
        }
        self.status = if succeeded {
            DownloadStatus::Success
        } else {
            DownloadStatus::Error
        };
    }
}
