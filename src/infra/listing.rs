use anyhow::{Context, Result};

pub trait ListingFetcher {
    /// Returns the page body, or `None` when the server answered with a
    /// non-success status.
    fn fetch(&self, url: &str) -> Result<Option<String>>;
}

#[derive(Default)]
pub struct HttpListingFetcher {
    client: reqwest::blocking::Client,
}

impl HttpListingFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl ListingFetcher for HttpListingFetcher {
    fn fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch listing page {url}"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, %status, "skipping listing page");
            return Ok(None);
        }

        Ok(Some(response.text()?))
    }
}
