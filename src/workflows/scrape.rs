use anyhow::Result;
use std::collections::BTreeSet;

use super::extract::{FlatExtractor, StructuredExtractor};
use crate::config::SeriesConfig;
use crate::domain::catalog::SeriesCatalog;
use crate::infra::listing::ListingFetcher;
use crate::signal::Interrupt;

/// Fetches every listing page of the series and adds what it finds to the
/// catalog. Pages answering with an error status contribute nothing.
pub fn collect_episodes(
    fetcher: &dyn ListingFetcher,
    series: &SeriesConfig,
    catalog: &mut SeriesCatalog,
    interrupt: &Interrupt,
) -> Result<()> {
    let extractor = StructuredExtractor {
        pattern: &series.pattern,
        origin: &series.origin,
    };

    for url in &series.urls {
        if interrupt.is_set() {
            break;
        }
        let Some(body) = fetcher.fetch(url)? else {
            continue;
        };

        let episodes = extractor.extract(&body);
        tracing::debug!(url, found = episodes.len(), "scanned listing page");
        for episode in episodes {
            catalog.add(episode);
        }
    }

    Ok(())
}

/// Flat mode: unique episode URLs across all listing pages, ordered by
/// their final path segment.
pub fn collect_urls(
    fetcher: &dyn ListingFetcher,
    series: &SeriesConfig,
    interrupt: &Interrupt,
) -> Result<Vec<String>> {
    let extractor = FlatExtractor {
        pattern: &series.pattern,
        origin: &series.origin,
    };

    let mut urls = BTreeSet::new();
    for url in &series.urls {
        if interrupt.is_set() {
            break;
        }
        let Some(body) = fetcher.fetch(url)? else {
            continue;
        };
        urls.extend(extractor.extract(&body));
    }

    let mut urls: Vec<String> = urls.into_iter().collect();
    urls.sort_by(|a, b| last_segment(a).cmp(last_segment(b)));
    Ok(urls)
}

fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
