use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::Episode;

/// All episodes discovered for one series during a run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeriesCatalog {
    pub title: String,
    pub episodes: BTreeMap<String, Episode>, // url -> episode
}

impl SeriesCatalog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            episodes: BTreeMap::new(),
        }
    }

    /// Inserts the episode, replacing any earlier one with the same URL.
    pub fn add(&mut self, episode: Episode) {
        self.episodes.insert(episode.url.clone(), episode);
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn sorted(&self) -> Vec<&Episode> {
        let mut episodes: Vec<&Episode> = self.episodes.values().collect();
        episodes.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        episodes
    }

    pub fn sorted_mut(&mut self) -> Vec<&mut Episode> {
        let mut episodes: Vec<&mut Episode> = self.episodes.values_mut().collect();
        episodes.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        episodes
    }
}

// URL breaks ties so two listings of the same S/E always come out in one order
fn sort_key(episode: &Episode) -> (u32, u32, &str) {
    (episode.series, episode.episode, episode.url.as_str())
}
