use regex::{Captures, Regex};

use crate::domain::models::Episode;

/// Pulls episode metadata out of a listing page. The pattern supplies series,
/// episode and title slug either as named groups or as groups 1-3.
pub struct StructuredExtractor<'a> {
    pub pattern: &'a Regex,
    pub origin: &'a str,
}

impl StructuredExtractor<'_> {
    pub fn extract(&self, body: &str) -> Vec<Episode> {
        self.pattern
            .captures_iter(body)
            .filter_map(|caps| self.episode_from(&caps))
            .collect()
    }

    fn episode_from(&self, caps: &Captures) -> Option<Episode> {
        let fragment = caps.get(0)?.as_str();
        let series = group(caps, "series", 1)?;
        let episode = group(caps, "episode", 2)?;
        let slug = group(caps, "title", 3)?;

        let (Ok(series), Ok(episode)) = (series.parse::<u32>(), episode.parse::<u32>()) else {
            tracing::warn!(fragment, "series or episode number is not a number, skipping");
            return None;
        };

        Some(Episode::new(
            series,
            episode,
            normalize_title(slug),
            format!("{}{}", self.origin, fragment),
        ))
    }
}

/// Collects bare episode URLs, for series whose slugs carry no usable numbering.
pub struct FlatExtractor<'a> {
    pub pattern: &'a Regex,
    pub origin: &'a str,
}

impl FlatExtractor<'_> {
    pub fn extract(&self, body: &str) -> Vec<String> {
        self.pattern
            .find_iter(body)
            .map(|m| format!("{}{}", self.origin, m.as_str().replace('"', "")))
            .collect()
    }
}

fn group<'h>(caps: &Captures<'h>, name: &str, index: usize) -> Option<&'h str> {
    caps.name(name)
        .or_else(|| caps.get(index))
        .map(|m| m.as_str())
}

pub fn normalize_title(slug: &str) -> String {
    title_case(&slug.replace('-', " ")).trim().to_string()
}

/// Upper-cases every letter that follows a non-letter and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
