//! Source list loading and URL screening.
//!
//! The source file is a one-column flat file, one candidate URL per line,
//! maintained by hand. Lines that do not look like an http(s) URL are filter
//! fodder, not errors: they are dropped silently so a stray comment or blank
//! line never aborts a scheduled run.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

/// Screen one candidate line. Matching is a substring search, so a URL
/// embedded in surrounding text still passes; the whole line is what gets
/// fetched either way.
pub fn is_valid_url(candidate: &str) -> bool {
    let url_re = Regex::new(
        r"((http|https)://)(www.)?[a-zA-Z0-9@:%._\+~#?&//=]{2,256}\.[a-z]{2,6}\b([-a-zA-Z0-9@:%._\+~#?&//=]*)",
    )
    .expect("url regex is valid");
    url_re.is_match(candidate)
}

/// Raw first-column candidates in file order, no screening applied.
pub fn read_candidates(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening source list {}", path.display()))?;

    let mut candidates = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading source list {}", path.display()))?;
        if let Some(first) = record.get(0) {
            candidates.push(first.trim().to_string());
        }
    }
    Ok(candidates)
}

/// Candidates that pass the URL screen, in file order.
pub fn load_sources(path: &Path) -> Result<Vec<String>> {
    let urls = read_candidates(path)?
        .into_iter()
        .filter(|line| {
            let keep = is_valid_url(line);
            if !keep && !line.is_empty() {
                debug!("dropping source line that is not a URL: {line:?}");
            }
            keep
        })
        .collect();
    Ok(urls)
}
