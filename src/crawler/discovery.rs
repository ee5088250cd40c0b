//! Link discovery
//!
//! Turns the raw attribute values of one page into crawlable addresses:
//! resolved against the page URL, restricted to the crawl origin and not yet
//! visited.

use crate::crawler::parser::extract_links;
use crate::state::VisitedSet;
use crate::url::{normalize_url, same_origin};
use std::collections::HashSet;
use url::Url;

/// Discovers new same-origin addresses in a page
///
/// # Arguments
///
/// * `markup` - The page HTML
/// * `base` - The URL the page was fetched from
/// * `origin` - The crawl's start URL, defining the in-bounds host
/// * `visited` - Addresses already dispatched
///
/// # Returns
///
/// Normalized addresses in document order, without duplicates
pub fn discover(markup: &str, base: &Url, origin: &Url, visited: &VisitedSet) -> Vec<String> {
    let links = extract_links(markup);
    filter_links(links.iter().map(String::as_str), base, origin, visited)
}

/// Normalizes raw link values and keeps the in-bounds, unvisited ones
pub fn filter_links<'a>(
    links: impl IntoIterator<Item = &'a str>,
    base: &Url,
    origin: &Url,
    visited: &VisitedSet,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut discovered = Vec::new();

    for link in links {
        let url = match normalize_url(link, base) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Skipping link {:?} on {}: {}", link, base, e);
                continue;
            }
        };

        if !same_origin(&url, origin) {
            continue;
        }

        let url = String::from(url);
        if visited.contains(&url) || !seen.insert(url.clone()) {
            continue;
        }

        discovered.push(url);
    }

    discovered
}
