//! Output module for presenting and exporting crawl results
//!
//! This module handles:
//! - Filtering and grouping results by content type
//! - Printing grouped results to the terminal
//! - Exporting a checkpoint's results as CSV

mod csv_export;
mod report;

pub use csv_export::{export_csv, CSV_HEADER};
pub use report::{format_results, print_results};

use crate::state::{CrawlResult, CONTENT_TYPE_UNKNOWN};
use std::collections::HashMap;

/// URLs sharing one content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeGroup {
    pub content_type: String,
    pub urls: Vec<String>,
}

/// Keeps the results whose content type contains `filter`, ignoring case
///
/// An empty filter keeps everything.
pub fn filter_by_content_type<'a>(results: &'a [CrawlResult], filter: &str) -> Vec<&'a CrawlResult> {
    let needle = filter.to_lowercase();
    results
        .iter()
        .filter(|r| r.content_type.to_lowercase().contains(&needle))
        .collect()
}

/// Groups result URLs by content type
///
/// Groups are ordered by descending size; groups of equal size keep the
/// order in which their content type first appeared. Results without a
/// content type are grouped under `unknown`.
pub fn group_by_content_type<'a>(
    results: impl IntoIterator<Item = &'a CrawlResult>,
) -> Vec<ContentTypeGroup> {
    let mut groups: Vec<ContentTypeGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in results {
        let content_type = if result.content_type.is_empty() {
            CONTENT_TYPE_UNKNOWN
        } else {
            result.content_type.as_str()
        };

        let slot = *index.entry(content_type.to_string()).or_insert_with(|| {
            groups.push(ContentTypeGroup {
                content_type: content_type.to_string(),
                urls: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].urls.push(result.url.clone());
    }

    // sort_by is stable, so ties keep first-appearance order
    groups.sort_by(|a, b| b.urls.len().cmp(&a.urls.len()));
    groups
}
