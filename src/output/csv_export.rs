//! CSV export of checkpoint results
//!
//! Produces one row per result with the columns
//! `DOMAIN,CONTENT_TYPE,CURRENT_URL,TARGET_URL`. `TARGET_URL` is left empty
//! for manual filling (e.g. when planning redirects). The file starts with a
//! UTF-8 byte order mark so spreadsheet tools detect the encoding.

use crate::state::{CrawlResult, CONTENT_TYPE_UNKNOWN};
use crate::url::display_domain;
use crate::{CrawlError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Column names of the exported file
pub const CSV_HEADER: [&str; 4] = ["DOMAIN", "CONTENT_TYPE", "CURRENT_URL", "TARGET_URL"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Domain written for results whose URL cannot be parsed
const INVALID_DOMAIN: &str = "invalid-url";

/// The part of a checkpoint the export needs
#[derive(Debug, Deserialize)]
struct ResultsFile {
    #[serde(rename = "allResults", default)]
    all_results: Vec<CrawlResult>,
}

/// Converts the results of a checkpoint file into CSV
///
/// # Arguments
///
/// * `checkpoint_path` - JSON checkpoint written by a crawl
/// * `csv_path` - Destination, overwritten if it exists
///
/// # Returns
///
/// * `Ok(usize)` - Number of data rows written
/// * `Err(CrawlError)` - The checkpoint could not be read, has no results,
///   or the CSV could not be written
pub fn export_csv(checkpoint_path: &Path, csv_path: &Path) -> Result<usize> {
    let file = File::open(checkpoint_path)?;
    let parsed: ResultsFile = serde_json::from_reader(BufReader::new(file))?;

    if parsed.all_results.is_empty() {
        return Err(CrawlError::EmptyResults(
            checkpoint_path.display().to_string(),
        ));
    }

    let mut out = BufWriter::new(File::create(csv_path)?);
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for result in &parsed.all_results {
        let domain = display_domain(&result.url).unwrap_or_else(|| INVALID_DOMAIN.to_string());
        let content_type = if result.content_type.is_empty() {
            CONTENT_TYPE_UNKNOWN
        } else {
            result.content_type.as_str()
        };
        writer.write_record([domain.as_str(), content_type, result.url.as_str(), ""])?;
    }
    writer.flush()?;

    tracing::info!(
        "Exported {} results from {} to {}",
        parsed.all_results.len(),
        checkpoint_path.display(),
        csv_path.display()
    );
    Ok(parsed.all_results.len())
}
