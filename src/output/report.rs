//! Terminal report of grouped results

use crate::output::ContentTypeGroup;
use std::fmt::Write;

const RULE_WIDTH: usize = 65;

/// Prints grouped results to stdout
///
/// # Arguments
///
/// * `total` - Number of results before grouping
/// * `groups` - Output of [`crate::output::group_by_content_type`]
pub fn print_results(total: usize, groups: &[ContentTypeGroup]) {
    print!("{}", format_results(total, groups));
}

/// Formats grouped results as numbered lists under a heading per type
pub fn format_results(total: usize, groups: &[ContentTypeGroup]) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{}", heavy);
    let _ = writeln!(out, "{:^width$}", "CRAWL RESULTS", width = RULE_WIDTH);
    let _ = writeln!(out, "{}\n", heavy);
    let _ = writeln!(out, "Total URLs found: {}\n", total);
    let _ = writeln!(out, "Results grouped by content-type:");

    for group in groups {
        let plural = if group.urls.len() == 1 { "" } else { "s" };
        let _ = writeln!(
            out,
            "\n{} ({} URL{})",
            group.content_type,
            group.urls.len(),
            plural
        );
        let _ = writeln!(out, "{}", light);
        for (i, url) in group.urls.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, url);
        }
    }

    let _ = writeln!(out, "\n{}", heavy);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_results() {
        let groups = vec![
            ContentTypeGroup {
                content_type: "text/html".to_string(),
                urls: vec![
                    "https://example.com/".to_string(),
                    "https://example.com/b".to_string(),
                ],
            },
            ContentTypeGroup {
                content_type: "image/png".to_string(),
                urls: vec!["https://example.com/logo.png".to_string()],
            },
        ];

        let text = format_results(3, &groups);

        assert!(text.contains("Total URLs found: 3"));
        assert!(text.contains("text/html (2 URLs)"));
        assert!(text.contains("image/png (1 URL)\n"));
        assert!(text.contains("  2. https://example.com/b"));
        assert!(text.contains("  1. https://example.com/logo.png"));
        assert!(text.find("text/html").unwrap() < text.find("image/png").unwrap());
    }

    #[test]
    fn test_format_no_results() {
        let text = format_results(0, &[]);
        assert!(text.contains("Total URLs found: 0"));
        assert!(!text.contains("URL)"));
    }
}
