//! HTML link extraction
//!
//! Collects the raw attribute values that point at other resources:
//! - `<a href>` and `<link href>`
//! - `<img src>` and `<script src>`

use scraper::{Html, Selector};

/// CSS selector matching every element whose link attribute we follow
const LINK_SELECTOR: &str = "a[href], link[href], img[src], script[src]";

/// Extracts link attribute values from an HTML document, in document order
///
/// Values are returned as written (trimmed, but not resolved or filtered);
/// resolution against the page URL and origin filtering happen in
/// [`crate::crawler::discover`]. Malformed markup never fails: whatever the
/// HTML parser recovers is used.
///
/// # Example
///
/// ```
/// use origin_walker::crawler::extract_links;
///
/// let html = r#"<a href="/about">About</a><img src="logo.png">"#;
/// assert_eq!(extract_links(html), vec!["/about", "logo.png"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(LINK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let attr = match element.value().name() {
                "a" | "link" => "href",
                _ => "src",
            };
            element.value().attr(attr)
        })
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}
