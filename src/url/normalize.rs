use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a (possibly relative) reference against a base URL
///
/// # Normalization Steps
///
/// 1. Drop everything from the first `#` onwards
/// 2. Reject the reference if nothing is left
/// 3. Resolve it against `base` using WHATWG rules
/// 4. Reject anything that is not HTTP(S) or has no host
///
/// No further canonicalization happens: `www.` prefixes, query order and
/// trailing slashes are kept as written.
///
/// # Arguments
///
/// * `href` - The raw attribute value or address to resolve
/// * `base` - The URL of the page the reference was found on
///
/// # Returns
///
/// * `Ok(Url)` - The fully-qualified URL without fragment
/// * `Err(UrlError)` - The reference cannot be crawled
///
/// # Examples
///
/// ```
/// use origin_walker::url::normalize_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// let url = normalize_url("guide.html#install", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/guide.html");
/// ```
pub fn normalize_url(href: &str, base: &Url) -> UrlResult<Url> {
    let clean = href.split('#').next().unwrap_or_default();
    if clean.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = base
        .join(clean)
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    validate(url)
}

/// Parses the address a crawl starts from
///
/// The start URL has no base to resolve against, so it must already be
/// absolute. The fragment is removed the same way as for discovered links,
/// which keeps the seed comparable with the visited set.
pub fn normalize_start_url(start_url: &str) -> UrlResult<Url> {
    let clean = start_url.trim().split('#').next().unwrap_or_default();
    if clean.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(clean).map_err(|e| UrlError::Parse(e.to_string()))?;
    validate(url)
}

fn validate(url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
