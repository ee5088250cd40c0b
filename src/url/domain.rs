use url::Url;

/// Checks whether two URLs are on the same host
///
/// Hostnames are compared exactly (the `url` crate already lowercases them).
/// `www.example.com` and `example.com` are different origins; ports and
/// schemes are ignored.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use origin_walker::url::same_origin;
///
/// let a = Url::parse("https://example.com/").unwrap();
/// let b = Url::parse("http://EXAMPLE.com:8080/page").unwrap();
/// let c = Url::parse("https://www.example.com/").unwrap();
/// assert!(same_origin(&a, &b));
/// assert!(!same_origin(&a, &c));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns the host of a URL with a leading `www.` removed, for reports
///
/// Returns `None` for unparseable input or URLs without a host.
pub fn display_domain(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}
