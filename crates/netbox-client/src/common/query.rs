//! Query utilities for NetBox API
//!
//! Provides helpers for building query strings and following pagination links.

use reqwest::Url;

/// Default page size requested when fetching every page
pub const PAGE_SIZE: u64 = 100;

/// Build a percent-encoded query string from filters
pub fn build_query_string(filters: &[(String, String)]) -> String {
    filters
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Extract the `offset` parameter from a NetBox `next` link.
///
/// NetBox returns absolute URLs such as
/// `http://netbox/api/ipam/asns/?limit=100&offset=200`; relative links are
/// resolved against a placeholder host.
pub fn offset_from_next(next: &str) -> Option<u64> {
    let url = Url::parse(next)
        .or_else(|_| Url::parse("http://netbox.invalid/")?.join(next))
        .ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "offset")
        .and_then(|(_, value)| value.parse().ok())
}
