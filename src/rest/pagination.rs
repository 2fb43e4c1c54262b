//! Fetching every element of a paginated collection.
//!
//! Redmine caps list responses at 100 elements per request. [`fetch_all`]
//! splits a caller's `limit` into page-sized requests, follows `offset` and
//! merges the decoded pages with [`wire::merge`](crate::wire::merge):
//! list entries are concatenated and scalars such as `total_count` keep the
//! last page's value.
//!
//! # Stop conditions
//!
//! Paging stops once the requested limit is exhausted, or earlier when a
//! page:
//!
//! - is empty,
//! - carries no `limit` key (the endpoint is not paginated), or
//! - reports an `offset` at or past its `total_count`.

use std::future::Future;

use crate::rest::errors::ApiError;
use crate::rest::path::build_path;
use crate::wire::{json, merge, SerializerError, WireMap, WireValue};

/// Page size used when the caller does not set `limit`.
pub const DEFAULT_LIMIT: i64 = 25;

/// Largest page the server will return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Limit requesting every element of a collection.
pub const UNBOUNDED_LIMIT: i64 = i64::MAX;

const PAGE_SHAPE: &str = "a JSON or XML object";

/// Merges caller `params` over `defaults`, dropping empty values.
///
/// Caller values that are `Null`, `false`, an empty string or an empty
/// list/map are ignored, so they never erase a default. Keys keep the
/// position they have in `defaults`; new keys follow in caller order.
/// Remaining empty values are removed from the result.
///
/// Resource payloads use the same rule, so the default key order becomes
/// the element order of XML request bodies.
///
/// # Example
///
/// ```rust
/// use redmine_api::rest::sanitize_params;
/// use redmine_api::wire::WireValue;
/// use serde_json::json;
///
/// let defaults = WireValue::from(json!({"name": null, "limit": 25}));
/// let params = WireValue::from(json!({"status": "", "limit": 50, "name": "Bug"}));
///
/// let merged = sanitize_params(defaults.as_map().unwrap(), params.as_map().unwrap());
/// assert_eq!(WireValue::Map(merged), WireValue::from(json!({"name": "Bug", "limit": 50})));
/// ```
#[must_use]
pub fn sanitize_params(defaults: &WireMap, params: &WireMap) -> WireMap {
    let mut merged = defaults.clone();
    for (key, value) in params {
        if !is_blank(value) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged.retain(|_, value| !is_blank(value));
    merged
}

fn is_blank(value: &WireValue) -> bool {
    matches!(value, WireValue::Bool(false)) || value.is_empty()
}

fn default_page_params() -> WireMap {
    let mut defaults = WireMap::new();
    defaults.insert("limit".to_string(), WireValue::Int(DEFAULT_LIMIT));
    defaults.insert("offset".to_string(), WireValue::Int(0));
    defaults
}

fn read_count(params: &WireMap, key: &str, default: i64) -> i64 {
    match params.get(key) {
        None => default,
        Some(value) => value.as_i64().unwrap_or_else(|| {
            tracing::warn!(
                "Ignoring non-integer {} parameter {}, using {}",
                key,
                value,
                default
            );
            default
        }),
    }
}

/// Accepts a decoded page only if it is a map, or `Null` for an empty body.
fn expect_document(page: WireValue) -> Result<WireValue, SerializerError> {
    match page {
        WireValue::Map(_) | WireValue::Null => Ok(page),
        WireValue::String(body) => Err(SerializerError::Shape {
            expected: PAGE_SHAPE,
            body,
        }),
        other => Err(SerializerError::Shape {
            expected: PAGE_SHAPE,
            body: json::encode(&other),
        }),
    }
}

fn stop_reason(page: &WireValue) -> Option<&'static str> {
    if page.is_empty() {
        return Some("empty page");
    }
    if page.get("limit").is_none() {
        return Some("response is not paginated");
    }
    let offset = page.get("offset").and_then(WireValue::as_i64);
    let total = page.get("total_count").and_then(WireValue::as_i64);
    match (offset, total) {
        (Some(offset), Some(total)) if offset >= total => Some("offset reached total_count"),
        _ => None,
    }
}

/// Fetches `endpoint` page by page and merges the results.
///
/// `get` performs one GET for the given path and returns the decoded body;
/// [`RedmineClient::fetch_all`](crate::RedmineClient::fetch_all) binds it to
/// the transport.
///
/// - Empty `params`: exactly one request to `endpoint`, whose decoded body
///   is returned unchanged.
/// - Otherwise `limit` (default 25) is split into requests of at most 100
///   elements starting at `offset` (default 0). A `limit` of zero or less
///   sends nothing and yields an empty map.
///
/// # Errors
///
/// The first error returned by `get` is propagated; pages fetched so far
/// are discarded. A page that decodes to anything but a map (an HTML login
/// page, say) is a [`SerializerError::Shape`].
///
/// # Example
///
/// ```rust
/// use redmine_api::rest::fetch_all;
/// use redmine_api::wire::{WireMap, WireValue};
/// use serde_json::json;
///
/// # tokio_test_block_on(async {
/// let mut params = WireMap::new();
/// params.insert("limit".to_string(), WireValue::Int(150));
///
/// let mut paths = Vec::new();
/// let all = fetch_all("/issues.json", &params, |path| {
///     paths.push(path);
///     async {
///         Ok(WireValue::from(json!({
///             "issues": [{"id": 1}], "total_count": 500, "offset": 0, "limit": 100
///         })))
///     }
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(paths, vec![
///     "/issues.json?limit=100&offset=0",
///     "/issues.json?limit=50&offset=100",
/// ]);
/// assert_eq!(all.get("issues").and_then(WireValue::as_list).map(Vec::len), Some(2));
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub async fn fetch_all<F, Fut>(
    endpoint: &str,
    params: &WireMap,
    mut get: F,
) -> Result<WireValue, ApiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<WireValue, ApiError>>,
{
    if params.is_empty() {
        tracing::debug!("Fetching {} without pagination", endpoint);
        let page = get(endpoint.to_string()).await?;
        return expect_document(page).map_err(ApiError::from);
    }

    let mut params = sanitize_params(&default_page_params(), params);
    let mut remaining = read_count(&params, "limit", DEFAULT_LIMIT);
    let mut offset = read_count(&params, "offset", 0);
    let mut aggregate = WireValue::map();

    while remaining > 0 {
        let size = remaining.min(MAX_PAGE_SIZE);
        params.insert("limit".to_string(), WireValue::Int(size));
        params.insert("offset".to_string(), WireValue::Int(offset));

        tracing::debug!("Fetching {} at offset {} (page size {})", endpoint, offset, size);
        let page = expect_document(get(build_path(endpoint, &params)).await?)?;

        let stop = stop_reason(&page);
        aggregate = merge(aggregate, page);
        offset = offset.saturating_add(size);
        remaining -= size;

        if let Some(reason) = stop {
            tracing::debug!("Stopped paging {}: {}", endpoint, reason);
            break;
        }
    }

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> WireMap {
        match WireValue::from(value) {
            WireValue::Map(map) => map,
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_sanitize_drops_blank_caller_values() {
        let merged = sanitize_params(
            &map(json!({"limit": 25, "offset": 0})),
            &map(json!({
                "limit": null,
                "status_id": "",
                "tracker_id": [],
                "f": {},
                "is_private": false,
                "project_id": 3
            })),
        );

        assert_eq!(merged, map(json!({"limit": 25, "offset": 0, "project_id": 3})));
    }

    #[test]
    fn test_sanitize_keeps_default_key_positions() {
        let merged = sanitize_params(
            &map(json!({"subject": null, "project_id": null, "description": null})),
            &map(json!({"description": "D", "extra": 1, "subject": "S"})),
        );

        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["subject", "description", "extra"]);
    }

    #[test]
    fn test_read_count_accepts_numeric_strings() {
        let params = map(json!({"limit": "50", "offset": "abc"}));
        assert_eq!(read_count(&params, "limit", DEFAULT_LIMIT), 50);
        assert_eq!(read_count(&params, "offset", 0), 0);
        assert_eq!(read_count(&params, "missing", 7), 7);
    }

    #[test]
    fn test_only_maps_are_pages() {
        assert!(expect_document(WireValue::Null).is_ok());
        assert!(expect_document(WireValue::map()).is_ok());

        let error = expect_document(WireValue::String("<html>login</html>".into())).unwrap_err();
        assert_eq!(error.body(), "<html>login</html>");

        let error = expect_document(WireValue::from(json!([1, 2]))).unwrap_err();
        assert!(matches!(error, SerializerError::Shape { .. }));
        assert_eq!(error.body(), "[1,2]");
    }

    #[test]
    fn test_stop_reasons() {
        assert!(stop_reason(&WireValue::Null).is_some());
        assert!(stop_reason(&WireValue::map()).is_some());
        assert!(stop_reason(&WireValue::from(json!({"issues": []}))).is_some());
        assert!(stop_reason(&WireValue::from(
            json!({"issues": [], "limit": 25, "offset": 50, "total_count": 50})
        ))
        .is_some());
        assert!(stop_reason(&WireValue::from(
            json!({"issues": [], "limit": "25", "offset": "0", "total_count": "50"})
        ))
        .is_none());
    }
}
