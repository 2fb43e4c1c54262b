//! Request path and query-string building.
//!
//! Resource endpoints are literal templates (`/issues.json`,
//! `/projects/redmine/memberships.json`) into which identifiers have already
//! been interpolated. [`build_path`] appends the query parameters using the
//! bracket conventions Redmine's Rails backend understands.
//!
//! # Example
//!
//! ```rust
//! use redmine_api::rest::build_path;
//! use redmine_api::wire::WireValue;
//! use serde_json::json;
//!
//! let params = WireValue::from(json!({
//!     "project_id": 3,
//!     "include": ["journals", "watchers"],
//!     "f": {"status_id": "o"},
//! }));
//!
//! let path = build_path("/issues.json", params.as_map().unwrap());
//! assert_eq!(
//!     path,
//!     "/issues.json?project_id=3&include[]=journals&include[]=watchers&f[status_id]=o"
//! );
//! ```

use std::borrow::Cow;

use crate::rest::{InvalidParameterError, ResourceId};
use crate::wire::{WireMap, WireValue};

/// Appends `params` to `template` as a query string.
///
/// - Pairs follow map order.
/// - Lists become repeated `key[]=v` pairs. A key already written in
///   indexed form (`key[0]`, `v[tracker_id][3]`, `key[]`) is normalized to
///   end in `[]`.
/// - Bracketed caller keys (`f[status_id]`) keep their brackets literal;
///   only the text between them is encoded.
/// - Nested maps become `key[sub]=v` for every scalar leaf.
/// - `Null` values are skipped; booleans are written as `1`/`0`.
/// - Keys and values are percent-encoded exactly once; brackets are literal.
///
/// The template is returned unchanged when no pair is produced. If it
/// already carries a query string, the pairs are appended with `&`.
#[must_use]
pub fn build_path(template: &str, params: &WireMap) -> String {
    let mut pairs: Vec<String> = Vec::new();

    for (key, value) in params {
        let (base, indexed) = encode_key(key);
        match value {
            WireValue::List(_) => push_pairs(&mut pairs, &base, value),
            _ if indexed => push_pairs(&mut pairs, &format!("{base}[]"), value),
            _ => push_pairs(&mut pairs, &base, value),
        }
    }

    if pairs.is_empty() {
        return template.to_string();
    }

    let separator = if template.contains('?') { '&' } else { '?' };
    format!("{template}{separator}{}", pairs.join("&"))
}

/// Formats a path segment for a resource identifier.
///
/// Numeric ids are written as-is; string identifiers are percent-encoded.
///
/// # Errors
///
/// Returns [`InvalidParameterError`] for an empty string identifier.
pub fn path_segment(id: &ResourceId) -> Result<Cow<'_, str>, InvalidParameterError> {
    match id {
        ResourceId::Id(id) => Ok(Cow::Owned(id.to_string())),
        ResourceId::Identifier(identifier) if identifier.trim().is_empty() => Err(
            InvalidParameterError::new("id", identifier.as_str(), "a non-empty identifier"),
        ),
        ResourceId::Identifier(identifier) => Ok(urlencoding::encode(identifier)),
    }
}

fn push_pairs(pairs: &mut Vec<String>, key: &str, value: &WireValue) {
    match value {
        WireValue::Null => {}
        WireValue::Bool(flag) => pairs.push(format!("{key}={}", u8::from(*flag))),
        WireValue::List(items) => {
            let key = format!("{key}[]");
            for item in items {
                push_pairs(pairs, &key, item);
            }
        }
        WireValue::Map(map) => {
            for (sub, item) in map {
                let key = format!("{key}[{}]", urlencoding::encode(sub));
                push_pairs(pairs, &key, item);
            }
        }
        scalar => {
            if let Some(text) = scalar.scalar_text() {
                pairs.push(format!("{key}={}", urlencoding::encode(&text)));
            }
        }
    }
}

/// Encodes a caller key segment by segment.
///
/// Returns the encoded key without a trailing index and whether one was
/// present: `v[tracker_id][0]` gives (`v[tracker_id]`, true). Keys that are
/// not of the form `stem[a][b]…` are encoded whole.
fn encode_key(key: &str) -> (String, bool) {
    let whole = || (urlencoding::encode(key).into_owned(), false);

    let Some(open) = key.find('[') else {
        return whole();
    };
    if open == 0 {
        return whole();
    }

    let mut segments = Vec::new();
    let mut rest = &key[open..];
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return whole();
        };
        let Some(close) = inner.find(']') else {
            return whole();
        };
        let segment = &inner[..close];
        if segment.contains('[') {
            return whole();
        }
        segments.push(segment);
        rest = &inner[close + 1..];
    }

    let indexed = segments
        .last()
        .is_some_and(|segment| segment.bytes().all(|b| b.is_ascii_digit()));
    if indexed {
        segments.pop();
    }

    let mut base = urlencoding::encode(&key[..open]).into_owned();
    for segment in segments {
        base.push('[');
        base.push_str(&urlencoding::encode(segment));
        base.push(']');
    }
    (base, indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> WireMap {
        match WireValue::from(value) {
            WireValue::Map(map) => map,
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_params_return_template_unchanged() {
        assert_eq!(build_path("/issues.json", &WireMap::new()), "/issues.json");
    }

    #[test]
    fn test_only_null_params_add_no_question_mark() {
        let path = build_path("/issues.json", &params(json!({"assigned_to_id": null})));
        assert_eq!(path, "/issues.json");
    }

    #[test]
    fn test_list_values_use_brackets_not_indices() {
        let path = build_path("/issues.json", &params(json!({"include": ["a", "b"]})));
        assert_eq!(path, "/issues.json?include[]=a&include[]=b");
        assert!(!path.contains("%5B"));
        assert!(!path.contains("[0]"));
    }

    #[test]
    fn test_single_element_list_still_uses_brackets() {
        let path = build_path("/issues.json", &params(json!({"issue_id": [7]})));
        assert_eq!(path, "/issues.json?issue_id[]=7");
    }

    #[test]
    fn test_indexed_caller_keys_are_normalized() {
        let path = build_path(
            "/issues.json",
            &params(json!({"tracker_id[0]": 1, "tracker_id[12]": 2, "cf[]": "x"})),
        );
        assert_eq!(path, "/issues.json?tracker_id[]=1&tracker_id[]=2&cf[]=x");
    }

    #[test]
    fn test_nested_maps_repeat_key_per_leaf() {
        let path = build_path(
            "/issues.json",
            &params(json!({"f": {"status_id": "o", "tracker_id": [1, 2]}})),
        );
        assert_eq!(
            path,
            "/issues.json?f[status_id]=o&f[tracker_id][]=1&f[tracker_id][]=2"
        );
    }

    #[test]
    fn test_values_are_encoded_exactly_once() {
        let path = build_path(
            "/search.json",
            &params(json!({"q": "crash & burn", "subject": "~50%"})),
        );
        assert_eq!(path, "/search.json?q=crash%20%26%20burn&subject=~50%25");
    }

    #[test]
    fn test_booleans_render_as_digits() {
        let path = build_path(
            "/search.json",
            &params(json!({"titles_only": true, "open_issues": false})),
        );
        assert_eq!(path, "/search.json?titles_only=1&open_issues=0");
    }

    #[test]
    fn test_existing_query_string_is_extended() {
        let path = build_path(
            "/uploads.json?filename=a.txt",
            &params(json!({"limit": 5})),
        );
        assert_eq!(path, "/uploads.json?filename=a.txt&limit=5");
    }

    #[test]
    fn test_pairs_follow_map_order() {
        let path = build_path(
            "/issues.json",
            &params(json!({"sort": "id:desc", "limit": 25, "offset": 50})),
        );
        assert_eq!(path, "/issues.json?sort=id%3Adesc&limit=25&offset=50");
    }

    #[test]
    fn test_bracketed_caller_keys_keep_literal_brackets() {
        let path = build_path(
            "/issues.json",
            &params(json!({"f[status_id]": "o", "v[tracker_id][0]": 1})),
        );
        assert_eq!(path, "/issues.json?f[status_id]=o&v[tracker_id][]=1");
        assert!(!path.contains("%5B"));
        assert!(!path.contains("%5D"));
    }

    #[test]
    fn test_bracketed_key_with_list_value() {
        let path = build_path(
            "/issues.json",
            &params(json!({"v[status_id]": ["1", "2"], "op[cf 1]": "="})),
        );
        assert_eq!(
            path,
            "/issues.json?v[status_id][]=1&v[status_id][]=2&op[cf%201]=%3D"
        );
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("include[3]"), ("include".to_string(), true));
        assert_eq!(encode_key("include[]"), ("include".to_string(), true));
        assert_eq!(encode_key("f[status_id]"), ("f[status_id]".to_string(), false));
        assert_eq!(encode_key("v[tracker_id][0]"), ("v[tracker_id]".to_string(), true));
        assert_eq!(encode_key("plain"), ("plain".to_string(), false));
        assert_eq!(encode_key("sp ace"), ("sp%20ace".to_string(), false));
    }

    #[test]
    fn test_malformed_bracket_keys_are_encoded_whole() {
        assert_eq!(encode_key("[]"), ("%5B%5D".to_string(), false));
        assert_eq!(encode_key("f[open"), ("f%5Bopen".to_string(), false));
        assert_eq!(encode_key("f[a]b"), ("f%5Ba%5Db".to_string(), false));
        assert_eq!(encode_key("f[a[b]]"), ("f%5Ba%5Bb%5D%5D".to_string(), false));
    }

    #[test]
    fn test_path_segment_encodes_identifiers() {
        assert_eq!(path_segment(&ResourceId::Id(12)).unwrap(), "12");
        assert_eq!(
            path_segment(&ResourceId::Identifier("my project".to_string())).unwrap(),
            "my%20project"
        );
    }

    #[test]
    fn test_path_segment_rejects_empty_identifier() {
        let error = path_segment(&ResourceId::Identifier(String::new())).unwrap_err();
        assert_eq!(error.parameter, "id");
    }
}
