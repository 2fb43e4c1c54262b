//! Recursive merge of decoded pages.

use crate::wire::{WireMap, WireValue};

/// Merges `next` into `acc`, returning the combined value.
///
/// - Map + Map merges key by key, recursively.
/// - List + List concatenates.
/// - Any other pairing takes the later value, so scalars such as `limit`
///   or `offset` end up holding the last page's values.
/// - A `Null` page contributes nothing.
///
/// # Example
///
/// ```rust
/// use redmine_api::wire::{merge, WireValue};
/// use serde_json::json;
///
/// let first = WireValue::from(json!({"issues": [1, 2], "offset": 0}));
/// let second = WireValue::from(json!({"issues": [3], "offset": 2}));
///
/// let merged = merge(first, second);
/// assert_eq!(merged, WireValue::from(json!({"issues": [1, 2, 3], "offset": 2})));
/// ```
#[must_use]
pub fn merge(acc: WireValue, next: WireValue) -> WireValue {
    match (acc, next) {
        (acc, WireValue::Null) => acc,
        (WireValue::Map(acc), WireValue::Map(next)) => WireValue::Map(merge_maps(acc, next)),
        (WireValue::List(mut acc), WireValue::List(next)) => {
            acc.extend(next);
            WireValue::List(acc)
        }
        (_, next) => next,
    }
}

fn merge_maps(mut acc: WireMap, next: WireMap) -> WireMap {
    for (key, value) in next {
        if let Some(slot) = acc.get_mut(&key) {
            let existing = std::mem::take(slot);
            *slot = merge_entry(existing, value);
        } else {
            acc.insert(key, value);
        }
    }
    acc
}

fn merge_entry(existing: WireValue, value: WireValue) -> WireValue {
    match (existing, value) {
        (WireValue::Map(a), WireValue::Map(b)) => WireValue::Map(merge_maps(a, b)),
        (WireValue::List(mut a), WireValue::List(b)) => {
            a.extend(b);
            WireValue::List(a)
        }
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: serde_json::Value) -> WireValue {
        WireValue::from(value)
    }

    #[test]
    fn test_lists_concatenate_and_scalars_take_last_value() {
        let merged = merge(
            wire(json!({"issues": [{"id": 1}], "limit": 100, "offset": 0, "total_count": 3})),
            wire(json!({"issues": [{"id": 2}, {"id": 3}], "limit": 100, "offset": 100, "total_count": 3})),
        );

        assert_eq!(
            merged,
            wire(json!({
                "issues": [{"id": 1}, {"id": 2}, {"id": 3}],
                "limit": 100,
                "offset": 100,
                "total_count": 3
            }))
        );
    }

    #[test]
    fn test_nested_maps_merge_recursively() {
        let merged = merge(
            wire(json!({"meta": {"tags": ["a"], "page": 1}})),
            wire(json!({"meta": {"tags": ["b"], "extra": true}})),
        );

        assert_eq!(
            merged,
            wire(json!({"meta": {"tags": ["a", "b"], "page": 1, "extra": true}}))
        );
    }

    #[test]
    fn test_merge_keeps_first_key_position() {
        let merged = merge(
            wire(json!({"issues": [1], "total_count": 2, "offset": 0})),
            wire(json!({"offset": 1, "issues": [2]})),
        );

        let keys: Vec<&str> = merged
            .as_map()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["issues", "total_count", "offset"]);
    }

    #[test]
    fn test_null_page_contributes_nothing() {
        let acc = wire(json!({"issues": [1]}));
        assert_eq!(merge(acc.clone(), WireValue::Null), acc);
    }

    #[test]
    fn test_empty_accumulator_takes_page() {
        let page = wire(json!({"issues": [1], "limit": 25}));
        assert_eq!(merge(WireValue::map(), page.clone()), page);
        assert_eq!(merge(WireValue::Null, page.clone()), page);
    }

    #[test]
    fn test_mismatched_shapes_take_later_value() {
        let merged = merge(
            wire(json!({"value": [1, 2]})),
            wire(json!({"value": "scalar"})),
        );
        assert_eq!(merged, wire(json!({"value": "scalar"})));
    }

    #[test]
    fn test_top_level_lists_concatenate() {
        let merged = merge(wire(json!([1, 2])), wire(json!([3])));
        assert_eq!(merged, wire(json!([1, 2, 3])));
    }
}
