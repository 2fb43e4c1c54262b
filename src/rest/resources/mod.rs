//! Resource handles, one per Redmine resource family.
//!
//! Every handle borrows a [`RedmineClient`] and maps the family's
//! operations onto HTTP verbs and fixed URL templates. Field sets are not
//! modelled: parameters and results are [`WireValue`] trees.
//!
//! # Payloads
//!
//! Create and update operations merge the caller's parameters over a
//! per-operation list of known keys with
//! [`sanitize_params`](crate::rest::sanitize_params). The known keys fix the
//! element order of the XML body; blank values are dropped. Required keys
//! are checked before anything is sent.
//!
//! # Name caches
//!
//! Families with a `list_names` operation keep the id-to-name map on the
//! handle. It is loaded on first use and reloaded only when the caller asks
//! for it with `force_update`.
//!
//! # Example
//!
//! ```rust,ignore
//! use redmine_api::wire::WireValue;
//! use serde_json::json;
//!
//! let mut statuses = client.issue_status();
//! let closed = statuses.get_id_by_name("Closed").await?;
//!
//! let payload = WireValue::from(json!({
//!     "project_id": 1,
//!     "subject": "Crash on start",
//!     "custom_fields": [{"id": 2, "name": "Issuer", "value": "ops"}],
//! }));
//! let created = client.issue().create(payload.as_map().unwrap()).await?;
//! ```

mod attachment;
mod custom_field;
mod group;
mod issue;
mod issue_category;
mod issue_priority;
mod issue_relation;
mod issue_status;
mod membership;
mod news;
mod project;
mod query;
mod role;
mod search;
mod time_entry;
mod time_entry_activity;
mod tracker;
mod user;
mod version;
mod wiki;

#[cfg(test)]
mod testing;

pub use attachment::AttachmentApi;
pub use custom_field::CustomFieldApi;
pub use group::GroupApi;
pub use issue::{
    IssueApi, PRIORITY_HIGH, PRIORITY_IMMEDIATE, PRIORITY_LOW, PRIORITY_NORMAL, PRIORITY_URGENT,
};
pub use issue_category::IssueCategoryApi;
pub use issue_priority::IssuePriorityApi;
pub use issue_relation::{IssueRelationApi, RELATION_TYPES};
pub use issue_status::IssueStatusApi;
pub use membership::MembershipApi;
pub use news::NewsApi;
pub use project::ProjectApi;
pub use query::QueryApi;
pub use role::RoleApi;
pub use search::SearchApi;
pub use time_entry::TimeEntryApi;
pub use time_entry_activity::TimeEntryActivityApi;
pub use tracker::TrackerApi;
pub use user::UserApi;
pub use version::{VersionApi, VERSION_SHARINGS, VERSION_STATUSES};
pub use wiki::WikiApi;

use indexmap::IndexMap;

use crate::clients::HttpTransport;
use crate::rest::errors::{ApiError, InvalidParameterError, MissingParameterError};
use crate::rest::pagination::{sanitize_params, UNBOUNDED_LIMIT};
use crate::rest::RedmineClient;
use crate::wire::xml::XmlEncoder;
use crate::wire::{json, WireMap, WireValue};

/// Id-to-name map of a resource family.
pub type NameMap = IndexMap<i64, String>;

/// Builds the known-key map of an operation, every key set to `Null`.
pub(crate) fn known_keys(keys: &[&str]) -> WireMap {
    keys.iter()
        .map(|key| ((*key).to_string(), WireValue::Null))
        .collect()
}

/// Merges `params` over the known `keys` of an operation.
pub(crate) fn payload(keys: &[&str], params: &WireMap) -> WireMap {
    sanitize_params(&known_keys(keys), params)
}

/// Fails with the names in `required` that `payload` lacks.
pub(crate) fn require(
    resource: &'static str,
    payload: &WireMap,
    required: &[&'static str],
) -> Result<(), MissingParameterError> {
    let missing: Vec<&'static str> = required
        .iter()
        .copied()
        .filter(|key| payload.get(*key).map_or(true, WireValue::is_empty))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingParameterError::new(resource, missing))
    }
}

/// Fails unless the string at `key`, when present, is one of `allowed`.
pub(crate) fn check_one_of(
    payload: &WireMap,
    key: &str,
    allowed: &[&str],
) -> Result<(), InvalidParameterError> {
    let Some(value) = payload.get(key) else {
        return Ok(());
    };
    let text = value.scalar_text().unwrap_or_else(|| value.to_string());
    if allowed.contains(&text.as_str()) {
        Ok(())
    } else {
        Err(InvalidParameterError::one_of(key, &text, allowed))
    }
}

/// Replaces a list-valued `include` with its comma-joined form.
pub(crate) fn join_include(params: &mut WireMap) {
    if let Some(WireValue::List(items)) = params.get("include") {
        let joined = items
            .iter()
            .filter_map(WireValue::scalar_text)
            .collect::<Vec<_>>()
            .join(",");
        params.insert("include".to_string(), WireValue::String(joined));
    }
}

/// Encodes `payload` as an XML document under `root`.
pub(crate) fn xml_body(encoder: &XmlEncoder<'_>, payload: WireMap) -> Vec<u8> {
    encoder.encode(&WireValue::Map(payload)).into_bytes()
}

/// Encodes `payload` as a JSON object under the single key `root`.
pub(crate) fn json_body(root: &str, payload: WireMap) -> Vec<u8> {
    let mut document = WireMap::new();
    document.insert(root.to_string(), WireValue::Map(payload));
    json::encode(&WireValue::Map(document)).into_bytes()
}

/// Params requesting every element of a collection.
pub(crate) fn unbounded() -> WireMap {
    let mut params = WireMap::new();
    params.insert("limit".to_string(), WireValue::Int(UNBOUNDED_LIMIT));
    params
}

/// Fetches a whole collection and maps each element's `id` to `label`.
///
/// Elements without an integer id or a textual label are skipped.
pub(crate) async fn load_names<T: HttpTransport>(
    client: &RedmineClient<T>,
    endpoint: &str,
    list_key: &str,
    label: &str,
) -> Result<NameMap, ApiError> {
    let collection = client.fetch_all(endpoint, &unbounded()).await?;

    let names: NameMap = collection
        .get(list_key)
        .and_then(WireValue::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let id = item.get("id").and_then(WireValue::as_i64)?;
                    let name = item.get(label).and_then(WireValue::scalar_text)?;
                    Some((id, name))
                })
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!("Loaded {} {} names from {}", names.len(), list_key, endpoint);
    Ok(names)
}

/// Returns the cached names, loading them when absent or when forced.
pub(crate) async fn cached_names<'c, T: HttpTransport>(
    cache: &'c mut Option<NameMap>,
    force_update: bool,
    client: &RedmineClient<T>,
    endpoint: &str,
    list_key: &str,
    label: &str,
) -> Result<&'c NameMap, ApiError> {
    if force_update || cache.is_none() {
        *cache = Some(load_names(client, endpoint, list_key, label).await?);
    }
    Ok(cache.get_or_insert_with(NameMap::new))
}

/// Returns the cached names of one project, loading them when absent or
/// when forced.
pub(crate) async fn cached_project_names<'c, T: HttpTransport>(
    cache: &'c mut IndexMap<String, NameMap>,
    project: String,
    force_update: bool,
    client: &RedmineClient<T>,
    endpoint: &str,
    list_key: &str,
) -> Result<&'c NameMap, ApiError> {
    if force_update || !cache.contains_key(&project) {
        let names = load_names(client, endpoint, list_key, "name").await?;
        cache.insert(project.clone(), names);
    }
    Ok(cache.entry(project).or_default())
}

/// Looks up the id whose name equals `name`.
pub(crate) fn find_id(names: &NameMap, name: &str) -> Option<i64> {
    names
        .iter()
        .find(|(_, candidate)| candidate.as_str() == name)
        .map(|(id, _)| *id)
}
