//! Relations between issues.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{sanitize_params, ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

use super::{check_one_of, json_body, require};

/// Accepted values of `relation_type`.
pub const RELATION_TYPES: &[&str] = &[
    "relates",
    "duplicates",
    "duplicated",
    "blocks",
    "blocked",
    "precedes",
    "follows",
    "copied_to",
    "copied_from",
];

/// Handle for `/relations` and `/issues/{id}/relations`.
#[derive(Debug)]
pub struct IssueRelationApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for IssueRelationApi<'a, T> {
    const KIND: ApiKind = ApiKind::IssueRelation;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> IssueRelationApi<'_, T> {
    /// Lists the relations of an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list_by_issue_id(
        &self,
        issue_id: i64,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        self.client
            .fetch_all(&format!("/issues/{issue_id}/relations.json"), params)
            .await
    }

    /// Shows a relation.
    ///
    /// Returns the inner `relation` object, or an empty map when the
    /// response has none.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64) -> Result<WireValue, ApiError> {
        let body = self
            .client
            .get_value(&format!("/relations/{id}.json"))
            .await?;
        Ok(match body {
            WireValue::Map(mut map) => map.shift_remove("relation").unwrap_or_else(WireValue::map),
            _ => WireValue::map(),
        })
    }

    /// Relates `issue_id` to `issue_to_id`.
    ///
    /// `relation_type` defaults to `relates`; `delay` applies to `precedes`
    /// and `follows`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `issue_to_id`,
    /// [`ApiError::InvalidParameter`] for an unknown `relation_type`, or
    /// [`ApiError`] if the request fails.
    pub async fn create(&self, issue_id: i64, params: &WireMap) -> Result<WireValue, ApiError> {
        let mut defaults = WireMap::new();
        defaults.insert("relation_type".to_string(), WireValue::from("relates"));
        defaults.insert("issue_to_id".to_string(), WireValue::Null);
        defaults.insert("delay".to_string(), WireValue::Null);

        let relation = sanitize_params(&defaults, params);
        require("issue_relation", &relation, &["issue_to_id"])?;
        check_one_of(&relation, "relation_type", RELATION_TYPES)?;

        self.client
            .post(
                &format!("/issues/{issue_id}/relations.json"),
                json_body("relation", relation),
                DataType::Json,
            )
            .await
    }

    /// Deletes a relation.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/relations/{id}.xml")).await?;
        Ok(())
    }
}
