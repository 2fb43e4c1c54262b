//! Time entries.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{ApiError, MissingParameterError, RedmineClient};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{payload, require, xml_body};

const FIELDS: &[&str] = &[
    "issue_id",
    "project_id",
    "spent_on",
    "hours",
    "activity_id",
    "comments",
];

/// Handle for `/time_entries`.
#[derive(Debug)]
pub struct TimeEntryApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for TimeEntryApi<'a, T> {
    const KIND: ApiKind = ApiKind::TimeEntry;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> TimeEntryApi<'_, T> {
    /// Lists time entries.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all("/time_entries.json", params).await
    }

    /// Shows a time entry.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64) -> Result<WireValue, ApiError> {
        self.client
            .get_value(&format!("/time_entries/{id}.json"))
            .await
    }

    /// Logs time on an issue or a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `hours` or without
    /// both `issue_id` and `project_id`, or [`ApiError`] if the request
    /// fails.
    pub async fn create(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        let entry = payload(FIELDS, params);
        if !entry.contains_key("issue_id") && !entry.contains_key("project_id") {
            let missing = MissingParameterError::new("time_entry", vec!["issue_id", "project_id"]);
            return Err(missing.into());
        }
        require("time_entry", &entry, &["hours"])?;

        let body = xml_body(&XmlEncoder::new("time_entry"), entry);
        self.client.post("/time_entries.xml", body, DataType::Xml).await
    }

    /// Updates a time entry.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let body = xml_body(&XmlEncoder::new("time_entry"), payload(FIELDS, params));
        self.client
            .put(
                &format!("/time_entries/{id}.xml"),
                body,
                DataType::Xml,
                None,
            )
            .await?;
        Ok(())
    }

    /// Deletes a time entry.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/time_entries/{id}.xml"))
            .await?;
        Ok(())
    }
}
