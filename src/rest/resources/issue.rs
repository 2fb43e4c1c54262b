//! Issues.
//!
//! Create and update payloads may name related records instead of giving
//! their ids. Before encoding, these keys are replaced by their `*_id`
//! counterpart:
//!
//! | Key | Becomes | Looked up in |
//! |---|---|---|
//! | `project` | `project_id` | project names |
//! | `category` | `category_id` | category names of `project_id` |
//! | `status` | `status_id` | issue status names |
//! | `tracker` | `tracker_id` | tracker names |
//! | `assigned_to` | `assigned_to_id` | user logins |
//! | `author` | `author_id` | user logins |
//!
//! Lookups go through the name caches of the handle, so repeated calls on
//! the same `IssueApi` reuse them.
//!
//! # Example
//!
//! ```rust,ignore
//! use redmine_api::wire::WireValue;
//! use serde_json::json;
//!
//! let mut issues = client.issue();
//! let payload = WireValue::from(json!({
//!     "project": "Website",
//!     "tracker": "Bug",
//!     "subject": "Broken link on the home page",
//!     "assigned_to": "jsmith",
//! }));
//! issues.create(payload.as_map().unwrap()).await?;
//! issues.add_note_to_issue(42, "Fixed in r1234", false).await?;
//! ```

use std::slice;

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{
    build_path, ApiError, InvalidParameterError, MissingParameterError, RedmineClient, ResourceId,
};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{
    join_include, json_body, payload, xml_body, IssueCategoryApi, IssueStatusApi, ProjectApi,
    TrackerApi, UserApi,
};

/// Priority id of "Low" in a default installation.
pub const PRIORITY_LOW: i64 = 1;
/// Priority id of "Normal" in a default installation.
pub const PRIORITY_NORMAL: i64 = 2;
/// Priority id of "High" in a default installation.
pub const PRIORITY_HIGH: i64 = 3;
/// Priority id of "Urgent" in a default installation.
pub const PRIORITY_URGENT: i64 = 4;
/// Priority id of "Immediate" in a default installation.
pub const PRIORITY_IMMEDIATE: i64 = 5;

const CREATE_FIELDS: &[&str] = &[
    "subject",
    "description",
    "project_id",
    "category_id",
    "priority_id",
    "status_id",
    "tracker_id",
    "assigned_to_id",
    "author_id",
    "due_date",
    "start_date",
    "watcher_user_ids",
    "fixed_version_id",
];

const UPDATE_FIELDS: &[&str] = &[
    "subject",
    "notes",
    "private_notes",
    "category_id",
    "priority_id",
    "status_id",
    "tracker_id",
    "assigned_to_id",
    "due_date",
];

/// Removes `key` and returns its text, if any.
fn take_name(params: &mut WireMap, key: &str) -> Option<String> {
    params
        .shift_remove(key)
        .and_then(|value| value.scalar_text())
        .filter(|name| !name.is_empty())
}

fn resolved(key: &str, name: &str, id: Option<i64>) -> Result<WireValue, InvalidParameterError> {
    id.map(WireValue::Int)
        .ok_or_else(|| InvalidParameterError::new(key, name, format!("a known {key} name")))
}

fn project_of(params: &WireMap) -> Option<ResourceId> {
    match params.get("project_id")? {
        WireValue::Int(id) => Some(ResourceId::Id(*id)),
        other => other.scalar_text().map(ResourceId::Identifier),
    }
}

/// Handle for `/issues`.
#[derive(Debug)]
pub struct IssueApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    projects: ProjectApi<'a, T>,
    categories: IssueCategoryApi<'a, T>,
    statuses: IssueStatusApi<'a, T>,
    trackers: TrackerApi<'a, T>,
    users: UserApi<'a, T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for IssueApi<'a, T> {
    const KIND: ApiKind = ApiKind::Issue;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self {
            client,
            projects: ProjectApi::new(client),
            categories: IssueCategoryApi::new(client),
            statuses: IssueStatusApi::new(client),
            trackers: TrackerApi::new(client),
            users: UserApi::new(client),
        }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> IssueApi<'_, T> {
    /// Lists issues. Filters such as `project_id`, `status_id` or
    /// `cf_1` go in `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all("/issues.json", params).await
    }

    /// Shows an issue. `include` may be a list (`["journals", "watchers"]`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64, params: &WireMap) -> Result<WireValue, ApiError> {
        let mut query = payload(&[], params);
        join_include(&mut query);
        let path = build_path(&format!("/issues/{id}.json"), &query);
        self.client.get_value(&path).await
    }

    /// Creates an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for a name that cannot be
    /// resolved, or [`ApiError`] if a request fails.
    pub async fn create(&mut self, params: &WireMap) -> Result<WireValue, ApiError> {
        let issue = payload(CREATE_FIELDS, &self.resolve_names(params).await?);
        let body = xml_body(&XmlEncoder::new("issue"), issue);
        self.client.post("/issues.xml", body, DataType::Xml).await
    }

    /// Updates an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for a name that cannot be
    /// resolved, or [`ApiError`] if a request fails.
    pub async fn update(&mut self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let issue = payload(UPDATE_FIELDS, &self.resolve_names(params).await?);
        let body = xml_body(&XmlEncoder::new("issue"), issue);
        self.client
            .put(&format!("/issues/{id}.xml"), body, DataType::Xml, None)
            .await?;
        Ok(())
    }

    /// Adds a watcher to an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn add_watcher(&self, id: i64, user_id: i64) -> Result<(), ApiError> {
        let body = XmlEncoder::new("user_id")
            .encode(&WireValue::Int(user_id))
            .into_bytes();
        self.client
            .post(&format!("/issues/{id}/watchers.xml"), body, DataType::Xml)
            .await?;
        Ok(())
    }

    /// Removes a watcher from an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove_watcher(&self, id: i64, user_id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/issues/{id}/watchers/{user_id}.xml"))
            .await?;
        Ok(())
    }

    /// Moves an issue to the status called `status`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an unknown status name, or
    /// [`ApiError`] if a request fails.
    pub async fn set_issue_status(&mut self, id: i64, status: &str) -> Result<(), ApiError> {
        let mut params = WireMap::new();
        params.insert("status".to_string(), WireValue::from(status));
        self.update(id, &params).await
    }

    /// Adds a journal note to an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn add_note_to_issue(
        &mut self,
        id: i64,
        note: &str,
        private: bool,
    ) -> Result<(), ApiError> {
        let mut params = WireMap::new();
        params.insert("notes".to_string(), WireValue::from(note));
        params.insert("private_notes".to_string(), WireValue::Bool(private));
        self.update(id, &params).await
    }

    /// Attaches one uploaded file to an issue.
    ///
    /// `upload` carries the `token` returned by
    /// [`AttachmentApi::upload`](super::AttachmentApi::upload) plus
    /// optional `filename`, `description` and `content_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn attach(&self, id: i64, upload: &WireMap) -> Result<(), ApiError> {
        self.attach_many(id, slice::from_ref(upload)).await
    }

    /// Attaches several uploaded files to an issue in one request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn attach_many(&self, id: i64, uploads: &[WireMap]) -> Result<(), ApiError> {
        let mut issue = WireMap::new();
        issue.insert(
            "uploads".to_string(),
            WireValue::List(uploads.iter().cloned().map(WireValue::Map).collect()),
        );
        self.client
            .put(
                &format!("/issues/{id}.json"),
                json_body("issue", issue),
                DataType::Json,
                None,
            )
            .await?;
        Ok(())
    }

    /// Deletes an issue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/issues/{id}.xml")).await?;
        Ok(())
    }

    async fn resolve_names(&mut self, params: &WireMap) -> Result<WireMap, ApiError> {
        let mut params = params.clone();

        if let Some(name) = take_name(&mut params, "project") {
            let id = self.projects.get_id_by_name(&name).await?;
            params.insert("project_id".to_string(), resolved("project", &name, id)?);
        }
        if let Some(name) = take_name(&mut params, "category") {
            let project = project_of(&params)
                .ok_or_else(|| MissingParameterError::new("issue", vec!["project_id"]))?;
            let id = self.categories.get_id_by_name(project, &name).await?;
            params.insert("category_id".to_string(), resolved("category", &name, id)?);
        }
        if let Some(name) = take_name(&mut params, "status") {
            let id = self.statuses.get_id_by_name(&name).await?;
            params.insert("status_id".to_string(), resolved("status", &name, id)?);
        }
        if let Some(name) = take_name(&mut params, "tracker") {
            let id = self.trackers.get_id_by_name(&name).await?;
            params.insert("tracker_id".to_string(), resolved("tracker", &name, id)?);
        }
        if let Some(name) = take_name(&mut params, "assigned_to") {
            let id = self.users.get_id_by_username(&name).await?;
            params.insert(
                "assigned_to_id".to_string(),
                resolved("assigned_to", &name, id)?,
            );
        }
        if let Some(name) = take_name(&mut params, "author") {
            let id = self.users.get_id_by_username(&name).await?;
            params.insert("author_id".to_string(), resolved("author", &name, id)?);
        }

        Ok(params)
    }
}
