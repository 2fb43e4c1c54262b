//! Projects.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{build_path, path_segment, sanitize_params, ApiError, RedmineClient, ResourceId};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{cached_names, find_id, join_include, payload, require, xml_body, NameMap};

const ENDPOINT: &str = "/projects.json";
const FIELDS: &[&str] = &["name", "identifier", "description"];
const DEFAULT_INCLUDE: &str = "trackers,issue_categories,attachments,relations";

fn encoder() -> XmlEncoder<'static> {
    XmlEncoder::new("project")
        .singular("tracker_ids", "tracker")
        .singular("issue_custom_field_ids", "issue_custom_field")
        .singular("enabled_module_names", "enabled_module_names")
}

/// Handle for `/projects`.
#[derive(Debug)]
pub struct ProjectApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: Option<NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for ProjectApi<'a, T> {
    const KIND: ApiKind = ApiKind::Project;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self {
            client,
            names: None,
        }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> ProjectApi<'_, T> {
    /// Lists projects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all(ENDPOINT, params).await
    }

    /// Returns project names by id, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the names have to be loaded and a request fails.
    pub async fn list_names(&mut self, force_update: bool) -> Result<&NameMap, ApiError> {
        cached_names(
            &mut self.names,
            force_update,
            self.client,
            ENDPOINT,
            "projects",
            "name",
        )
        .await
    }

    /// Returns the id of the project called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the names have to be loaded and a request fails.
    pub async fn get_id_by_name(&mut self, name: &str) -> Result<Option<i64>, ApiError> {
        Ok(find_id(self.list_names(false).await?, name))
    }

    /// Shows a project by id or identifier.
    ///
    /// Trackers, issue categories, attachments and relations are included
    /// unless `params` sets its own `include`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the identifier is empty or the request fails.
    pub async fn show(
        &self,
        id: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let id = id.into();
        let mut defaults = WireMap::new();
        defaults.insert("include".to_string(), WireValue::from(DEFAULT_INCLUDE));
        let mut query = sanitize_params(&defaults, params);
        join_include(&mut query);

        let path = build_path(&format!("/projects/{}.json", path_segment(&id)?), &query);
        self.client.get_value(&path).await
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `name` and
    /// `identifier`, or [`ApiError`] if the request fails.
    pub async fn create(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        let project = payload(FIELDS, params);
        require("project", &project, &["name", "identifier"])?;

        let body = xml_body(&encoder(), project);
        self.client.post("/projects.xml", body, DataType::Xml).await
    }

    /// Updates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the identifier is empty or the request fails.
    pub async fn update(&self, id: impl Into<ResourceId>, params: &WireMap) -> Result<(), ApiError> {
        let id = id.into();
        let path = format!("/projects/{}.xml", path_segment(&id)?);
        let body = xml_body(&encoder(), payload(FIELDS, params));
        self.client.put(&path, body, DataType::Xml, None).await?;
        Ok(())
    }

    /// Closes a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] unless the server answers
    /// `204 No Content`.
    pub async fn close(&self, id: impl Into<ResourceId>) -> Result<(), ApiError> {
        self.change_state(id.into(), "close").await
    }

    /// Reopens a closed project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] unless the server answers
    /// `204 No Content`.
    pub async fn reopen(&self, id: impl Into<ResourceId>) -> Result<(), ApiError> {
        self.change_state(id.into(), "reopen").await
    }

    /// Archives a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] unless the server answers
    /// `204 No Content`.
    pub async fn archive(&self, id: impl Into<ResourceId>) -> Result<(), ApiError> {
        self.change_state(id.into(), "archive").await
    }

    /// Unarchives a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] unless the server answers
    /// `204 No Content`.
    pub async fn unarchive(&self, id: impl Into<ResourceId>) -> Result<(), ApiError> {
        self.change_state(id.into(), "unarchive").await
    }

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the identifier is empty or the request fails.
    pub async fn remove(&self, id: impl Into<ResourceId>) -> Result<(), ApiError> {
        let id = id.into();
        self.client
            .delete(&format!("/projects/{}.xml", path_segment(&id)?))
            .await?;
        Ok(())
    }

    async fn change_state(&self, id: ResourceId, action: &str) -> Result<(), ApiError> {
        let path = format!("/projects/{}/{action}.xml", path_segment(&id)?);
        self.client
            .put(&path, Vec::new(), DataType::Xml, Some(204))
            .await?;
        Ok(())
    }
}
