//! Issue categories, scoped to a project.

use indexmap::IndexMap;

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{build_path, path_segment, ApiError, RedmineClient, ResourceId};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{cached_project_names, find_id, payload, require, xml_body, NameMap};

const FIELDS: &[&str] = &["name", "assigned_to_id"];

fn collection(project: &str) -> String {
    format!("/projects/{project}/issue_categories")
}

/// Handle for `/issue_categories` and `/projects/{project}/issue_categories`.
#[derive(Debug)]
pub struct IssueCategoryApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: IndexMap<String, NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for IssueCategoryApi<'a, T> {
    const KIND: ApiKind = ApiKind::IssueCategory;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self {
            client,
            names: IndexMap::new(),
        }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> IssueCategoryApi<'_, T> {
    /// Lists the categories of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the identifier is empty or a request fails.
    pub async fn list_by_project(
        &self,
        project: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let project = project.into();
        let endpoint = format!("{}.json", collection(&path_segment(&project)?));
        self.client.fetch_all(&endpoint, params).await
    }

    /// Returns category names by id for a project, loading them on first
    /// use. Each project is cached separately.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the identifier is empty, or if the names have
    /// to be loaded and a request fails.
    pub async fn list_names_by_project(
        &mut self,
        project: impl Into<ResourceId>,
        force_update: bool,
    ) -> Result<&NameMap, ApiError> {
        let project = project.into();
        let segment = path_segment(&project)?.into_owned();
        let endpoint = format!("{}.json", collection(&segment));
        cached_project_names(
            &mut self.names,
            segment,
            force_update,
            self.client,
            &endpoint,
            "issue_categories",
        )
        .await
    }

    /// Returns the id of the category called `name` in a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the names have to be loaded and a request fails.
    pub async fn get_id_by_name(
        &mut self,
        project: impl Into<ResourceId>,
        name: &str,
    ) -> Result<Option<i64>, ApiError> {
        Ok(find_id(self.list_names_by_project(project, false).await?, name))
    }

    /// Shows a category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64) -> Result<WireValue, ApiError> {
        self.client
            .get_value(&format!("/issue_categories/{id}.json"))
            .await
    }

    /// Creates a category in a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `name`, or
    /// [`ApiError`] if the request fails.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let category = payload(FIELDS, params);
        require("issue_category", &category, &["name"])?;

        let project = project.into();
        let path = format!("{}.xml", collection(&path_segment(&project)?));
        let body = xml_body(&XmlEncoder::new("issue_category"), category);
        self.client.post(&path, body, DataType::Xml).await
    }

    /// Updates a category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let body = xml_body(&XmlEncoder::new("issue_category"), payload(FIELDS, params));
        self.client
            .put(
                &format!("/issue_categories/{id}.xml"),
                body,
                DataType::Xml,
                None,
            )
            .await?;
        Ok(())
    }

    /// Deletes a category. Pass `reassign_to_id` to move its issues to
    /// another category.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let query = payload(&["reassign_to_id"], params);
        let path = build_path(&format!("/issue_categories/{id}.xml"), &query);
        self.client.delete(&path).await?;
        Ok(())
    }
}
