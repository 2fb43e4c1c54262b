//! Project versions (roadmap milestones).

use indexmap::IndexMap;

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{path_segment, ApiError, RedmineClient, ResourceId};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{
    cached_project_names, check_one_of, find_id, payload, require, xml_body, NameMap,
};

/// Accepted values of a version's `status`.
pub const VERSION_STATUSES: &[&str] = &["open", "locked", "closed"];

/// Accepted values of a version's `sharing`.
pub const VERSION_SHARINGS: &[&str] = &["none", "descendants", "hierarchy", "tree", "system"];

const FIELDS: &[&str] = &[
    "name",
    "description",
    "status",
    "sharing",
    "due_date",
    "effective_date",
];

fn validate(version: &WireMap) -> Result<(), ApiError> {
    check_one_of(version, "status", VERSION_STATUSES)?;
    check_one_of(version, "sharing", VERSION_SHARINGS)?;
    Ok(())
}

/// Handle for `/versions` and `/projects/{project}/versions`.
#[derive(Debug)]
pub struct VersionApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: IndexMap<String, NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for VersionApi<'a, T> {
    const KIND: ApiKind = ApiKind::Version;

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

impl<T: HttpTransport> VersionApi<'_, T> {
    /// Lists the versions of a project, including shared ones.
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
        let endpoint = format!("/projects/{}/versions.json", path_segment(&project)?);
        self.client.fetch_all(&endpoint, params).await
    }

    /// Returns version names by id for a project, loading them on first use.
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
        let endpoint = format!("/projects/{segment}/versions.json");
        cached_project_names(
            &mut self.names,
            segment,
            force_update,
            self.client,
            &endpoint,
            "versions",
        )
        .await
    }

    /// Returns the id of the version called `name` in a project.
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

    /// Shows a version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64) -> Result<WireValue, ApiError> {
        self.client.get_value(&format!("/versions/{id}.json")).await
    }

    /// Creates a version in a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `name`,
    /// [`ApiError::InvalidParameter`] for an unknown `status` or `sharing`,
    /// or [`ApiError`] if the request fails.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let version = payload(FIELDS, params);
        require("version", &version, &["name"])?;
        validate(&version)?;

        let project = project.into();
        let path = format!("/projects/{}/versions.xml", path_segment(&project)?);
        let body = xml_body(&XmlEncoder::new("version"), version);
        self.client.post(&path, body, DataType::Xml).await
    }

    /// Updates a version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an unknown `status` or
    /// `sharing`, or [`ApiError`] if the request fails.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let version = payload(FIELDS, params);
        validate(&version)?;

        let body = xml_body(&XmlEncoder::new("version"), version);
        self.client
            .put(&format!("/versions/{id}.xml"), body, DataType::Xml, None)
            .await?;
        Ok(())
    }

    /// Deletes a version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/versions/{id}.xml")).await?;
        Ok(())
    }
}
