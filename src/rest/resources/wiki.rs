//! Wiki pages, scoped to a project.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{build_path, path_segment, ApiError, RedmineClient, ResourceId};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{payload, xml_body};

const FIELDS: &[&str] = &["text", "comments", "version"];

fn page_path(project: &ResourceId, page: &str) -> Result<String, ApiError> {
    let page = ResourceId::from(page);
    Ok(format!(
        "/projects/{}/wiki/{}",
        path_segment(project)?,
        path_segment(&page)?
    ))
}

/// Handle for `/projects/{project}/wiki`.
#[derive(Debug)]
pub struct WikiApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for WikiApi<'a, T> {
    const KIND: ApiKind = ApiKind::Wiki;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> WikiApi<'_, T> {
    /// Lists the pages of a project's wiki.
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
        let endpoint = format!("/projects/{}/wiki/index.json", path_segment(&project)?);
        self.client.fetch_all(&endpoint, params).await
    }

    /// Shows a page with its attachments, at `version` when given.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if an identifier is empty or the request fails.
    pub async fn show(
        &self,
        project: impl Into<ResourceId>,
        page: &str,
        version: Option<i64>,
    ) -> Result<WireValue, ApiError> {
        let page = page_path(&project.into(), page)?;
        let path = match version {
            Some(version) => format!("{page}/{version}.json"),
            None => format!("{page}.json"),
        };

        let mut query = WireMap::new();
        query.insert("include".to_string(), WireValue::from("attachments"));
        self.client.get_value(&build_path(&path, &query)).await
    }

    /// Creates a page and returns the created page document.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if an identifier is empty or the request fails.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        page: &str,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        self.save(&project.into(), page, params).await
    }

    /// Updates a page. `version` guards against concurrent edits.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if an identifier is empty or the request fails.
    pub async fn update(
        &self,
        project: impl Into<ResourceId>,
        page: &str,
        params: &WireMap,
    ) -> Result<(), ApiError> {
        self.save(&project.into(), page, params).await?;
        Ok(())
    }

    /// Deletes a page and its history.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if an identifier is empty or the request fails.
    pub async fn remove(&self, project: impl Into<ResourceId>, page: &str) -> Result<(), ApiError> {
        let path = format!("{}.xml", page_path(&project.into(), page)?);
        self.client.delete(&path).await?;
        Ok(())
    }

    async fn save(
        &self,
        project: &ResourceId,
        page: &str,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let path = format!("{}.xml", page_path(project, page)?);
        let body = xml_body(&XmlEncoder::new("wiki_page"), payload(FIELDS, params));
        self.client.put(&path, body, DataType::Xml, None).await
    }
}
