//! News items.

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{path_segment, ApiError, RedmineClient, ResourceId};
use crate::wire::{WireMap, WireValue};

/// Handle for `/news`.
#[derive(Debug)]
pub struct NewsApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for NewsApi<'a, T> {
    const KIND: ApiKind = ApiKind::News;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> NewsApi<'_, T> {
    /// Lists news across all visible projects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all("/news.json", params).await
    }

    /// Lists the news of one project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidParameter`] for an empty project identifier,
    /// or [`ApiError`] if a request fails.
    pub async fn list_by_project(
        &self,
        project: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let project = project.into();
        let endpoint = format!("/projects/{}/news.json", path_segment(&project)?);
        self.client.fetch_all(&endpoint, params).await
    }
}
