//! Saved queries.

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

/// Handle for `/queries`.
#[derive(Debug)]
pub struct QueryApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for QueryApi<'a, T> {
    const KIND: ApiKind = ApiKind::Query;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> QueryApi<'_, T> {
    /// Lists the public queries and the caller's private ones.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all("/queries.json", params).await
    }
}
