//! Full-text search.

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

/// Handle for `/search`.
#[derive(Debug)]
pub struct SearchApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for SearchApi<'a, T> {
    const KIND: ApiKind = ApiKind::Search;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> SearchApi<'_, T> {
    /// Searches for `query`.
    ///
    /// `params` narrows the search (`scope`, `all_words`, `titles_only`,
    /// `issues`, `wiki_pages`, ...) and pages through the results.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn search(&self, query: &str, params: &WireMap) -> Result<WireValue, ApiError> {
        let mut params = params.clone();
        params.insert("q".to_string(), WireValue::from(query));
        self.client.fetch_all("/search.json", &params).await
    }
}
