//! Custom field definitions.
//!
//! Listing custom fields requires administrator rights.

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

use super::{cached_names, find_id, NameMap};

const ENDPOINT: &str = "/custom_fields.json";

/// Handle for `/custom_fields`.
#[derive(Debug)]
pub struct CustomFieldApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: Option<NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for CustomFieldApi<'a, T> {
    const KIND: ApiKind = ApiKind::CustomFields;

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

impl<T: HttpTransport> CustomFieldApi<'_, T> {
    /// Lists custom fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all(ENDPOINT, params).await
    }

    /// Returns custom field names by id, loading them on first use.
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
            "custom_fields",
            "name",
        )
        .await
    }

    /// Returns the id of the custom field called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the names have to be loaded and a request fails.
    pub async fn get_id_by_name(&mut self, name: &str) -> Result<Option<i64>, ApiError> {
        Ok(find_id(self.list_names(false).await?, name))
    }
}
