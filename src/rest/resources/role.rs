//! Roles.

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

use super::{cached_names, NameMap};

const ENDPOINT: &str = "/roles.json";

/// Handle for `/roles`.
#[derive(Debug)]
pub struct RoleApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: Option<NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for RoleApi<'a, T> {
    const KIND: ApiKind = ApiKind::Role;

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

impl<T: HttpTransport> RoleApi<'_, T> {
    /// Lists roles.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all(ENDPOINT, params).await
    }

    /// Returns role names by id, loading them on first use.
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
            "roles",
            "name",
        )
        .await
    }

    /// Shows a role with its permissions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn show(&self, id: i64) -> Result<WireValue, ApiError> {
        self.client.get_value(&format!("/roles/{id}.json")).await
    }
}
