//! Time entry activities, an enumeration.

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{ApiError, RedmineClient};
use crate::wire::{WireMap, WireValue};

use super::{cached_names, find_id, NameMap};

const ENDPOINT: &str = "/enumerations/time_entry_activities.json";

/// Handle for `/enumerations/time_entry_activities`.
#[derive(Debug)]
pub struct TimeEntryActivityApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
    names: Option<NameMap>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for TimeEntryActivityApi<'a, T> {
    const KIND: ApiKind = ApiKind::TimeEntryActivity;

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

impl<T: HttpTransport> TimeEntryActivityApi<'_, T> {
    /// Lists time entry activities.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn list(&self, params: &WireMap) -> Result<WireValue, ApiError> {
        self.client.fetch_all(ENDPOINT, params).await
    }

    /// Returns activity names by id, loading them on first use.
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
            "time_entry_activities",
            "name",
        )
        .await
    }

    /// Returns the id of the activity called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the names have to be loaded and a request fails.
    pub async fn get_id_by_name(&mut self, name: &str) -> Result<Option<i64>, ApiError> {
        Ok(find_id(self.list_names(false).await?, name))
    }
}
