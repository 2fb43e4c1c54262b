//! Project memberships.

use crate::clients::{DataType, HttpClient, HttpTransport};
use crate::rest::registry::{ApiKind, ResourceApi};
use crate::rest::{path_segment, ApiError, RedmineClient, ResourceId};
use crate::wire::xml::XmlEncoder;
use crate::wire::{WireMap, WireValue};

use super::{payload, require, unbounded, xml_body};

/// Handle for `/memberships` and `/projects/{project}/memberships`.
#[derive(Debug)]
pub struct MembershipApi<'a, T: HttpTransport = HttpClient> {
    client: &'a RedmineClient<T>,
}

impl<'a, T: HttpTransport> ResourceApi<'a, T> for MembershipApi<'a, T> {
    const KIND: ApiKind = ApiKind::Membership;

    fn new(client: &'a RedmineClient<T>) -> Self {
        Self { client }
    }

    fn client(&self) -> &'a RedmineClient<T> {
        self.client
    }
}

impl<T: HttpTransport> MembershipApi<'_, T> {
    /// Lists the memberships of a project.
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
        let endpoint = format!("/projects/{}/memberships.json", path_segment(&project)?);
        self.client.fetch_all(&endpoint, params).await
    }

    /// Adds a user or group to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `user_id` and
    /// `role_ids`, or [`ApiError`] if the request fails.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        params: &WireMap,
    ) -> Result<WireValue, ApiError> {
        let membership = payload(&["user_id", "role_ids"], params);
        require("membership", &membership, &["user_id", "role_ids"])?;

        let project = project.into();
        let path = format!("/projects/{}/memberships.xml", path_segment(&project)?);
        let body = xml_body(&XmlEncoder::new("membership"), membership);
        self.client.post(&path, body, DataType::Xml).await
    }

    /// Replaces the roles of a membership.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingParameter`] without `role_ids`, or
    /// [`ApiError`] if the request fails.
    pub async fn update(&self, id: i64, params: &WireMap) -> Result<(), ApiError> {
        let membership = payload(&["role_ids"], params);
        require("membership", &membership, &["role_ids"])?;

        let body = xml_body(&XmlEncoder::new("membership"), membership);
        self.client
            .put(&format!("/memberships/{id}.xml"), body, DataType::Xml, None)
            .await?;
        Ok(())
    }

    /// Deletes a membership.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/memberships/{id}.xml")).await?;
        Ok(())
    }

    /// Removes every membership of `user_id` in a project.
    ///
    /// Returns `false` when the user is not a member.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a request fails.
    pub async fn remove_member(
        &self,
        project: impl Into<ResourceId>,
        user_id: i64,
    ) -> Result<bool, ApiError> {
        let memberships = self.list_by_project(project, &unbounded()).await?;
        let ids: Vec<i64> = memberships
            .get("memberships")
            .and_then(WireValue::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        item.get("user")
                            .and_then(|user| user.get("id"))
                            .and_then(WireValue::as_i64)
                            == Some(user_id)
                    })
                    .filter_map(|item| item.get("id").and_then(WireValue::as_i64))
                    .collect()
            })
            .unwrap_or_default();

        if ids.is_empty() {
            tracing::debug!("User {} has no membership to remove", user_id);
            return Ok(false);
        }
        for id in ids {
            self.remove(id).await?;
        }
        Ok(true)
    }
}
