//! The client facade over a transport.

use crate::clients::{DataType, HttpClient, HttpError, HttpResponse, HttpTransport};
use crate::config::RedmineConfig;
use crate::rest::errors::{ApiError, UnexpectedResponseError};
use crate::rest::pagination;
use crate::rest::registry::{Api, ApiKind, ResourceApi};
use crate::rest::resources::{
    AttachmentApi, CustomFieldApi, GroupApi, IssueApi, IssueCategoryApi, IssuePriorityApi,
    IssueRelationApi, IssueStatusApi, MembershipApi, NewsApi, ProjectApi, QueryApi, RoleApi,
    SearchApi, TimeEntryActivityApi, TimeEntryApi, TrackerApi, UserApi, VersionApi, WikiApi,
};
use crate::rest::response::decode_body;
use crate::wire::{WireMap, WireValue};

/// Entry point to the Redmine REST API.
///
/// A `RedmineClient` owns its transport and hands out resource handles that
/// borrow it. Handles are cheap; name caches live on the handle, so keep a
/// handle around to reuse its cache.
///
/// # Example
///
/// ```rust,ignore
/// use redmine_api::{ApiKey, RedmineClient, RedmineConfig, ServerUrl};
/// use redmine_api::wire::WireValue;
/// use serde_json::json;
///
/// let config = RedmineConfig::builder()
///     .url(ServerUrl::new("https://redmine.example.com")?)
///     .api_key(ApiKey::new("my-api-key")?)
///     .build()?;
/// let client = RedmineClient::new(&config)?;
///
/// let params = WireValue::from(json!({"project_id": "redmine", "limit": 250}));
/// let issues = client.issue().list(params.as_map().unwrap()).await?;
///
/// let mut trackers = client.tracker();
/// let names = trackers.list_names(false).await?;
/// ```
#[derive(Debug)]
pub struct RedmineClient<T: HttpTransport = HttpClient> {
    transport: T,
}

// Verify RedmineClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RedmineClient>();
};

impl RedmineClient<HttpClient> {
    /// Creates a client backed by the default [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be created.
    pub fn new(config: &RedmineConfig) -> Result<Self, HttpError> {
        Ok(Self::with_transport(HttpClient::new(config)?))
    }
}

impl<T: HttpTransport> RedmineClient<T> {
    /// Creates a client over a custom transport.
    #[must_use]
    pub const fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the transport mutably, e.g. to toggle impersonation.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Returns the handle for `kind`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use redmine_api::rest::{Api, ApiKind};
    ///
    /// let kind: ApiKind = "issue_status".parse()?;
    /// if let Api::IssueStatus(mut statuses) = client.api(kind) {
    ///     println!("{:?}", statuses.list_names(false).await?);
    /// }
    /// ```
    #[must_use]
    pub fn api(&self, kind: ApiKind) -> Api<'_, T> {
        match kind {
            ApiKind::Attachment => Api::Attachment(self.attachment()),
            ApiKind::CustomFields => Api::CustomFields(self.custom_fields()),
            ApiKind::Group => Api::Group(self.group()),
            ApiKind::Issue => Api::Issue(self.issue()),
            ApiKind::IssueCategory => Api::IssueCategory(self.issue_category()),
            ApiKind::IssuePriority => Api::IssuePriority(self.issue_priority()),
            ApiKind::IssueRelation => Api::IssueRelation(self.issue_relation()),
            ApiKind::IssueStatus => Api::IssueStatus(self.issue_status()),
            ApiKind::Membership => Api::Membership(self.membership()),
            ApiKind::News => Api::News(self.news()),
            ApiKind::Project => Api::Project(self.project()),
            ApiKind::Query => Api::Query(self.query()),
            ApiKind::Role => Api::Role(self.role()),
            ApiKind::Search => Api::Search(self.search()),
            ApiKind::TimeEntry => Api::TimeEntry(self.time_entry()),
            ApiKind::TimeEntryActivity => Api::TimeEntryActivity(self.time_entry_activity()),
            ApiKind::Tracker => Api::Tracker(self.tracker()),
            ApiKind::User => Api::User(self.user()),
            ApiKind::Version => Api::Version(self.version()),
            ApiKind::Wiki => Api::Wiki(self.wiki()),
        }
    }

    /// Returns a handle of type `R`.
    #[must_use]
    pub fn resource<'a, R: ResourceApi<'a, T>>(&'a self) -> R {
        R::new(self)
    }

    /// Attachments and file uploads.
    #[must_use]
    pub fn attachment(&self) -> AttachmentApi<'_, T> {
        AttachmentApi::new(self)
    }

    /// Custom field definitions.
    #[must_use]
    pub fn custom_fields(&self) -> CustomFieldApi<'_, T> {
        CustomFieldApi::new(self)
    }

    /// Groups and their members.
    #[must_use]
    pub fn group(&self) -> GroupApi<'_, T> {
        GroupApi::new(self)
    }

    /// Issues.
    #[must_use]
    pub fn issue(&self) -> IssueApi<'_, T> {
        IssueApi::new(self)
    }

    /// Issue categories of a project.
    #[must_use]
    pub fn issue_category(&self) -> IssueCategoryApi<'_, T> {
        IssueCategoryApi::new(self)
    }

    /// Issue priority enumeration.
    #[must_use]
    pub fn issue_priority(&self) -> IssuePriorityApi<'_, T> {
        IssuePriorityApi::new(self)
    }

    /// Relations between issues.
    #[must_use]
    pub fn issue_relation(&self) -> IssueRelationApi<'_, T> {
        IssueRelationApi::new(self)
    }

    /// Issue statuses.
    #[must_use]
    pub fn issue_status(&self) -> IssueStatusApi<'_, T> {
        IssueStatusApi::new(self)
    }

    /// Project memberships.
    #[must_use]
    pub fn membership(&self) -> MembershipApi<'_, T> {
        MembershipApi::new(self)
    }

    /// News items.
    #[must_use]
    pub fn news(&self) -> NewsApi<'_, T> {
        NewsApi::new(self)
    }

    /// Projects.
    #[must_use]
    pub fn project(&self) -> ProjectApi<'_, T> {
        ProjectApi::new(self)
    }

    /// Saved queries.
    #[must_use]
    pub fn query(&self) -> QueryApi<'_, T> {
        QueryApi::new(self)
    }

    /// Roles.
    #[must_use]
    pub fn role(&self) -> RoleApi<'_, T> {
        RoleApi::new(self)
    }

    /// Full-text search.
    #[must_use]
    pub fn search(&self) -> SearchApi<'_, T> {
        SearchApi::new(self)
    }

    /// Time entries.
    #[must_use]
    pub fn time_entry(&self) -> TimeEntryApi<'_, T> {
        TimeEntryApi::new(self)
    }

    /// Time entry activity enumeration.
    #[must_use]
    pub fn time_entry_activity(&self) -> TimeEntryActivityApi<'_, T> {
        TimeEntryActivityApi::new(self)
    }

    /// Trackers.
    #[must_use]
    pub fn tracker(&self) -> TrackerApi<'_, T> {
        TrackerApi::new(self)
    }

    /// Users.
    #[must_use]
    pub fn user(&self) -> UserApi<'_, T> {
        UserApi::new(self)
    }

    /// Project versions.
    #[must_use]
    pub fn version(&self) -> VersionApi<'_, T> {
        VersionApi::new(self)
    }

    /// Wiki pages.
    #[must_use]
    pub fn wiki(&self) -> WikiApi<'_, T> {
        WikiApi::new(self)
    }

    /// Fetches every element of a paginated collection.
    ///
    /// See [`fetch_all`](crate::rest::fetch_all) for the paging rules.
    ///
    /// # Errors
    ///
    /// Returns the first transport, status or decoding error.
    pub async fn fetch_all(&self, endpoint: &str, params: &WireMap) -> Result<WireValue, ApiError> {
        pagination::fetch_all(endpoint, params, |path| async move {
            self.get_value(&path).await
        })
        .await
    }

    /// Sends a GET and returns the response after the status check.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnexpectedResponse`] for a status `>= 400`.
    pub async fn get_raw(&self, path: &str) -> Result<HttpResponse, ApiError> {
        let response = self.transport.get(path).await?;
        check_status(response, None)
    }

    /// Sends a GET and decodes the body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decoding failure.
    pub async fn get_value(&self, path: &str) -> Result<WireValue, ApiError> {
        let response = self.get_raw(path).await?;
        Ok(decode_body(&response)?)
    }

    /// Sends a POST and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decoding failure.
    pub async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        body_type: DataType,
    ) -> Result<WireValue, ApiError> {
        let response = self.transport.post(path, body, body_type).await?;
        let response = check_status(response, None)?;
        Ok(decode_body(&response)?)
    }

    /// Sends a PUT and decodes the response body.
    ///
    /// With `expected_status`, any other status is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decoding failure.
    pub async fn put(
        &self,
        path: &str,
        body: Vec<u8>,
        body_type: DataType,
        expected_status: Option<u16>,
    ) -> Result<WireValue, ApiError> {
        let response = self.transport.put(path, body, body_type).await?;
        let response = check_status(response, expected_status)?;
        Ok(decode_body(&response)?)
    }

    /// Sends a DELETE and decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status or decoding failure.
    pub async fn delete(&self, path: &str) -> Result<WireValue, ApiError> {
        let response = self.transport.delete(path).await?;
        let response = check_status(response, None)?;
        Ok(decode_body(&response)?)
    }
}

/// Accepts `expected` exactly when given, otherwise any status below 400.
fn check_status(response: HttpResponse, expected: Option<u16>) -> Result<HttpResponse, ApiError> {
    let acceptable = expected.map_or(response.code < 400, |code| response.code == code);
    if acceptable {
        return Ok(response);
    }

    let source = decode_body(&response).err();
    Err(UnexpectedResponseError {
        response,
        expected_status: expected,
        source,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(code: u16, body: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), vec!["application/json".to_string()]);
        HttpResponse::new(code, headers, body)
    }

    #[test]
    fn test_check_status_accepts_below_400() {
        assert!(check_status(response(200, ""), None).is_ok());
        assert!(check_status(response(201, ""), None).is_ok());
        assert!(check_status(response(304, ""), None).is_ok());
    }

    #[test]
    fn test_check_status_rejects_400_and_above() {
        let error = check_status(response(422, r#"{"errors":["Name is invalid"]}"#), None)
            .unwrap_err();
        assert_eq!(error.status(), Some(422));

        let ApiError::UnexpectedResponse(inner) = error else {
            panic!("expected UnexpectedResponse");
        };
        assert!(inner.source.is_none());
        assert_eq!(inner.messages(), vec!["Name is invalid"]);
    }

    #[test]
    fn test_check_status_requires_exact_expected_status() {
        assert!(check_status(response(204, ""), Some(204)).is_ok());

        let error = check_status(response(200, ""), Some(204)).unwrap_err();
        assert_eq!(error.status(), Some(200));
    }

    #[test]
    fn test_undecodable_error_body_becomes_source() {
        let error = check_status(response(500, "{not json"), None).unwrap_err();
        let ApiError::UnexpectedResponse(inner) = error else {
            panic!("expected UnexpectedResponse");
        };
        assert!(inner.source.is_some());
    }
}
