//! Selecting resource handles by name.

use std::fmt;
use std::str::FromStr;

use crate::clients::{HttpClient, HttpTransport};
use crate::rest::errors::InvalidParameterError;
use crate::rest::resources::{
    AttachmentApi, CustomFieldApi, GroupApi, IssueApi, IssueCategoryApi, IssuePriorityApi,
    IssueRelationApi, IssueStatusApi, MembershipApi, NewsApi, ProjectApi, QueryApi, RoleApi,
    SearchApi, TimeEntryActivityApi, TimeEntryApi, TrackerApi, UserApi, VersionApi, WikiApi,
};
use crate::rest::RedmineClient;

/// The resource families of the Redmine REST API.
///
/// # Example
///
/// ```rust
/// use redmine_api::rest::ApiKind;
///
/// let kind: ApiKind = "time_entry_activity".parse().unwrap();
/// assert_eq!(kind, ApiKind::TimeEntryActivity);
/// assert_eq!(kind.as_str(), "time_entry_activity");
/// assert!("timeline".parse::<ApiKind>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiKind {
    /// `attachment`
    Attachment,
    /// `custom_fields`
    CustomFields,
    /// `group`
    Group,
    /// `issue`
    Issue,
    /// `issue_category`
    IssueCategory,
    /// `issue_priority`
    IssuePriority,
    /// `issue_relation`
    IssueRelation,
    /// `issue_status`
    IssueStatus,
    /// `membership`
    Membership,
    /// `news`
    News,
    /// `project`
    Project,
    /// `query`
    Query,
    /// `role`
    Role,
    /// `search`
    Search,
    /// `time_entry`
    TimeEntry,
    /// `time_entry_activity`
    TimeEntryActivity,
    /// `tracker`
    Tracker,
    /// `user`
    User,
    /// `version`
    Version,
    /// `wiki`
    Wiki,
}

impl ApiKind {
    /// Every kind, in name order.
    pub const ALL: [Self; 20] = [
        Self::Attachment,
        Self::CustomFields,
        Self::Group,
        Self::Issue,
        Self::IssueCategory,
        Self::IssuePriority,
        Self::IssueRelation,
        Self::IssueStatus,
        Self::Membership,
        Self::News,
        Self::Project,
        Self::Query,
        Self::Role,
        Self::Search,
        Self::TimeEntry,
        Self::TimeEntryActivity,
        Self::Tracker,
        Self::User,
        Self::Version,
        Self::Wiki,
    ];

    /// Returns the name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::CustomFields => "custom_fields",
            Self::Group => "group",
            Self::Issue => "issue",
            Self::IssueCategory => "issue_category",
            Self::IssuePriority => "issue_priority",
            Self::IssueRelation => "issue_relation",
            Self::IssueStatus => "issue_status",
            Self::Membership => "membership",
            Self::News => "news",
            Self::Project => "project",
            Self::Query => "query",
            Self::Role => "role",
            Self::Search => "search",
            Self::TimeEntry => "time_entry",
            Self::TimeEntryActivity => "time_entry_activity",
            Self::Tracker => "tracker",
            Self::User => "user",
            Self::Version => "version",
            Self::Wiki => "wiki",
        }
    }
}

impl fmt::Display for ApiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiKind {
    type Err = InvalidParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| InvalidParameterError::new("api", s, "a known resource name"))
    }
}

/// A resource handle bound to a client.
///
/// Implemented by every handle so generic code can obtain one with
/// [`RedmineClient::resource`].
pub trait ResourceApi<'a, T: HttpTransport>: Sized {
    /// The family this handle serves.
    const KIND: ApiKind;

    /// Creates the handle.
    fn new(client: &'a RedmineClient<T>) -> Self;

    /// Returns the client the handle sends requests through.
    fn client(&self) -> &'a RedmineClient<T>;
}

/// A handle of any family, as returned by [`RedmineClient::api`].
#[derive(Debug)]
pub enum Api<'a, T: HttpTransport = HttpClient> {
    /// Attachments.
    Attachment(AttachmentApi<'a, T>),
    /// Custom fields.
    CustomFields(CustomFieldApi<'a, T>),
    /// Groups.
    Group(GroupApi<'a, T>),
    /// Issues.
    Issue(IssueApi<'a, T>),
    /// Issue categories.
    IssueCategory(IssueCategoryApi<'a, T>),
    /// Issue priorities.
    IssuePriority(IssuePriorityApi<'a, T>),
    /// Issue relations.
    IssueRelation(IssueRelationApi<'a, T>),
    /// Issue statuses.
    IssueStatus(IssueStatusApi<'a, T>),
    /// Memberships.
    Membership(MembershipApi<'a, T>),
    /// News.
    News(NewsApi<'a, T>),
    /// Projects.
    Project(ProjectApi<'a, T>),
    /// Queries.
    Query(QueryApi<'a, T>),
    /// Roles.
    Role(RoleApi<'a, T>),
    /// Search.
    Search(SearchApi<'a, T>),
    /// Time entries.
    TimeEntry(TimeEntryApi<'a, T>),
    /// Time entry activities.
    TimeEntryActivity(TimeEntryActivityApi<'a, T>),
    /// Trackers.
    Tracker(TrackerApi<'a, T>),
    /// Users.
    User(UserApi<'a, T>),
    /// Versions.
    Version(VersionApi<'a, T>),
    /// Wiki pages.
    Wiki(WikiApi<'a, T>),
}

impl<T: HttpTransport> Api<'_, T> {
    /// Returns the family of the wrapped handle.
    #[must_use]
    pub const fn kind(&self) -> ApiKind {
        match self {
            Self::Attachment(_) => ApiKind::Attachment,
            Self::CustomFields(_) => ApiKind::CustomFields,
            Self::Group(_) => ApiKind::Group,
            Self::Issue(_) => ApiKind::Issue,
            Self::IssueCategory(_) => ApiKind::IssueCategory,
            Self::IssuePriority(_) => ApiKind::IssuePriority,
            Self::IssueRelation(_) => ApiKind::IssueRelation,
            Self::IssueStatus(_) => ApiKind::IssueStatus,
            Self::Membership(_) => ApiKind::Membership,
            Self::News(_) => ApiKind::News,
            Self::Project(_) => ApiKind::Project,
            Self::Query(_) => ApiKind::Query,
            Self::Role(_) => ApiKind::Role,
            Self::Search(_) => ApiKind::Search,
            Self::TimeEntry(_) => ApiKind::TimeEntry,
            Self::TimeEntryActivity(_) => ApiKind::TimeEntryActivity,
            Self::Tracker(_) => ApiKind::Tracker,
            Self::User(_) => ApiKind::User,
            Self::Version(_) => ApiKind::Version,
            Self::Wiki(_) => ApiKind::Wiki,
        }
    }
}
