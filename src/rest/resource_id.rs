//! Identifiers accepted by resource operations.

use std::fmt;

use crate::wire::WireValue;

/// A resource identifier: a numeric id, or a string identifier such as a
/// project's `identifier` or a wiki page title.
///
/// # Example
///
/// ```rust
/// use redmine_api::rest::ResourceId;
///
/// assert_eq!(ResourceId::from(5), ResourceId::Id(5));
/// assert_eq!(ResourceId::from("redmine").to_string(), "redmine");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Numeric id.
    Id(i64),
    /// String identifier.
    Identifier(String),
}

impl ResourceId {
    /// Returns the numeric id, if this is one.
    #[must_use]
    pub const fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Identifier(_) => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Identifier(identifier) => f.write_str(identifier),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        Self::Id(i64::from(id))
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self::Id(i64::from(id))
    }
}

impl From<&str> for ResourceId {
    fn from(identifier: &str) -> Self {
        Self::Identifier(identifier.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(identifier: String) -> Self {
        Self::Identifier(identifier)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

impl From<ResourceId> for WireValue {
    fn from(id: ResourceId) -> Self {
        match id {
            ResourceId::Id(id) => Self::Int(id),
            ResourceId::Identifier(identifier) => Self::String(identifier),
        }
    }
}
