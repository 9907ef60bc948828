use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of accounts returned by a list query when no size is given
pub const DEFAULT_PAGINATION_SIZE: u32 = 100;

/// An account document.
///
/// Only `account_id` is interpreted by the service. Every other top-level
/// member of the JSON object is kept in `profile` and stored as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Account {
    /// Store-generated identifier, absent until the account has been created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Opaque profile fields
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Account {
    pub fn new(profile: Map<String, Value>) -> Self {
        Self {
            account_id: None,
            profile,
        }
    }

    /// The identifier, treating an empty string the same as a missing one
    pub fn id(&self) -> Option<&str> {
        self.account_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn with_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }
}

/// Restricts a list query to a set of account identifiers.
/// An empty `ids` list means no restriction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    pub ids: Vec<String>,
}

impl Filter {
    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Windowing for list queries.
///
/// `page` is a raw skip count, not a page index: a query with `page = 3`
/// skips the first three matching accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of accounts to return
    pub size: u32,
    /// Number of matching accounts to skip
    pub page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGINATION_SIZE,
            page: 0,
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
