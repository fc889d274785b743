//! Payload vocabulary for the aggregation domain
//!
//! The graph core is payload-agnostic; this module is the closed set of
//! entity and relation payloads the data-source adapters share. Each
//! variant's `kind()` supplies the type tag used in the entity's address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state shared by issues and pull requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Content of an entity node, one variant per known entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityPayload {
    /// A tracked issue
    Issue {
        title: String,
        state: IssueState,
        body: Option<String>,
        created_at: DateTime<Utc>,
    },
    /// A pull request
    PullRequest {
        title: String,
        state: IssueState,
        merged: bool,
        created_at: DateTime<Utc>,
    },
    /// A comment on an issue or pull request
    Comment {
        body: String,
        created_at: DateTime<Utc>,
    },
    /// A person appearing as author or commenter
    Author {
        name: String,
        email: Option<String>,
    },
}

impl EntityPayload {
    /// The address type tag for a node carrying this payload
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "issue",
            Self::PullRequest { .. } => "pull_request",
            Self::Comment { .. } => "comment",
            Self::Author { .. } => "author",
        }
    }
}

/// Content of a relationship edge, read src → dst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationPayload {
    /// src (an author) wrote dst
    Authored,
    /// src (a comment) was left on dst
    CommentsOn,
    /// src mentions dst
    References,
    /// src duplicates dst
    Duplicates,
}

impl RelationPayload {
    /// The address type tag for an edge carrying this payload
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authored => "authored",
            Self::CommentsOn => "comments_on",
            Self::References => "references",
            Self::Duplicates => "duplicates",
        }
    }
}
