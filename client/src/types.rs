//! API payloads used by the load commands

use serde::{Deserialize, Serialize};

/// Repository metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name
    pub id: String,

    /// Object store location backing the repository
    pub storage_namespace: String,

    /// Default branch
    #[serde(default)]
    pub default_branch: String,

    /// Creation time (unix seconds)
    #[serde(default)]
    pub creation_date: i64,
}

/// Object metadata as returned by stat and stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStats {
    /// Path under the ref
    pub path: String,

    /// Location in the object store
    pub physical_address: String,

    /// Content checksum
    pub checksum: String,

    /// Object size
    #[serde(default)]
    pub size_bytes: Option<i64>,

    /// Modification time (unix seconds)
    pub mtime: i64,
}

/// Body of a stage-object request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStageCreation {
    /// Location in the object store
    pub physical_address: String,

    /// Content checksum
    pub checksum: String,

    /// Object size
    pub size_bytes: i64,
}

/// Body of a create-branch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCreation {
    /// New branch name
    pub name: String,

    /// Ref to branch from
    pub source: String,
}

/// A named ref (branch or tag)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    /// Ref name
    pub id: String,

    /// Commit the ref points at
    pub commit_id: String,
}

/// Listing cursor information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Whether another page follows
    pub has_more: bool,

    /// Value to pass as `after` for the next page
    pub next_offset: String,

    /// Entries in this page
    pub results: usize,

    /// Page size limit applied by the server
    pub max_per_page: usize,
}

/// One page of refs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefList {
    /// Cursor information
    pub pagination: Pagination,

    /// Refs in listing order
    pub results: Vec<Ref>,
}

/// Error body returned by the server
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) message: String,
}
