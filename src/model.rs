use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Author time, not committer time.
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub parent_hashes: Vec<String>,
}

impl Commit {
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.len() > 1
    }

    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Line and file counts between two trees.
///
/// `additions`, `deletions` and `files_changed` only count files that survive the
/// exclusion patterns; the `total_*` fields count everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub additions: u64,
    pub deletions: u64,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub files_changed: usize,
    pub files_changed_total: usize,
}

impl DiffStats {
    pub fn has_filtered_changes(&self) -> bool {
        self.additions > 0 || self.deletions > 0
    }
}

/// Two adjacent commits in history and the diff between them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitPair {
    pub previous: Commit,
    pub current: Commit,
    pub time_delta: TimeDelta,
    pub stats: DiffStats,
}

#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    pub branch: Option<String>,
    pub max_depth: Option<usize>,
}

impl CommitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
