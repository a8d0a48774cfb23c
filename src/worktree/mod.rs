use std::path::PathBuf;

pub mod parser;

pub use parser::parse_worktree_list;

/// Local branch namespace as it appears in porcelain output.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// One entry of `git worktree list --porcelain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeRecord {
    pub path: PathBuf,
    /// Fully-qualified ref (`refs/heads/...`), empty when detached.
    pub branch: String,
    pub head: String,
    pub bare: bool,
    pub locked: bool,
    pub prunable: bool,
}

impl WorktreeRecord {
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.branch.is_empty()
    }

    /// Branch name without the `refs/heads/` namespace.
    #[must_use]
    pub fn short_branch(&self) -> Option<&str> {
        self.branch.strip_prefix(HEADS_PREFIX)
    }
}

/// `feature/x` -> `refs/heads/feature/x`
#[must_use]
pub fn heads_ref(branch: &str) -> String {
    format!("{}{}", HEADS_PREFIX, branch)
}

/// First record (in listing order) checked out on `branch`.
#[must_use]
pub fn find_by_branch<'a>(records: &'a [WorktreeRecord], branch: &str) -> Option<&'a WorktreeRecord> {
    let target = heads_ref(branch);
    records.iter().find(|record| record.branch == target)
}
