//! Parser for `git worktree list --porcelain`.
//!
//! ```text
//! worktree /home/me/app
//! HEAD 1234567890abcdef
//! branch refs/heads/main
//!
//! worktree /home/me/app-fix
//! HEAD fedcba0987654321
//! detached
//! ```

use std::path::PathBuf;

use super::WorktreeRecord;

const PATH_MARKER: &str = "worktree ";
const BLOCK_DELIMITER: &str = "\nworktree ";
const BRANCH_PREFIX: &str = "branch ";
const HEAD_PREFIX: &str = "HEAD ";

/// Parses porcelain listing text into records, in listing order.
///
/// Never fails: blank input gives an empty list and missing attributes stay empty.
#[must_use]
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeRecord> {
    output
        .split(BLOCK_DELIMITER)
        .enumerate()
        .filter_map(|(index, block)| {
            let block = block.trim();
            if block.is_empty() {
                return None;
            }
            // Only the first block still carries its marker after splitting
            let block = if index == 0 {
                block.strip_prefix(PATH_MARKER).unwrap_or(block)
            } else {
                block
            };
            Some(parse_block(block.lines()))
        })
        .collect()
}

/// Builds one record from a block whose first line is the path (marker already removed).
#[must_use]
pub fn parse_block<'a>(mut lines: impl Iterator<Item = &'a str>) -> WorktreeRecord {
    let path = lines.next().map(str::trim).unwrap_or_default();
    let mut record = WorktreeRecord {
        path: PathBuf::from(path),
        ..WorktreeRecord::default()
    };

    for line in lines.map(str::trim) {
        if let Some(branch) = line.strip_prefix(BRANCH_PREFIX) {
            record.branch = branch.trim().to_string();
        } else if let Some(head) = line.strip_prefix(HEAD_PREFIX) {
            record.head = head.trim().to_string();
        } else if line == "bare" {
            record.bare = true;
        } else if line == "locked" || line.starts_with("locked ") {
            record.locked = true;
        } else if line == "prunable" || line.starts_with("prunable ") {
            record.prunable = true;
        }
    }

    record
}
