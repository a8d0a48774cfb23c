//! Directory naming for new worktrees and shell quoting for echoed commands.
//!
//! New worktrees live next to the primary clone: running `clove add feature/update`
//! inside `~/src/app` produces `~/src/app-feature-update`.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Used when a branch name has no directory-safe characters at all.
pub const DEFAULT_DIR_NAME: &str = "worktree";

fn is_dir_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Maps a branch name to a single directory-safe path component.
///
/// Every run of characters outside `[A-Za-z0-9._-]` (spaces, `/`, `:`, `@`, ...)
/// collapses to one `-`, and leading/trailing dashes are trimmed. Applying it
/// twice gives the same result as applying it once.
#[must_use]
pub fn sanitize_branch_name(branch_name: &str) -> String {
    let mut sanitized = String::with_capacity(branch_name.len());
    let mut in_unsafe_run = false;

    for c in branch_name.trim().chars() {
        if is_dir_safe(c) {
            sanitized.push(c);
            in_unsafe_run = false;
        } else if !in_unsafe_run {
            sanitized.push('-');
            in_unsafe_run = true;
        }
    }

    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        DEFAULT_DIR_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extracts repository name from a path
///
/// # Errors
/// Returns an error if the path doesn't have a valid file name
pub fn repo_name(repo_root: &Path) -> Result<String> {
    if let Some(name) = repo_root.file_name() {
        Ok(name.to_string_lossy().to_string())
    } else {
        anyhow::bail!(
            "Could not determine repository name from path: {}",
            repo_root.display()
        )
    }
}

/// Composes `{prefix}-{sanitized-branch}{suffix}`; the prefix defaults to the repo name.
#[must_use]
pub fn worktree_dir_name(
    repo_name: &str,
    branch: &str,
    prefix: Option<&str>,
    suffix: Option<&str>,
) -> String {
    let prefix = prefix.filter(|p| !p.is_empty()).unwrap_or(repo_name);
    format!(
        "{}-{}{}",
        prefix,
        sanitize_branch_name(branch),
        suffix.unwrap_or_default()
    )
}

/// Places `dir_name` beside the repository root (inside the root's parent).
///
/// # Errors
/// Returns an error if the repository root has no parent directory
pub fn sibling_dir(repo_root: &Path, dir_name: &str) -> Result<PathBuf> {
    let parent = repo_root.parent().ok_or_else(|| {
        anyhow::anyhow!(
            "Repository root has no parent directory: {}",
            repo_root.display()
        )
    })?;
    Ok(parent.join(dir_name))
}

/// Quotes a string for a POSIX shell.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Joins arguments into one human-readable command line, quoting only where needed.
#[must_use]
pub fn shell_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if arg.contains([' ', '\t', '\n', '"', '\'', '\\', '$']) {
                shell_quote(arg)
            } else {
                arg.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
