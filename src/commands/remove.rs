use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::commands::list::query_worktrees;
use crate::error::CloveError;
use crate::git::{CommandLine, GitCli};
use crate::selection::{
    RealSelectionProvider, SelectionProvider, extract_path_from_selection, format_worktree_option,
};
use crate::session::Session;
use crate::worktree::find_by_branch;

/// Input for `clove remove`.
#[derive(Debug, Clone, Default)]
pub struct RemoveRequest {
    /// Existing path, or a branch checked out in some worktree
    pub target: Option<String>,
    pub force: bool,
    pub dry_run: bool,
    pub interactive: bool,
}

/// Removes a worktree given by path or branch name
///
/// # Errors
/// Returns an error if:
/// - The repository root cannot be resolved
/// - The target matches neither an existing path nor a checked-out branch
/// - Interactive selection fails
/// - `git worktree remove` fails
pub fn remove_worktree(request: &RemoveRequest, repo: Option<&Path>) -> Result<()> {
    let session = Session::open(&GitCli, repo)?;
    remove_worktree_with_provider(&session, request, &RealSelectionProvider)?;
    Ok(())
}

/// Removes a worktree with a custom selection provider (for testing)
///
/// Returns the path that was (or, in dry-run, would be) removed.
///
/// # Errors
/// Returns an error if resolution, selection, or the git command fails
pub fn remove_worktree_with_provider(
    session: &Session,
    request: &RemoveRequest,
    provider: &dyn SelectionProvider,
) -> Result<PathBuf> {
    let target = match request.target.as_deref() {
        Some(token) if !request.interactive => resolve_remove_target(session, token)?,
        _ => select_worktree_for_removal(session, provider)?,
    };

    let command = remove_command(&session.repo_root, &target, request.force);

    if request.dry_run {
        println!("(dry-run) {}", command);
        return Ok(target);
    }

    println!("Removing worktree: {}", target.display());
    command.execute(session.git)?;
    println!("✓ Worktree removed successfully!");

    Ok(target)
}

/// An existing path wins; otherwise the token is a branch looked up in the listing.
///
/// Paths are made absolute against the current directory, since git runs with
/// `-C <repo_root>` and would resolve a relative path from there instead.
///
/// # Errors
/// Returns [`CloveError::NotFound`] if neither resolution applies, or the
/// listing error if git cannot list worktrees
pub fn resolve_remove_target(session: &Session, token: &str) -> Result<PathBuf> {
    let as_path = Path::new(token);
    if as_path.exists() {
        debug!(token, "remove target is an existing path");
        return std::path::absolute(as_path)
            .with_context(|| format!("Failed to resolve path: {}", token));
    }

    let records = query_worktrees(session)?;
    match find_by_branch(&records, token) {
        Some(record) => {
            debug!(token, path = %record.path.display(), "remove target resolved by branch");
            Ok(record.path.clone())
        }
        None => Err(CloveError::NotFound(token.to_string()).into()),
    }
}

#[must_use]
pub fn remove_command(repo_root: &Path, target: &Path, force: bool) -> CommandLine {
    let cmd = CommandLine::git(repo_root, ["worktree", "remove"]).arg(target);
    if force {
        cmd.arg("--force")
    } else {
        cmd
    }
}

fn select_worktree_for_removal(
    session: &Session,
    provider: &dyn SelectionProvider,
) -> Result<PathBuf> {
    // The first entry is always the primary working tree
    let options: Vec<String> = query_worktrees(session)?
        .iter()
        .skip(1)
        .filter(|record| !record.bare)
        .map(format_worktree_option)
        .collect();

    if options.is_empty() {
        anyhow::bail!("No linked worktrees to remove");
    }

    let selection = provider.select("Select worktree to remove:", options)?;
    extract_path_from_selection(&selection)
}
