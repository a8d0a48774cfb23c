use anyhow::Result;
use std::path::Path;

use crate::git::{CommandLine, GitCli};
use crate::session::Session;

/// Runs `git worktree prune`, forwarding `--dry-run` and `--verbose`
///
/// # Errors
/// Returns an error if the repository cannot be resolved or git fails
pub fn prune_worktrees(dry_run: bool, verbose: bool, repo: Option<&Path>) -> Result<()> {
    let session = Session::open(&GitCli, repo)?;
    prune_command(&session.repo_root, dry_run, verbose).execute(session.git)
}

#[must_use]
pub fn prune_command(repo_root: &Path, dry_run: bool, verbose: bool) -> CommandLine {
    let mut cmd = CommandLine::git(repo_root, ["worktree", "prune"]);
    if dry_run {
        cmd = cmd.arg("--dry-run");
    }
    if verbose {
        cmd = cmd.arg("--verbose");
    }
    cmd
}
