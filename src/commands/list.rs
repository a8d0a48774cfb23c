use anyhow::{Context, Result};
use std::path::Path;

use crate::git::{CommandLine, GitCli};
use crate::session::Session;
use crate::worktree::{WorktreeRecord, parse_worktree_list};

/// Streams `git worktree list` for the repository (porcelain format on request)
///
/// # Errors
/// Returns an error if the repository cannot be resolved or git fails
pub fn list_worktrees(porcelain: bool, repo: Option<&Path>) -> Result<()> {
    let session = Session::open(&GitCli, repo)?;
    list_worktrees_with_session(&session, porcelain)
}

/// # Errors
/// Returns an error if git fails
pub fn list_worktrees_with_session(session: &Session, porcelain: bool) -> Result<()> {
    list_command(&session.repo_root, porcelain).execute(session.git)
}

#[must_use]
pub fn list_command(repo_root: &Path, porcelain: bool) -> CommandLine {
    let cmd = CommandLine::git(repo_root, ["worktree", "list"]);
    if porcelain {
        cmd.arg("--porcelain")
    } else {
        cmd
    }
}

/// Captures and parses the porcelain listing.
///
/// # Errors
/// Returns an error if `git worktree list --porcelain` fails
pub fn query_worktrees(session: &Session) -> Result<Vec<WorktreeRecord>> {
    let output = session
        .git
        .run(&session.repo_root, &["worktree", "list", "--porcelain"])
        .context("Failed to list worktrees")?;
    Ok(parse_worktree_list(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloveConfig;
    use crate::git::fake::FakeGit;
    use std::path::PathBuf;

    #[test]
    fn test_list_command_forwards_porcelain() {
        let root = Path::new("/work/app");
        assert_eq!(list_command(root, false).to_string(), "git -C /work/app worktree list");
        assert_eq!(
            list_command(root, true).to_string(),
            "git -C /work/app worktree list --porcelain"
        );
    }

    #[test]
    fn test_list_streams_output() -> Result<()> {
        let git = FakeGit::new();
        let session = Session::new(&git, "/work/app", CloveConfig::default());

        list_worktrees_with_session(&session, true)?;
        assert_eq!(
            git.interactive_calls(),
            vec!["git -C /work/app worktree list --porcelain".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_query_worktrees_parses_listing() -> Result<()> {
        let git = FakeGit::new().with_output(
            &["worktree", "list", "--porcelain"],
            "worktree /work/app\nHEAD 1\nbranch refs/heads/main\n\nworktree /work/app-x\nHEAD 2\ndetached\n",
        );
        let session = Session::new(&git, "/work/app", CloveConfig::default());

        let records = query_worktrees(&session)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].path, PathBuf::from("/work/app-x"));
        assert!(records[1].is_detached());
        Ok(())
    }
}
