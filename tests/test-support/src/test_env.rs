use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::path::Path;
use std::process::Command;

/// A repository named `project` with a bare `origin` next to it.
///
/// Worktrees created by clove land beside `project`, so everything stays
/// inside the temporary directory.
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub origin_dir: assert_fs::fixture::ChildPath,
    temp_dir: TempDir, // Kept private so cleanup happens when the environment drops
}

impl CliTestEnvironment {
    /// Creates a repository on `main` with one commit, pushed to a bare `origin`
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize or configure the git repository
    /// - Failed to create the initial commit or the remote
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("project");
        let origin_dir = temp_dir.child("origin.git");

        repo_dir.create_dir_all()?;

        run_git(repo_dir.path(), &["init"])?;
        run_git(repo_dir.path(), &["config", "user.name", "Test User"])?;
        run_git(repo_dir.path(), &["config", "user.email", "test@example.com"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        run_git(repo_dir.path(), &["add", "."])?;
        run_git(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Some git versions default to 'master'
        run_git(repo_dir.path(), &["branch", "-M", "main"])?;

        let origin = origin_dir.path().to_string_lossy().to_string();
        run_git(temp_dir.path(), &["clone", "--bare", "project", "origin.git"])?;
        run_git(repo_dir.path(), &["remote", "add", "origin", &origin])?;
        run_git(repo_dir.path(), &["fetch", "origin"])?;

        Ok(Self {
            repo_dir,
            origin_dir,
            temp_dir,
        })
    }

    /// Runs `clove` from inside the repository with an isolated user config
    ///
    /// # Errors
    /// Returns an error if the binary cannot be located
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd =
            assert_cmd::Command::cargo_bin("clove").context("Failed to find clove binary")?;

        cmd.current_dir(self.repo_dir.path())
            .env("CLOVE_CONFIG", self.temp_dir.child("clove-config.toml").path())
            .env_remove("CLOVE_LOG");

        cmd.args(args);
        Ok(cmd)
    }

    /// Sibling directory clove uses for `branch` with the default prefix
    pub fn worktree_path(&self, branch_name: &str) -> assert_fs::fixture::ChildPath {
        self.sibling(&format!("project-{}", branch_name.replace('/', "-")))
    }

    /// Any path beside the repository
    pub fn sibling(&self, dir_name: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(dir_name)
    }

    /// Runs git in the repository and returns trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git fails
    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(self.repo_dir.path(), args)
    }

    /// Creates `branch` on `origin` only, then fetches so `origin/<branch>` exists locally
    ///
    /// # Errors
    /// Returns an error if the push or fetch fails
    pub fn create_remote_branch(&self, branch: &str) -> Result<()> {
        self.git(&["push", "origin", &format!("HEAD:refs/heads/{}", branch)])?;
        self.git(&["fetch", "origin"])?;
        Ok(())
    }

    /// Current branch checked out in `dir`
    ///
    /// # Errors
    /// Returns an error if git fails
    pub fn branch_in(&self, dir: &Path) -> Result<String> {
        run_git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Git command failed: git {}: {}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.origin_dir.assert(predicate::path::is_dir());
        assert_eq!(env.git(&["rev-parse", "--abbrev-ref", "HEAD"])?, "main");
        assert!(env.git(&["branch", "-r"])?.contains("origin/main"));

        Ok(())
    }

    #[test]
    fn test_worktree_path_sanitization() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        let path = env.worktree_path("feature/test-branch");
        assert!(
            path.path()
                .to_string_lossy()
                .ends_with("project-feature-test-branch")
        );

        Ok(())
    }
}
