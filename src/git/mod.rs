use anyhow::{Context, Result};
use git2::Repository;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::CloveError;
use crate::naming::shell_join;
use crate::traits::GitExecutor;

#[cfg(test)]
pub(crate) mod fake;

/// A composed external command, kept as data so dry-run can print it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<OsString>,
}

impl CommandLine {
    /// Builds `git -C <repo_root> <args>`.
    pub fn git<I, S>(repo_root: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut all = vec![OsString::from("-C"), repo_root.as_os_str().to_os_string()];
        all.extend(args.into_iter().map(Into::into));
        Self {
            program: "git".to_string(),
            args: all,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Runs the command with the terminal attached.
    ///
    /// # Errors
    /// Returns an error if the program fails to start or exits non-zero
    pub fn execute(&self, git: &dyn GitExecutor) -> Result<()> {
        git.run_interactive(&self.program, &self.args)
    }
}

/// Renders `program args...` for display; non-UTF-8 bytes are shown lossily.
fn render(program: &str, args: &[OsString]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(program.to_string());
    words.extend(args.iter().map(|arg| arg.to_string_lossy().into_owned()));
    shell_join(&words)
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(&self.program, &self.args))
    }
}

/// Shells out to the `git` binary on `PATH`.
pub struct GitCli;

impl GitCli {
    fn command(repo_root: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        if !repo_root.as_os_str().is_empty() {
            cmd.arg("-C").arg(repo_root);
        }
        cmd.args(args);
        cmd
    }
}

impl GitExecutor for GitCli {
    fn run(&self, repo_root: &Path, args: &[&str]) -> Result<String> {
        debug!(repo_root = %repo_root.display(), ?args, "git");
        let output = Self::command(repo_root, args)
            .output()
            .map_err(|source| CloveError::Spawn {
                program: "git".to_string(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(CloveError::CommandFailed {
                command: CommandLine::git(repo_root, args.iter().copied()).to_string(),
                status: output.status.to_string(),
                output: combined.trim().to_string(),
            }
            .into());
        }

        Ok(combined)
    }

    fn succeeds(&self, repo_root: &Path, args: &[&str]) -> bool {
        debug!(repo_root = %repo_root.display(), ?args, "git (status only)");
        Self::command(repo_root, args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    fn run_interactive(&self, program: &str, args: &[OsString]) -> Result<()> {
        debug!(program, ?args, "running with terminal attached");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| CloveError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(CloveError::CommandFailed {
                command: render(program, args),
                status: status.to_string(),
                output: String::new(),
            }
            .into());
        }

        Ok(())
    }
}

/// Finds the working-tree root of the repository containing `start`.
///
/// Inside a linked worktree this is the worktree's own root.
///
/// # Errors
/// Returns [`CloveError::NotARepository`] if `start` is not inside a
/// non-bare git repository
pub fn discover_repo_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start)
        .map_err(|_| CloveError::NotARepository(start.to_path_buf()))?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| CloveError::NotARepository(start.to_path_buf()))?;

    // git2 reports the workdir with a trailing separator
    let root = workdir.components().collect::<PathBuf>();
    debug!(root = %root.display(), "discovered repository root");
    Ok(root)
}

/// Resolves the repository root from an explicit override or the current directory.
///
/// # Errors
/// Returns an error if the current directory is unavailable or not inside a repository
pub fn resolve_repo_root(repo_override: Option<&Path>) -> Result<PathBuf> {
    match repo_override {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let current_dir = std::env::current_dir().context("Failed to read current directory")?;
            discover_repo_root(&current_dir)
        }
    }
}
