use anyhow::Result;
use std::ffi::OsString;
use std::path::Path;

/// Trait for running git (and helper programs) so command logic can be mocked in tests
pub trait GitExecutor {
    /// Runs `git -C <repo_root> <args>` and returns its combined output.
    ///
    /// # Errors
    /// Returns [`crate::error::CloveError::CommandFailed`] when git exits
    /// non-zero, or [`crate::error::CloveError::Spawn`] when it cannot start.
    fn run(&self, repo_root: &Path, args: &[&str]) -> Result<String>;

    /// Runs a git query and reports only whether it exited successfully.
    fn succeeds(&self, repo_root: &Path, args: &[&str]) -> bool;

    /// Runs an arbitrary program with the terminal attached.
    ///
    /// # Errors
    /// Returns an error when the program cannot start or exits non-zero.
    fn run_interactive(&self, program: &str, args: &[OsString]) -> Result<()>;
}
