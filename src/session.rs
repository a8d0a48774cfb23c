use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::CloveConfig;
use crate::git::resolve_repo_root;
use crate::traits::GitExecutor;

/// Everything a command needs, passed explicitly instead of read from globals.
pub struct Session<'a> {
    pub git: &'a dyn GitExecutor,
    pub repo_root: PathBuf,
    pub config: CloveConfig,
}

impl<'a> Session<'a> {
    pub fn new(
        git: &'a dyn GitExecutor,
        repo_root: impl Into<PathBuf>,
        config: CloveConfig,
    ) -> Self {
        Self {
            git,
            repo_root: repo_root.into(),
            config,
        }
    }

    /// Resolves the repository root (override or discovery) and loads its configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - No repository contains the current directory
    /// - A configuration file exists but cannot be read
    pub fn open(git: &'a dyn GitExecutor, repo_override: Option<&Path>) -> Result<Self> {
        let repo_root = resolve_repo_root(repo_override)?;
        let config = CloveConfig::load(&repo_root)?;
        Ok(Self::new(git, repo_root, config))
    }
}
