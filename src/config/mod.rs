//! Layered configuration for clove.
//!
//! Settings are read, lowest precedence first, from built-in defaults, the user
//! file (`$CLOVE_CONFIG`, or `<config dir>/clove/config.toml`), and the
//! repository's own `.clove.toml`. Scalar keys from a later layer replace
//! earlier ones; dependency-cache rules accumulate.
//!
//! # Example
//!
//! ```toml
//! remote = "upstream"
//! default-branch = "develop"
//! copy-caches = true
//!
//! [[dependency-cache]]
//! manifest = "Gemfile"
//! directory = "vendor/bundle"
//!
//! [[dependency-cache]]
//! manifest = "*.csproj"
//! directory = "packages"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up at the repository root.
pub const REPO_CONFIG_FILE: &str = ".clove.toml";

/// Environment variable pointing at an explicit user config file.
pub const CONFIG_ENV: &str = "CLOVE_CONFIG";

/// A cache directory worth carrying into new worktrees when its manifest is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRule {
    /// File name or glob pattern, relative to the repository root
    pub manifest: String,
    /// Directory to copy, relative to the repository root
    pub directory: String,
}

impl CacheRule {
    pub fn new(manifest: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            manifest: manifest.into(),
            directory: directory.into(),
        }
    }
}

/// One configuration file as written on disk; every key is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConfigLayer {
    remote: Option<String>,
    default_branch: Option<String>,
    copy_caches: Option<bool>,
    #[serde(default)]
    dependency_cache: Vec<CacheRule>,
}

/// Effective settings after all layers are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloveConfig {
    pub remote: String,
    pub default_branch: String,
    pub copy_caches: bool,
    pub dependency_caches: Vec<CacheRule>,
}

impl Default for CloveConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            default_branch: "main".to_string(),
            copy_caches: true,
            dependency_caches: vec![CacheRule::new("package.json", "node_modules")],
        }
    }
}

impl CloveConfig {
    /// Loads user and repository configuration for `repo_root`.
    ///
    /// # Errors
    /// Only returns an error if a config file exists but cannot be read.
    /// Invalid TOML is reported as a warning and that layer is skipped.
    pub fn load(repo_root: &Path) -> Result<Self> {
        Self::load_layers(user_config_path().as_deref(), repo_root)
    }

    /// Loads configuration from an explicit user file (if any) plus the repository file.
    ///
    /// # Errors
    /// Returns an error if a config file exists but cannot be read
    pub fn load_layers(user_config: Option<&Path>, repo_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = user_config {
            if let Some(layer) = read_layer(path)? {
                config = config.merged_with(layer);
            }
        }

        if let Some(layer) = read_layer(&repo_root.join(REPO_CONFIG_FILE))? {
            config = config.merged_with(layer);
        }

        debug!(?config, "effective configuration");
        Ok(config)
    }

    fn merged_with(mut self, layer: ConfigLayer) -> Self {
        if let Some(remote) = layer.remote.filter(|r| !r.trim().is_empty()) {
            self.remote = remote;
        }
        if let Some(branch) = layer.default_branch.filter(|b| !b.trim().is_empty()) {
            self.default_branch = branch;
        }
        if let Some(copy_caches) = layer.copy_caches {
            self.copy_caches = copy_caches;
        }
        for rule in layer.dependency_cache {
            if !self.dependency_caches.contains(&rule) {
                self.dependency_caches.push(rule);
            }
        }
        self
    }

    /// Base used when nothing better is known, e.g. `origin/main`.
    #[must_use]
    pub fn fallback_base(&self) -> String {
        format!("{}/{}", self.remote, self.default_branch)
    }

    /// `feature/x` -> `origin/feature/x`
    #[must_use]
    pub fn remote_branch(&self, branch: &str) -> String {
        format!("{}/{}", self.remote, branch)
    }

    /// `feature/x` -> `refs/remotes/origin/feature/x`
    #[must_use]
    pub fn remote_tracking_ref(&self, branch: &str) -> String {
        format!("refs/remotes/{}/{}", self.remote, branch)
    }

    /// The symbolic ref naming the remote's default branch, e.g. `refs/remotes/origin/HEAD`.
    #[must_use]
    pub fn remote_head_ref(&self) -> String {
        format!("refs/remotes/{}/HEAD", self.remote)
    }
}

fn user_config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join("clove").join("config.toml")),
    }
}

fn read_layer(path: &Path) -> Result<Option<ConfigLayer>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(None);
    }

    match toml::from_str::<ConfigLayer>(&content) {
        Ok(layer) => Ok(Some(layer)),
        Err(e) => {
            warn!(
                "Invalid TOML in {}, ignoring it: {}",
                path.display(),
                e.message()
            );
            Ok(None)
        }
    }
}
