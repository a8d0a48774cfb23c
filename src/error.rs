use std::path::PathBuf;

/// Failures that callers (and tests) need to tell apart.
///
/// Everything is raised through `anyhow`, so use
/// `err.downcast_ref::<CloveError>()` to inspect the category.
#[derive(Debug, thiserror::Error)]
pub enum CloveError {
    #[error("not a git repository (or no working directory): {}", .0.display())]
    NotARepository(PathBuf),

    #[error("target directory already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("not found as path or branch: {0}")]
    NotFound(String),

    #[error("`{command}` failed ({status}): {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A best-effort step that failed without failing the whole operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    CacheCopyFailed { directory: String, reason: String },
    OpenCommandFailed { command: String, reason: String },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::CacheCopyFailed { directory, reason } => {
                write!(f, "failed to copy {}: {}", directory, reason)
            }
            Advisory::OpenCommandFailed { command, reason } => {
                write!(f, "failed to open with `{}`: {}", command, reason)
            }
        }
    }
}
