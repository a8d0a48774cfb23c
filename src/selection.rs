use anyhow::Result;
use inquire::Select;
use std::path::PathBuf;

use crate::worktree::WorktreeRecord;

/// Trait for providing interactive selection functionality
/// This allows us to abstract away the interactive prompts for testing
pub trait SelectionProvider {
    /// Present a selection menu and return the user's choice
    ///
    /// # Errors
    /// Returns an error if the selection process fails or user cancels
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<String>;
}

/// Real implementation using inquire::Select for production use
pub struct RealSelectionProvider;

impl SelectionProvider for RealSelectionProvider {
    fn select(&self, prompt: &str, options: Vec<String>) -> Result<String> {
        let selection = Select::new(prompt, options)
            .with_page_size(10)
            .with_vim_mode(true)
            .prompt()?;
        Ok(selection)
    }
}

/// Mock implementation for testing that returns a predetermined value
pub struct MockSelectionProvider {
    pub response: String,
}

impl MockSelectionProvider {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn select(&self, _prompt: &str, options: Vec<String>) -> Result<String> {
        // Validate that the response is actually in the options
        if options.contains(&self.response) {
            Ok(self.response.clone())
        } else {
            anyhow::bail!("Mock response '{}' not found in options", self.response)
        }
    }
}

/// Formats a record as `branch (path)`, or `(detached abc1234) (path)`.
///
/// Locked and prunable worktrees get a `[locked]` / `[prunable]` marker before the path.
#[must_use]
pub fn format_worktree_option(record: &WorktreeRecord) -> String {
    let mut label = match record.short_branch() {
        Some(branch) => branch.to_string(),
        None if record.branch.is_empty() => {
            let short_head: String = record.head.chars().take(7).collect();
            format!("(detached {})", short_head)
        }
        None => record.branch.clone(),
    };
    if record.locked {
        label.push_str(" [locked]");
    }
    if record.prunable {
        label.push_str(" [prunable]");
    }
    format!("{} ({})", label, record.path.display())
}

/// Helper function to parse path from selection string formatted as "branch (path)"
///
/// # Errors
/// Returns an error if the selection string is not in the expected format
pub fn extract_path_from_selection(selection: &str) -> Result<PathBuf> {
    // Branch names cannot contain spaces, so the first " (" starts the path
    match selection.find(" (") {
        Some(path_start) if selection.ends_with(')') => {
            let path_str = &selection[path_start + 2..selection.len() - 1];
            Ok(PathBuf::from(path_str))
        }
        _ => anyhow::bail!("Invalid selection format: {}", selection),
    }
}
