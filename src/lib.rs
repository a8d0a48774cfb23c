//! # Clove
//!
//! A small CLI for creating and removing git worktrees next to the main checkout.
//!
//! ## Features
//!
//! - **Sibling Directories** - New worktrees land beside the repository as `<repo>-<branch>`
//! - **Smart Branch Strategy** - Reuses a local branch, tracks a remote one, or branches from the remote default
//! - **Dependency Cache Copy** - Copies `node_modules` (and other configured caches) into fresh worktrees
//! - **Dry Run** - Prints the exact git commands without touching the repository
//! - **Safe Branch Names** - Sanitizes branch names with slashes and special characters
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a worktree for a branch (local, remote, or new from origin's default)
//! clove add feature/auth
//!
//! # See what would happen first
//! clove add feature/auth --dry-run
//!
//! # Remove by path or by branch name
//! clove rm feature/auth
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - Command implementations (add, list, prune, remove, completions)
//! - [`config`] - Layered `config.toml` / `.clove.toml` settings
//! - [`error`] - Typed failures and non-fatal advisories
//! - [`git`] - Git process executor and repository discovery via git2
//! - [`naming`] - Branch sanitization, directory naming, and shell quoting
//! - [`selection`] - Abstracts interactive selection prompts for testability
//! - [`session`] - Per-invocation context handed to every command
//! - [`traits`] - Defines the `GitExecutor` trait for testability and abstraction
//! - [`worktree`] - Worktree records and the porcelain listing parser

pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod naming;
pub mod selection;
pub mod session;
pub mod traits;
pub mod worktree;

pub use anyhow::Result;
