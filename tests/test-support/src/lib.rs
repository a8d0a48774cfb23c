//! Test support utilities for clove integration tests
//!
//! This crate provides a throwaway repository with a bare `origin` remote and
//! helpers for running the `clove` binary against it. Not published.

pub mod test_env;

pub use test_env::CliTestEnvironment;
