pub mod add;
pub mod completions;
pub mod list;
pub mod prune;
pub mod remove;
