//! Configuration file sources.

pub mod dependency_keys;
pub mod global_file;
pub mod workspace_file;
