//! Helper utilities for integration tests.

pub mod bgzf_files;

pub use bgzf_files::*;
