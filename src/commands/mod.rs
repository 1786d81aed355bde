//! CLI command implementations for bgzsplit.
//!
//! - [`decompress`] - Decode a BGZF file or byte range, optionally in parallel
//! - [`blocks`] - List the block layout of a BGZF file
//! - [`splits`] - Show where independent readers over N ranges would start

#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

pub mod blocks;
pub mod command;
pub mod common;
pub mod decompress;
pub mod splits;
