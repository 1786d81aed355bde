#![deny(unsafe_code)]
// Clippy lint configuration for CI
// These lints are allowed because:
// - cast_*: offsets move between usize window indices and u64 stream positions
// - missing_panics_doc: internal invariants are asserted rather than documented per call
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # bgzsplit - splittable BGZF decoding
//!
//! BGZF (Blocked GZIP Format) files are a series of independent gzip members,
//! each at most 64 KiB, that together form a valid gzip stream. Because every
//! block header records its own length, a decoder dropped at an arbitrary byte
//! offset can scan forward to the next block boundary and start decoding there.
//! This library provides that decoder.
//!
//! ## Overview
//!
//! - **[`header`]** - block header parsing and validation, boundary search
//! - **[`input_buffer`]** - compacting fixed-size window over the compressed input
//! - **[`decompressor`]** - per-block DEFLATE decoding (libdeflater) into a reusable buffer
//! - **[`reader`]** - [`BgzfReader`], the resynchronizing byte-stream reader
//! - **[`blocks`]** - block layout listing without decompression
//! - **[`split`]** - dividing a file into ranges for independent readers
//! - **[`source`]** - the seekable input abstraction
//!
//! ### Utilities
//!
//! - **[`errors`]** - error types
//! - **[`logging`]** - formatting helpers for log output
//! - **[`validation`]** - parameter and input file checks
//! - **[`testutil`]** - BGZF block builders for tests and benchmarks
//!
//! ## Quick Start
//!
//! ### Decoding a whole file
//!
//! ```no_run
//! use bgzsplit_lib::BgzfReader;
//! use std::fs::File;
//! use std::io::{self, BufWriter};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut reader = BgzfReader::new(File::open("input.vcf.gz")?)?;
//! let mut out = BufWriter::new(io::stdout().lock());
//! io::copy(&mut reader, &mut out)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Decoding a file in parallel
//!
//! ```no_run
//! use bgzsplit_lib::BgzfReader;
//! use bgzsplit_lib::split::plan_splits;
//! use std::fs::File;
//! use std::io::Read;
//!
//! # fn main() -> anyhow::Result<()> {
//! let len = std::fs::metadata("input.vcf.gz")?.len();
//! let mut decoded = Vec::new();
//! for split in plan_splits(0, len, 4)? {
//!     // Each split can be handed to its own thread.
//!     let mut reader = BgzfReader::with_range(File::open("input.vcf.gz")?, split.start, split.end)?;
//!     reader.read_to_end(&mut decoded)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod blocks;
pub mod decompressor;
pub mod errors;
pub mod header;
pub mod input_buffer;
pub mod logging;
pub mod reader;
pub mod source;
pub mod split;
pub mod testutil;
pub mod validation;

pub use blocks::{BlockInfo, BlockWalker};
pub use errors::{BgzfError, FormatErrorKind, HeaderFormat, Result};
pub use header::{BGZF_EOF, BlockHeader, MAX_BLOCK_SIZE, MAX_PAYLOAD_SIZE};
pub use reader::BgzfReader;
pub use source::Source;
pub use split::{SplitRange, plan_splits, plan_splits_by_size};
