//! Shared helpers for command implementations.

use anyhow::{Context, Result};
use bgzsplit_lib::validation::validate_file_exists;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;

/// Output buffer size for decoded data.
pub const OUTPUT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Open a BGZF input file, returning it with its length in bytes.
pub fn open_input(path: &Path) -> Result<(File, u64)> {
    validate_file_exists(path, "Input BGZF")?;
    let file =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .len();
    Ok((file, len))
}

/// Create a buffered writer to `path`, or to stdout when no path is given.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            Ok(Box::new(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file)))
        }
        None => Ok(Box::new(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, stdout().lock()))),
    }
}

/// Build a rayon thread pool with exactly `threads` workers.
pub fn build_thread_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("bgzsplit-decode-{i}"))
        .build()
        .context("Failed to build thread pool")
}
