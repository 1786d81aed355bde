//! Input validation utilities
//!
//! Common checks for command-line parameters and input files, reported through
//! [`BgzfError`] so every command produces the same style of message.

use std::path::Path;

use crate::errors::{BgzfError, Result};

/// Validate that a file exists and is a regular file
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Input BGZF")
///
/// # Errors
/// Returns an error if the path does not exist or is a directory
///
/// # Example
/// ```
/// use bgzsplit_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.bgz", "Input BGZF");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    let reason = if !path_ref.exists() {
        "File does not exist"
    } else if path_ref.is_dir() {
        "Path is a directory"
    } else {
        return Ok(());
    };
    Err(BgzfError::InvalidInput {
        description: description.to_string(),
        path: path_ref.display().to_string(),
        reason: reason.to_string(),
    })
}

/// Validate that a count parameter is at least 1
///
/// # Errors
/// Returns an error if `value` is zero
///
/// # Example
/// ```
/// use bgzsplit_lib::validation::validate_positive;
///
/// assert!(validate_positive(4, "threads").is_ok());
/// assert!(validate_positive(0, "threads").is_err());
/// ```
pub fn validate_positive(value: u64, name: &str) -> Result<()> {
    if value == 0 {
        return Err(BgzfError::InvalidParameter {
            parameter: name.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Validate an optional `[start, end)` byte range against a file length
///
/// A missing `end` means the end of the file; an `end` past the file is clamped.
///
/// # Returns
/// The effective end offset
///
/// # Errors
/// Returns an error if `start` is past the end of the range
pub fn validate_byte_range(start: u64, end: Option<u64>, file_len: u64) -> Result<u64> {
    let end = end.map_or(file_len, |e| e.min(file_len));
    if start > end {
        return Err(BgzfError::InvalidParameter {
            parameter: "start".to_string(),
            reason: format!("start offset {start} is past the range end {end}"),
        });
    }
    Ok(end)
}
