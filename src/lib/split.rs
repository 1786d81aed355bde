//! Dividing a compressed byte range into disjoint splits.
//!
//! A split is a half-open range `[start, end)` of compressed offsets. A reader
//! built with [`BgzfReader::with_range`](crate::reader::BgzfReader::with_range)
//! over a split serves exactly the blocks that begin inside it, so splits that
//! tile a file can be decoded independently and concatenated in order.

use crate::errors::{BgzfError, Result};

/// A half-open range of compressed byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRange {
    /// First offset belonging to the split.
    pub start: u64,
    /// First offset past the split.
    pub end: u64,
}

impl SplitRange {
    /// Length of the split in compressed bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// True if the split covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Divide `[start, end)` into `count` contiguous splits of near-equal length.
///
/// Splits that would be empty (more splits than bytes) are omitted.
///
/// # Errors
///
/// Returns [`BgzfError::InvalidParameter`] if `count` is zero or `end < start`.
pub fn plan_splits(start: u64, end: u64, count: usize) -> Result<Vec<SplitRange>> {
    if count == 0 {
        return Err(BgzfError::InvalidParameter {
            parameter: "count".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    check_bounds(start, end)?;

    let total = u128::from(end - start);
    let n = count as u128;
    let splits = (0..n)
        .map(|i| SplitRange {
            start: start + u64::try_from(total * i / n).unwrap_or(u64::MAX),
            end: start + u64::try_from(total * (i + 1) / n).unwrap_or(u64::MAX),
        })
        .filter(|split| !split.is_empty())
        .collect();
    Ok(splits)
}

/// Divide `[start, end)` into contiguous splits of `split_size` bytes (the last may be shorter).
///
/// # Errors
///
/// Returns [`BgzfError::InvalidParameter`] if `split_size` is zero or `end < start`.
pub fn plan_splits_by_size(start: u64, end: u64, split_size: u64) -> Result<Vec<SplitRange>> {
    if split_size == 0 {
        return Err(BgzfError::InvalidParameter {
            parameter: "split_size".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    check_bounds(start, end)?;

    let mut splits = Vec::new();
    let mut split_start = start;
    while split_start < end {
        let split_end = split_start.saturating_add(split_size).min(end);
        splits.push(SplitRange { start: split_start, end: split_end });
        split_start = split_end;
    }
    Ok(splits)
}

fn check_bounds(start: u64, end: u64) -> Result<()> {
    if end < start {
        return Err(BgzfError::InvalidParameter {
            parameter: "end".to_string(),
            reason: format!("range end {end} is before start {start}"),
        });
    }
    Ok(())
}
