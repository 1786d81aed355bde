//! Fixed-capacity window over the compressed input.
//!
//! The window holds twice the maximum block size so that, after compaction,
//! a full block plus lookahead is always resident when the source has it.

use std::io::{self, ErrorKind};

use crate::header::MAX_BLOCK_SIZE;
use crate::source::Source;

/// Capacity of the input window.
pub const INPUT_BUFFER_CAPACITY: usize = 2 * MAX_BLOCK_SIZE;

/// A compacting byte window over a [`Source`].
///
/// Bytes `[cursor, size)` are unread. `absolute_start` is the offset in the
/// compressed stream of `data[0]`.
#[derive(Debug)]
pub struct InputBuffer {
    data: Box<[u8]>,
    size: usize,
    cursor: usize,
    absolute_start: u64,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuffer {
    /// Create an empty window of [`INPUT_BUFFER_CAPACITY`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INPUT_BUFFER_CAPACITY)
    }

    /// Create an empty window with a custom capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: vec![0u8; capacity].into_boxed_slice(), size: 0, cursor: 0, absolute_start: 0 }
    }

    /// Discard all buffered bytes and restart the window at `absolute_start`.
    pub fn reset(&mut self, absolute_start: u64) {
        self.size = 0;
        self.cursor = 0;
        self.absolute_start = absolute_start;
    }

    /// Compact unread bytes to the front and top up from `source`.
    ///
    /// Reads until the window is full or the source reports end of input.
    /// Returns the number of bytes appended.
    ///
    /// # Errors
    ///
    /// Propagates any I/O error from the source other than `Interrupted`.
    pub fn fill<S: Source + ?Sized>(&mut self, source: &mut S) -> io::Result<usize> {
        let unread = self.size - self.cursor;
        self.data.copy_within(self.cursor..self.size, 0);
        self.absolute_start += self.cursor as u64;
        self.size = unread;
        self.cursor = 0;

        let mut appended = 0;
        while self.size < self.data.len() {
            match source.read_into(&mut self.data[self.size..]) {
                Ok(0) => break,
                Ok(n) => {
                    self.size += n;
                    appended += n;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(appended)
    }

    /// All valid bytes in the window, `data[0..size]`.
    #[must_use]
    pub fn window(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Unread bytes, `data[cursor..size]`.
    #[must_use]
    pub fn unread(&self) -> &[u8] {
        &self.data[self.cursor..self.size]
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn available(&self) -> usize {
        self.size - self.cursor
    }

    /// Number of valid bytes in the window.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the next unread byte.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of bytes the window holds.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Stream offset of the first byte in the window.
    #[must_use]
    pub fn absolute_start(&self) -> u64 {
        self.absolute_start
    }

    /// Stream offset of the next unread byte.
    #[must_use]
    pub fn absolute_cursor(&self) -> u64 {
        self.absolute_start + self.cursor as u64
    }

    /// Move the cursor to `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is past the end of the valid bytes.
    pub fn set_cursor(&mut self, cursor: usize) {
        assert!(cursor <= self.size, "cursor {cursor} beyond window size {}", self.size);
        self.cursor = cursor;
    }

    /// Mark `n` more bytes as read.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` bytes are unread.
    pub fn advance(&mut self, n: usize) {
        self.set_cursor(self.cursor + n);
    }
}
