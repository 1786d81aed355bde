//! Block-level walking without decompression.
//!
//! [`BlockWalker`] yields the offset and sizes of every block (empty blocks
//! included) by parsing headers only. It is the cheap way to list a file's
//! block layout or to count how much payload a range holds.

use crate::errors::{BgzfError, Result};
use crate::header::{BlockHeader, find_block_start};
use crate::input_buffer::InputBuffer;
use crate::source::Source;

/// Location and sizes of one BGZF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Absolute offset of the block's first byte.
    pub offset: u64,
    /// Total compressed size, header and footer included.
    pub block_size: usize,
    /// Uncompressed payload size (ISIZE).
    pub payload_size: usize,
}

impl BlockInfo {
    /// True for an empty (ISIZE = 0) block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload_size == 0
    }

    /// Offset one past the block's last byte.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.offset + self.block_size as u64
    }
}

/// Iterates over block headers from a [`Source`].
///
/// Like the reader, the walker resynchronizes on creation, so it may start at
/// any offset. Iteration stops at end of input or after the first error.
pub struct BlockWalker<S> {
    source: S,
    input: InputBuffer,
    done: bool,
}

impl<S: Source> BlockWalker<S> {
    /// Create a walker starting at the first block at or after the source's position.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot report its position or be read.
    pub fn new(mut source: S) -> Result<Self> {
        let mut input = InputBuffer::new();
        input.reset(source.current_position()?);
        input.fill(&mut source)?;
        let done = match find_block_start(input.window()) {
            Some(start) => {
                input.set_cursor(start);
                false
            }
            None => true,
        };
        Ok(Self { source, input, done })
    }

    /// Parse the next block header and step over the block.
    ///
    /// # Errors
    ///
    /// Returns a format error for a malformed header or an I/O error from the source.
    pub fn next_block(&mut self) -> Result<Option<BlockInfo>> {
        if self.done {
            return Ok(None);
        }
        self.input.fill(&mut self.source)?;
        if self.input.available() == 0 {
            self.done = true;
            return Ok(None);
        }

        let offset = self.input.absolute_cursor();
        let header = BlockHeader::parse(self.input.window(), self.input.cursor(), self.input.size())
            .map_err(|kind| BgzfError::format(offset, kind))?;
        self.input.advance(header.block_size());
        Ok(Some(BlockInfo {
            offset,
            block_size: header.block_size(),
            payload_size: header.payload_size(),
        }))
    }
}

impl<S: Source> Iterator for BlockWalker<S> {
    type Item = Result<BlockInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_block() {
            Ok(Some(info)) => Some(Ok(info)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
