//! Splittable BGZF stream reader.
//!
//! [`BgzfReader`] decodes a BGZF stream one block at a time through two
//! instance-owned buffers: a compacting input window over the compressed
//! [`Source`] and a single-block output buffer. It can start at any byte offset:
//! on construction (and after any external seek) it resynchronizes to the next
//! valid block header, which is what allows one file to be decoded in parallel
//! by independent readers over disjoint byte ranges.
//!
//! # Usage
//!
//! ```
//! use bgzsplit_lib::reader::BgzfReader;
//! use bgzsplit_lib::testutil::build_bgzf_file;
//! use std::io::{Cursor, Read};
//!
//! let file = build_bgzf_file(b"Hello, BGZF world!", 8);
//! let mut reader = BgzfReader::new(Cursor::new(file))?;
//! let mut text = String::new();
//! reader.read_to_string(&mut text)?;
//! assert_eq!(text, "Hello, BGZF world!");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Ranges
//!
//! [`BgzfReader::with_range`] serves only the blocks whose first byte lies in
//! `[start, end)`. Readers over ranges that partition a file therefore produce,
//! concatenated in range order, exactly the decoded bytes of the whole file.

use std::io::{self, BufRead, Read};

use log::{debug, warn};

use crate::decompressor::{BlockDecompressor, OutputBuffer};
use crate::errors::{BgzfError, Result};
use crate::header::{BlockHeader, find_block_start};
use crate::input_buffer::InputBuffer;
use crate::source::Source;

/// Decodes a BGZF stream from a [`Source`] block by block.
#[derive(Debug)]
pub struct BgzfReader<S> {
    source: S,
    input: InputBuffer,
    output: OutputBuffer,
    decompressor: BlockDecompressor,
    /// Blocks starting at or after this offset are not served.
    end: u64,
    /// Offset of the block being served, or of the next block to parse.
    block_offset: u64,
    /// Set when resynchronization found no block in its window.
    exhausted: bool,
    blocks_decoded: u64,
    empty_blocks_skipped: u64,
}

impl<S: Source> BgzfReader<S> {
    /// Create a reader starting at the source's current position.
    ///
    /// The reader resynchronizes immediately, so a source positioned inside a
    /// block starts at the next block boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be positioned or read.
    pub fn new(source: S) -> Result<Self> {
        Self::build(source, u64::MAX)
    }

    /// Create a reader over the blocks that begin in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`BgzfError::InvalidParameter`] if `end < start`, or an I/O
    /// error if the source cannot be positioned or read.
    pub fn with_range(mut source: S, start: u64, end: u64) -> Result<Self> {
        if end < start {
            return Err(BgzfError::InvalidParameter {
                parameter: "end".to_string(),
                reason: format!("range end {end} is before start {start}"),
            });
        }
        source.seek_to(start)?;
        Self::build(source, end)
    }

    fn build(source: S, end: u64) -> Result<Self> {
        let mut reader = Self {
            source,
            input: InputBuffer::new(),
            output: OutputBuffer::new(),
            decompressor: BlockDecompressor::new(),
            end,
            block_offset: 0,
            exhausted: false,
            blocks_decoded: 0,
            empty_blocks_skipped: 0,
        };
        reader.resynchronize()?;
        Ok(reader)
    }

    /// Enable or disable CRC32 verification of every decoded block.
    #[must_use]
    pub fn with_crc_check(mut self, check_crc: bool) -> Self {
        self.decompressor.set_crc_check(check_crc);
        self
    }

    /// Re-align to the first valid block header at or after the source's position.
    ///
    /// Any buffered input and undelivered output is discarded. If no header
    /// parses anywhere in one input window the stream is treated as exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot report its position or be read.
    pub fn resynchronize(&mut self) -> Result<()> {
        let position = self.source.current_position()?;
        self.input.reset(position);
        self.output.clear();
        self.exhausted = false;

        self.input.fill(&mut self.source)?;
        match find_block_start(self.input.window()) {
            Some(start) => {
                self.input.set_cursor(start);
                debug!("Resynchronized from offset {position} to block at {}", position + start as u64);
            }
            None => {
                if self.input.size() == self.input.capacity() {
                    warn!(
                        "No BGZF block header found in {} bytes after offset {position}; treating as end of input",
                        self.input.size()
                    );
                }
                self.input.set_cursor(self.input.size());
                self.exhausted = true;
            }
        }
        self.block_offset = self.input.absolute_cursor();
        Ok(())
    }

    /// Seek the source to `position` and resynchronize from there.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be positioned or read.
    pub fn seek_and_resynchronize(&mut self, position: u64) -> Result<()> {
        self.source.seek_to(position)?;
        self.resynchronize()
    }

    /// Read decoded bytes into `buf`, returning the count or `0` at end of input.
    ///
    /// A single call never spans blocks; it returns at most the rest of the
    /// current block's payload.
    ///
    /// # Errors
    ///
    /// Returns a format error for malformed blocks, or the source's I/O error.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.output.is_exhausted() && !self.decompress_next_block()? {
            return Ok(0);
        }
        Ok(self.output.copy_to(buf))
    }

    /// Read a single decoded byte, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Same as [`BgzfReader::read`].
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        let n = BgzfReader::read(self, &mut byte)?;
        Ok((n == 1).then_some(byte[0]))
    }

    /// Decode the next non-empty block into the output buffer.
    ///
    /// Returns `false` at end of input: the source is exhausted, the next
    /// block starts outside the reader's range, or resynchronization failed.
    /// Empty blocks are skipped in a loop so a long run of them uses constant
    /// stack and memory.
    fn decompress_next_block(&mut self) -> Result<bool> {
        self.output.clear();
        loop {
            if self.exhausted {
                return Ok(false);
            }
            self.input.fill(&mut self.source)?;
            if self.input.available() == 0 {
                return Ok(false);
            }

            let offset = self.input.absolute_cursor();
            self.block_offset = offset;
            if offset >= self.end {
                return Ok(false);
            }

            let header = BlockHeader::parse(self.input.window(), self.input.cursor(), self.input.size())
                .map_err(|kind| BgzfError::format(offset, kind))?;

            if header.is_empty() {
                self.input.advance(header.block_size());
                self.empty_blocks_skipped += 1;
                continue;
            }

            let block = &self.input.unread()[..header.block_size()];
            self.decompressor
                .decompress(block, &header, &mut self.output)
                .map_err(|kind| BgzfError::format(offset, kind))?;
            self.input.advance(header.block_size());
            self.blocks_decoded += 1;
            return Ok(true);
        }
    }

    /// Stream offset of the start of the buffered input window.
    ///
    /// This is the offset a caller uses for split bookkeeping; it is not
    /// necessarily the offset of the block currently being served.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.input.absolute_start()
    }

    /// Stream offset of the block being served, or of the next block to decode.
    #[must_use]
    pub fn block_position(&self) -> u64 {
        self.block_offset
    }

    /// Exclusive end of the range of block start offsets this reader serves.
    #[must_use]
    pub fn range_end(&self) -> u64 {
        self.end
    }

    /// Number of non-empty blocks decoded so far.
    #[must_use]
    pub fn blocks_decoded(&self) -> u64 {
        self.blocks_decoded
    }

    /// Number of empty (ISIZE = 0) blocks skipped so far.
    #[must_use]
    pub fn empty_blocks_skipped(&self) -> u64 {
        self.empty_blocks_skipped
    }

    /// Borrow the underlying source.
    #[must_use]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: Source> Read for BgzfReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        BgzfReader::read(self, buf).map_err(io::Error::from)
    }
}

impl<S: Source> BufRead for BgzfReader<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.output.is_exhausted() {
            self.decompress_next_block().map_err(io::Error::from)?;
        }
        Ok(self.output.remaining())
    }

    fn consume(&mut self, amt: usize) {
        self.output.consume(amt);
    }
}

// ============================================================================
// Tests
// ============================================================================
