//! The byte source a BGZF reader pulls compressed data from.
//!
//! A reader needs three things from its input: reposition, fill-style reads
//! that may come up short, and the current absolute offset. Anything that is
//! `Read + Seek` already provides them.

use std::io::{self, Read, Seek, SeekFrom};

/// A seekable source of compressed bytes.
pub trait Source {
    /// Reposition the source so the next read starts at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be repositioned.
    fn seek_to(&mut self, position: u64) -> io::Result<()>;

    /// Read up to `buf.len()` bytes, returning `Ok(0)` at end of input.
    ///
    /// Short reads are allowed.
    ///
    /// # Errors
    ///
    /// Returns any error reported by the source.
    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// The absolute offset of the next byte to be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the position cannot be determined.
    fn current_position(&mut self) -> io::Result<u64>;
}

impl<T: Read + Seek> Source for T {
    fn seek_to(&mut self, position: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(position)).map(|_| ())
    }

    fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    fn current_position(&mut self) -> io::Result<u64> {
        self.stream_position()
    }
}
