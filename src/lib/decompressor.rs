//! Block payload decompression.
//!
//! Uses libdeflater for the raw DEFLATE decoding. The output buffer and the
//! libdeflater state are allocated once and reused for every block.

use libdeflater::{DecompressionError, Decompressor};

use crate::errors::FormatErrorKind;
use crate::header::{BGZF_FOOTER_SIZE, BlockHeader, MAX_PAYLOAD_SIZE};

/// Capacity of the decompressed output buffer.
pub const OUTPUT_BUFFER_CAPACITY: usize = MAX_PAYLOAD_SIZE;

// ============================================================================
// Output buffer
// ============================================================================

/// The decompressed payload of the current block.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Box<[u8]>,
    size: usize,
    cursor: usize,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    /// Create an empty output buffer of [`OUTPUT_BUFFER_CAPACITY`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self { data: vec![0u8; OUTPUT_BUFFER_CAPACITY].into_boxed_slice(), size: 0, cursor: 0 }
    }

    /// Drop the current payload.
    pub fn clear(&mut self) {
        self.size = 0;
        self.cursor = 0;
    }

    /// True when every byte of the current payload has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.size
    }

    /// Unconsumed payload bytes.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.data[self.cursor..self.size]
    }

    /// Size of the current payload.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Mark `n` bytes as consumed, clamped to what remains.
    pub fn consume(&mut self, n: usize) {
        self.cursor = (self.cursor + n).min(self.size);
    }

    /// Copy as many unconsumed bytes as fit into `buf`, returning the count.
    pub fn copy_to(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.size - self.cursor);
        buf[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }
}

// ============================================================================
// Block decompressor
// ============================================================================

/// Decodes one block's deflate data into an [`OutputBuffer`].
pub struct BlockDecompressor {
    inflater: Decompressor,
    check_crc: bool,
}

impl Default for BlockDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockDecompressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDecompressor").field("check_crc", &self.check_crc).finish_non_exhaustive()
    }
}

impl BlockDecompressor {
    /// Create a decompressor that does not verify CRC32.
    #[must_use]
    pub fn new() -> Self {
        Self { inflater: Decompressor::new(), check_crc: false }
    }

    /// Enable or disable CRC32 verification of each payload.
    #[must_use]
    pub fn with_crc_check(mut self, check_crc: bool) -> Self {
        self.check_crc = check_crc;
        self
    }

    /// Enable or disable CRC32 verification in place.
    pub fn set_crc_check(&mut self, check_crc: bool) {
        self.check_crc = check_crc;
    }

    /// Whether CRC32 verification is enabled.
    #[must_use]
    pub fn checks_crc(&self) -> bool {
        self.check_crc
    }

    /// Decompress `block` (header + deflate data + footer) into `output`.
    ///
    /// `output` is cleared first and on success holds exactly
    /// `header.payload_size()` bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatErrorKind`] if the deflate data is corrupt, yields
    /// fewer bytes than ISIZE or more than the buffer holds, or (with CRC
    /// checking) fails the checksum. Output beyond ISIZE is discarded.
    pub fn decompress(
        &mut self,
        block: &[u8],
        header: &BlockHeader,
        output: &mut OutputBuffer,
    ) -> Result<(), FormatErrorKind> {
        output.clear();
        let expected = header.payload_size();
        let compressed = &block[header.compressed_range()];

        // Bytes decoded past ISIZE are dropped; only a short payload is an error.
        let capacity = output.data.len();
        let actual = self
            .inflater
            .deflate_decompress(compressed, &mut output.data)
            .map_err(|e| match e {
                DecompressionError::InsufficientSpace => {
                    FormatErrorKind::PayloadOverflow { capacity }
                }
                DecompressionError::BadData => FormatErrorKind::CorruptDeflate,
            })?;
        if actual < expected {
            return Err(FormatErrorKind::PayloadUnderflow { expected, actual });
        }
        output.size = expected;

        if self.check_crc {
            let footer = &block[header.block_size() - BGZF_FOOTER_SIZE..];
            let expected_crc = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
            let actual_crc = crc32fast::hash(output.remaining());
            if expected_crc != actual_crc {
                output.clear();
                return Err(FormatErrorKind::ChecksumMismatch {
                    expected: expected_crc,
                    actual: actual_crc,
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
