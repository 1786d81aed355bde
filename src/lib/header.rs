//! BGZF block header parsing and validation.
//!
//! Every BGZF block is a complete gzip member whose header carries a `BC` extra
//! subfield holding the total block size. The layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Fixed gzip header (12 bytes)                                    │
//! │  - Magic: 0x1f 0x8b, Method: 0x08, Flags: FEXTRA (0x04) set     │
//! │  - MTIME (4), XFL (1), OS (1), XLEN (2, little-endian)          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Extra subfields (XLEN bytes)                                    │
//! │  - each: SI1 SI2 SLEN(2) data[SLEN]                             │
//! │  - exactly one "BC" subfield, SLEN = 2, data = BSIZE            │
//! │    where BSIZE = total_block_size - 1                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Optional FNAME, FCOMMENT (zero-terminated), FHCRC (2), per FLG  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Compressed data (deflate)                                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Footer (8 bytes): CRC32 (4), ISIZE (4, little-endian)           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing never reads past the `limit` of the window it is given, which is what
//! lets the resynchronization scan try every candidate offset in a partially
//! filled buffer.

use crate::errors::HeaderFormat;

// ============================================================================
// Constants
// ============================================================================

/// Maximum total size of a BGZF block, header and footer included.
pub const MAX_BLOCK_SIZE: usize = 64 * 1024;

/// Maximum uncompressed payload of a single block.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// gzip ID1, ID2 and CM (deflate).
pub const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

/// FLG bit indicating a header CRC16 follows the other optional fields.
pub const FLAG_FHCRC: u8 = 0x02;

/// FLG bit indicating an extra field is present.
pub const FLAG_FEXTRA: u8 = 0x04;

/// FLG bit indicating a zero-terminated file name follows the extra field.
pub const FLAG_FNAME: u8 = 0x08;

/// FLG bit indicating a zero-terminated comment follows the file name.
pub const FLAG_FCOMMENT: u8 = 0x10;

/// Length of the fixed gzip header preceding the extra field.
pub const GZIP_FIXED_HEADER_SIZE: usize = 12;

/// Size of a standard BGZF header (fixed header + a lone 6-byte BC subfield).
pub const BGZF_HEADER_SIZE: usize = 18;

/// Size of the block footer (CRC32 + ISIZE).
pub const BGZF_FOOTER_SIZE: usize = 8;

/// Minimum bytes that must be in the window before a header is considered.
pub const MIN_HEADER_WINDOW: usize = 26;

/// BGZF EOF marker block (empty block signaling end of file).
pub const BGZF_EOF: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x06, 0x00, 0x42, 0x43, 0x02, 0x00,
    0x1b, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const MIN_EXTRA_LEN: usize = 6;
const SUBFIELD_HEADER_SIZE: usize = 4;
const BC_SUBFIELD_ID: [u8; 2] = [b'B', b'C'];
const BC_SUBFIELD_LEN: usize = 2;

// ============================================================================
// Header
// ============================================================================

/// A validated BGZF block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    block_size: usize,
    payload_size: usize,
    header_size: usize,
}

impl BlockHeader {
    /// Parse and validate the block header starting at `buf[offset]`.
    ///
    /// Only bytes in `buf[offset..limit]` are considered; the whole block,
    /// trailer included, must lie inside that window.
    ///
    /// # Errors
    ///
    /// Returns the [`HeaderFormat`] describing the first check that failed.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is greater than `buf.len()`.
    pub fn parse(buf: &[u8], offset: usize, limit: usize) -> Result<Self, HeaderFormat> {
        let window = &buf[..limit];
        let available = limit.saturating_sub(offset);
        if available < MIN_HEADER_WINDOW {
            return Err(HeaderFormat::Truncated { available, required: MIN_HEADER_WINDOW });
        }

        let header = &window[offset..];
        if header[..3] != GZIP_MAGIC {
            return Err(HeaderFormat::BadMagic(header[0], header[1], header[2]));
        }

        let flags = header[3];
        if flags & FLAG_FEXTRA == 0 {
            return Err(HeaderFormat::MissingExtraFlag(flags));
        }

        let xlen = usize::from(u16::from_le_bytes([header[10], header[11]]));
        if xlen < MIN_EXTRA_LEN || GZIP_FIXED_HEADER_SIZE + xlen > available {
            return Err(HeaderFormat::BadExtraLength(xlen));
        }

        let block_size = scan_extra_subfields(header, xlen)?;
        if block_size > MAX_BLOCK_SIZE {
            return Err(HeaderFormat::BlockTooLarge(block_size));
        }

        let header_size = GZIP_FIXED_HEADER_SIZE + xlen;
        let minimum = header_size + BGZF_FOOTER_SIZE;
        if block_size < minimum {
            return Err(HeaderFormat::BlockTooSmall { block_size, minimum });
        }
        if block_size > available {
            return Err(HeaderFormat::BlockPastWindow { block_size, available });
        }
        let header_size =
            skip_optional_fields(header, flags, header_size, block_size - BGZF_FOOTER_SIZE)?;

        let isize_at = block_size - 4;
        let payload_size = u32::from_le_bytes([
            header[isize_at],
            header[isize_at + 1],
            header[isize_at + 2],
            header[isize_at + 3],
        ]);
        if payload_size as usize > MAX_PAYLOAD_SIZE {
            return Err(HeaderFormat::PayloadTooLarge(payload_size));
        }

        Ok(Self { block_size, payload_size: payload_size as usize, header_size })
    }

    /// Total size of the block, header and footer included.
    #[must_use]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Uncompressed size of the block's payload (ISIZE).
    #[must_use]
    pub fn payload_size(&self) -> usize {
        self.payload_size
    }

    /// Length of the gzip header, optional fields included, i.e. the offset of
    /// the deflate data in the block.
    #[must_use]
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// True for an empty (ISIZE = 0) marker block such as the EOF block.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload_size == 0
    }

    /// The byte range of the deflate data relative to the start of the block.
    #[must_use]
    pub fn compressed_range(&self) -> std::ops::Range<usize> {
        self.header_size..self.block_size - BGZF_FOOTER_SIZE
    }
}

/// Walk the extra subfields of `header` and return `BSIZE + 1` from the BC subfield.
///
/// `header` starts at ID1 and extends to the end of the window.
fn scan_extra_subfields(header: &[u8], xlen: usize) -> Result<usize, HeaderFormat> {
    let extra_end = GZIP_FIXED_HEADER_SIZE + xlen;
    let mut block_size = None;
    let mut i = GZIP_FIXED_HEADER_SIZE;

    while i < extra_end {
        if i + SUBFIELD_HEADER_SIZE > header.len() {
            return Err(HeaderFormat::SubfieldOverflow(i));
        }
        let slen = usize::from(u16::from_le_bytes([header[i + 2], header[i + 3]]));
        if i + SUBFIELD_HEADER_SIZE + slen > header.len() {
            return Err(HeaderFormat::SubfieldOverflow(i));
        }

        if header[i..i + 2] == BC_SUBFIELD_ID {
            if slen != BC_SUBFIELD_LEN {
                return Err(HeaderFormat::BadBcLength(slen));
            }
            let bsize = u16::from_le_bytes([header[i + 4], header[i + 5]]);
            block_size = Some(usize::from(bsize) + 1);
        }

        i += SUBFIELD_HEADER_SIZE + slen;
    }

    if i != extra_end {
        return Err(HeaderFormat::ExtraLengthMismatch {
            consumed: i - GZIP_FIXED_HEADER_SIZE,
            xlen,
        });
    }

    block_size.ok_or(HeaderFormat::MissingBcSubfield)
}

/// Step over the FNAME, FCOMMENT and FHCRC fields that `flags` announces.
///
/// The fields start at `start` and must end by `data_end`, the start of the
/// block footer. Returns the offset of the deflate data.
fn skip_optional_fields(
    header: &[u8],
    flags: u8,
    start: usize,
    data_end: usize,
) -> Result<usize, HeaderFormat> {
    let mut pos = start;
    for flag in [FLAG_FNAME, FLAG_FCOMMENT] {
        if flags & flag != 0 {
            let terminator = header[pos..data_end]
                .iter()
                .position(|&b| b == 0)
                .ok_or(HeaderFormat::OptionalFieldOverflow(pos))?;
            pos += terminator + 1;
        }
    }
    if flags & FLAG_FHCRC != 0 {
        if pos + 2 > data_end {
            return Err(HeaderFormat::OptionalFieldOverflow(pos));
        }
        pos += 2;
    }
    Ok(pos)
}

/// Find the first offset in `window` at which a complete, valid block header parses.
///
/// Only offsets starting with the gzip magic `1f 8b` are tried. Returns `None`
/// when no candidate in the window parses.
#[must_use]
pub fn find_block_start(window: &[u8]) -> Option<usize> {
    let limit = window.len();
    (0..limit.saturating_sub(1)).find(|&i| {
        window[i] == GZIP_MAGIC[0]
            && window[i + 1] == GZIP_MAGIC[1]
            && BlockHeader::parse(window, i, limit).is_ok()
    })
}

// ============================================================================
// Tests
// ============================================================================
