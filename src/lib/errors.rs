//! Custom error types for BGZF decoding.

use std::io;

use thiserror::Error;

/// Result type alias for bgzsplit operations
pub type Result<T> = std::result::Result<T, BgzfError>;

/// The ways a BGZF block header can fail validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFormat {
    /// Fewer than the minimum header bytes remain in the window
    #[error("truncated header: {available} bytes available, at least {required} required")]
    Truncated {
        /// Bytes available between the offset and the window limit
        available: usize,
        /// Minimum number of bytes required
        required: usize,
    },

    /// ID1, ID2 or CM is not the gzip/deflate signature
    #[error("invalid magic: expected 1f 8b 08, got {0:02x} {1:02x} {2:02x}")]
    BadMagic(u8, u8, u8),

    /// FLG does not have FEXTRA set
    #[error("missing FEXTRA flag (FLG = 0x{0:02x})")]
    MissingExtraFlag(u8),

    /// XLEN is below 6 or the extra field runs past the window
    #[error("invalid extra field length {0}")]
    BadExtraLength(usize),

    /// A subfield header or body runs past the window
    #[error("extra subfield at byte {0} overflows the window")]
    SubfieldOverflow(usize),

    /// The BC subfield was found with SLEN other than 2
    #[error("BC subfield has length {0}, expected 2")]
    BadBcLength(usize),

    /// Subfields did not consume exactly XLEN bytes
    #[error("extra subfields consumed {consumed} bytes but XLEN is {xlen}")]
    ExtraLengthMismatch {
        /// Bytes actually walked by the subfield scan
        consumed: usize,
        /// Declared XLEN
        xlen: usize,
    },

    /// No BC subfield in the extra field
    #[error("missing BC subfield")]
    MissingBcSubfield,

    /// BSIZE + 1 exceeds the maximum block size
    #[error("block size {0} exceeds maximum of 65536")]
    BlockTooLarge(usize),

    /// The block cannot hold its own header and trailer
    #[error("block size {block_size} is smaller than header plus trailer ({minimum})")]
    BlockTooSmall {
        /// Decoded block size
        block_size: usize,
        /// Header length plus the 8-byte trailer
        minimum: usize,
    },

    /// The block's trailer lies beyond the window
    #[error("block size {block_size} extends past the {available} bytes available")]
    BlockPastWindow {
        /// Decoded block size
        block_size: usize,
        /// Bytes available between the offset and the window limit
        available: usize,
    },

    /// FNAME, FCOMMENT or FHCRC runs into the block footer
    #[error("optional header field at byte {0} runs past the block's data")]
    OptionalFieldOverflow(usize),

    /// ISIZE exceeds the maximum payload size
    #[error("payload size {0} exceeds maximum of 65536")]
    PayloadTooLarge(u32),
}

/// The ways a BGZF stream can be malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// Malformed block header
    #[error(transparent)]
    Header(#[from] HeaderFormat),

    /// The DEFLATE data ended before ISIZE bytes were produced
    #[error("payload underflow: decompressed {actual} bytes, expected {expected}")]
    PayloadUnderflow {
        /// ISIZE from the trailer
        expected: usize,
        /// Bytes actually produced
        actual: usize,
    },

    /// The DEFLATE data expands past the output buffer
    #[error("payload overflow: decompresses to more than {capacity} bytes")]
    PayloadOverflow {
        /// Capacity of the output buffer
        capacity: usize,
    },

    /// The DEFLATE data could not be decoded
    #[error("corrupt DEFLATE data")]
    CorruptDeflate,

    /// CRC32 of the payload does not match the trailer
    #[error("CRC32 mismatch: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch {
        /// CRC32 from the trailer
        expected: u32,
        /// CRC32 of the decompressed payload
        actual: u32,
    },
}

/// Error type for bgzsplit operations
#[derive(Error, Debug)]
pub enum BgzfError {
    /// Malformed BGZF data at a compressed-stream offset
    #[error("Invalid BGZF data at offset {offset}: {kind}")]
    Format {
        /// Absolute offset of the offending block in the compressed stream
        offset: u64,
        /// What was wrong
        kind: FormatErrorKind,
    },

    /// Failure of the underlying source
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// Input file problem detected before decoding
    #[error("Invalid {description} '{path}': {reason}")]
    InvalidInput {
        /// Human-readable description of the file
        description: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },
}

impl BgzfError {
    /// Build a format error for the block at `offset`.
    pub fn format(offset: u64, kind: impl Into<FormatErrorKind>) -> Self {
        Self::Format { offset, kind: kind.into() }
    }

    /// True for malformed-data errors, false for I/O and parameter errors.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// The format error kind, if this is a format error.
    #[must_use]
    pub fn format_kind(&self) -> Option<FormatErrorKind> {
        match self {
            Self::Format { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<BgzfError> for io::Error {
    fn from(error: BgzfError) -> Self {
        match error {
            BgzfError::Io(e) => e,
            e if e.is_format() => io::Error::new(io::ErrorKind::InvalidData, e),
            e => io::Error::new(io::ErrorKind::InvalidInput, e),
        }
    }
}
