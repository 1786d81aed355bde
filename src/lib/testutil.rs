//! Helpers for building BGZF test data.
//!
//! These produce well-formed (or deliberately tweaked) BGZF blocks using
//! libdeflater and crc32fast. Used only in tests and benchmarks.

use libdeflater::{CompressionLvl, Compressor};

use crate::header::{
    BGZF_EOF, BGZF_FOOTER_SIZE, BGZF_HEADER_SIZE, FLAG_FCOMMENT, FLAG_FHCRC, FLAG_FNAME,
    GZIP_FIXED_HEADER_SIZE, MAX_BLOCK_SIZE,
};

/// Build a standard BGZF block (single `BC` subfield) holding `payload`.
///
/// # Panics
///
/// Panics if the compressed block would exceed the maximum block size.
#[must_use]
pub fn build_block(payload: &[u8]) -> Vec<u8> {
    build_block_with_subfields(payload, &[(*b"BC", Vec::new())])
}

/// Build a BGZF block whose extra field holds `subfields` in order.
///
/// A `BC` subfield with empty data is filled in with the real `BSIZE`; any
/// other subfield (including a `BC` with explicit data) is written verbatim.
///
/// # Panics
///
/// Panics if the compressed block would exceed the maximum block size.
#[must_use]
pub fn build_block_with_subfields(payload: &[u8], subfields: &[([u8; 2], Vec<u8>)]) -> Vec<u8> {
    let compressed = deflate(payload);
    let extra_len: usize = subfields
        .iter()
        .map(|(id, data)| 4 + if is_bsize_placeholder(id, data) { 2 } else { data.len() })
        .sum();
    let block_size = GZIP_FIXED_HEADER_SIZE + extra_len + compressed.len() + BGZF_FOOTER_SIZE;
    assert!(block_size <= MAX_BLOCK_SIZE, "block of {block_size} bytes exceeds BGZF maximum");
    let bsize = u16::try_from(block_size - 1).expect("block size checked above");
    let xlen = u16::try_from(extra_len).expect("extra field fits in u16");

    let mut block = Vec::with_capacity(block_size);
    block.extend_from_slice(&[0x1f, 0x8b, 0x08, 0x04, 0, 0, 0, 0, 0, 0xff]);
    block.extend_from_slice(&xlen.to_le_bytes());
    for (id, data) in subfields {
        block.extend_from_slice(id);
        if is_bsize_placeholder(id, data) {
            block.extend_from_slice(&2u16.to_le_bytes());
            block.extend_from_slice(&bsize.to_le_bytes());
        } else {
            let slen = u16::try_from(data.len()).expect("subfield fits in u16");
            block.extend_from_slice(&slen.to_le_bytes());
            block.extend_from_slice(data);
        }
    }
    block.extend_from_slice(&compressed);
    block.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    block.extend_from_slice(&payload_len(payload).to_le_bytes());
    block
}

/// Build a standard 18-byte-header block around arbitrary deflate bytes.
///
/// # Panics
///
/// Panics if the block would exceed the maximum block size.
#[must_use]
pub fn build_raw_block(compressed: &[u8], crc32: u32, payload_size: u32) -> Vec<u8> {
    let block_size = 18 + compressed.len() + BGZF_FOOTER_SIZE;
    assert!(block_size <= MAX_BLOCK_SIZE, "block of {block_size} bytes exceeds BGZF maximum");
    let bsize = u16::try_from(block_size - 1).expect("block size checked above");

    let mut block = Vec::with_capacity(block_size);
    block.extend_from_slice(&[0x1f, 0x8b, 0x08, 0x04, 0, 0, 0, 0, 0, 0xff, 6, 0, b'B', b'C', 2, 0]);
    block.extend_from_slice(&bsize.to_le_bytes());
    block.extend_from_slice(compressed);
    block.extend_from_slice(&crc32.to_le_bytes());
    block.extend_from_slice(&payload_size.to_le_bytes());
    block
}

/// Copy a standard 18-byte-header `block`, adding FNAME, FCOMMENT and FHCRC fields.
///
/// The flag byte and `BSIZE` are updated to match. The header CRC16 is written
/// as zeros since readers do not check it.
///
/// # Panics
///
/// Panics if the result would exceed the maximum block size.
#[must_use]
pub fn with_optional_fields(
    block: &[u8],
    name: Option<&[u8]>,
    comment: Option<&[u8]>,
    header_crc: bool,
) -> Vec<u8> {
    let mut fields = Vec::new();
    let mut flags = block[3];
    if let Some(name) = name {
        fields.extend_from_slice(name);
        fields.push(0);
        flags |= FLAG_FNAME;
    }
    if let Some(comment) = comment {
        fields.extend_from_slice(comment);
        fields.push(0);
        flags |= FLAG_FCOMMENT;
    }
    if header_crc {
        fields.extend_from_slice(&[0, 0]);
        flags |= FLAG_FHCRC;
    }

    let block_size = block.len() + fields.len();
    assert!(block_size <= MAX_BLOCK_SIZE, "block of {block_size} bytes exceeds BGZF maximum");
    let bsize = u16::try_from(block_size - 1).expect("block size checked above");

    let mut out = Vec::with_capacity(block_size);
    out.extend_from_slice(&block[..BGZF_HEADER_SIZE]);
    out[3] = flags;
    out[16..18].copy_from_slice(&bsize.to_le_bytes());
    out.extend_from_slice(&fields);
    out.extend_from_slice(&block[BGZF_HEADER_SIZE..]);
    out
}

/// Concatenate one block per payload. Empty payloads become empty blocks.
#[must_use]
pub fn build_stream(payloads: &[&[u8]]) -> Vec<u8> {
    payloads.iter().flat_map(|p| build_block(p)).collect()
}

/// Split `data` into blocks of at most `block_payload` bytes and append the EOF marker.
///
/// # Panics
///
/// Panics if `block_payload` is zero or a chunk does not compress into one block.
#[must_use]
pub fn build_bgzf_file(data: &[u8], block_payload: usize) -> Vec<u8> {
    let mut out: Vec<u8> = data.chunks(block_payload).flat_map(build_block).collect();
    out.extend_from_slice(&BGZF_EOF);
    out
}

/// Offsets at which each block of `stream` begins, found by walking `BSIZE` fields.
///
/// # Panics
///
/// Panics if `stream` is not a sequence of standard 18-byte-header blocks.
#[must_use]
pub fn block_offsets(stream: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut offset = 0;
    while offset < stream.len() {
        offsets.push(offset);
        let bsize = u16::from_le_bytes([stream[offset + 16], stream[offset + 17]]);
        offset += usize::from(bsize) + 1;
    }
    offsets
}

/// Deterministic, moderately compressible payload of `len` bytes.
#[must_use]
pub fn sample_payload(len: usize, seed: u8) -> Vec<u8> {
    const BASES: &[u8; 4] = b"ACGT";
    (0..len)
        .map(|i| {
            let k = i.wrapping_mul(31).wrapping_add(usize::from(seed)) / 7;
            if i % 61 == 60 { b'\n' } else { BASES[k % 4] }
        })
        .collect()
}

fn is_bsize_placeholder(id: &[u8; 2], data: &[u8]) -> bool {
    id == b"BC" && data.is_empty()
}

fn payload_len(payload: &[u8]) -> u32 {
    u32::try_from(payload.len()).expect("payload fits in u32")
}

fn deflate(payload: &[u8]) -> Vec<u8> {
    let mut compressor = Compressor::new(CompressionLvl::default());
    let mut out = vec![0u8; compressor.deflate_compress_bound(payload.len())];
    let n = compressor.deflate_compress(payload, &mut out).expect("deflate into bounded buffer");
    out.truncate(n);
    out
}
