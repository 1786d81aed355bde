//! Error path integration tests.
//!
//! These tests verify that malformed files surface as format errors carrying
//! the offset of the offending block, and that I/O errors keep their kind.

use bgzsplit_lib::testutil::{build_block, build_raw_block};
use bgzsplit_lib::{BGZF_EOF, BgzfError, BgzfReader, FormatErrorKind, HeaderFormat};
use std::fs::File;
use std::io::{ErrorKind, Read};
use tempfile::TempDir;

fn write_file(dir: &TempDir, bytes: &[u8]) -> File {
    let path = dir.path().join("input.bgz");
    std::fs::write(&path, bytes).unwrap();
    File::open(path).unwrap()
}

/// Decode until the first error, returning the bytes read before it.
fn read_until_error(reader: &mut BgzfReader<File>) -> (Vec<u8>, BgzfError) {
    let mut out = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => panic!("expected an error before end of input"),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) => return (out, e),
        }
    }
}

#[test]
fn test_truncated_file_reports_offset() {
    let dir = TempDir::new().unwrap();
    let first = build_block(b"complete block");
    let second = build_block(b"this block is cut short");
    let mut bytes = first.clone();
    bytes.extend_from_slice(&second[..second.len() - 5]);

    let mut reader = BgzfReader::new(write_file(&dir, &bytes)).unwrap();
    let (decoded, err) = read_until_error(&mut reader);
    assert_eq!(decoded, b"complete block");
    match err {
        BgzfError::Format { offset, kind } => {
            assert_eq!(offset, first.len() as u64);
            assert!(matches!(kind, FormatErrorKind::Header(HeaderFormat::BlockPastWindow { .. })));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_garbage_between_blocks() {
    let dir = TempDir::new().unwrap();
    let mut bytes = build_block(b"before");
    bytes.extend_from_slice(b"not a gzip header at all, just noise");
    bytes.extend_from_slice(&build_block(b"after"));

    let mut reader = BgzfReader::new(write_file(&dir, &bytes)).unwrap();
    let (decoded, err) = read_until_error(&mut reader);
    assert_eq!(decoded, b"before");
    assert!(matches!(
        err.format_kind(),
        Some(FormatErrorKind::Header(HeaderFormat::BadMagic(b'n', b'o', b't')))
    ));
}

#[test]
fn test_corrupt_deflate_data() {
    let dir = TempDir::new().unwrap();
    let mut bytes = build_raw_block(&[0xff; 16], 0, 100);
    bytes.extend_from_slice(&BGZF_EOF);

    let mut reader = BgzfReader::new(write_file(&dir, &bytes)).unwrap();
    let (_, err) = read_until_error(&mut reader);
    assert_eq!(err.format_kind(), Some(FormatErrorKind::CorruptDeflate));
}

#[test]
fn test_format_error_through_io_read() {
    let dir = TempDir::new().unwrap();
    // A valid first block anchors the reader so the corrupt header is reached while decoding.
    let mut bytes = build_block(b"leading block");
    let mut bad = build_block(b"payload");
    let last = bad.len() - 1;
    bad[last] = 0xff;
    bytes.extend_from_slice(&bad);

    let mut reader = BgzfReader::new(write_file(&dir, &bytes)).unwrap();
    let mut out = Vec::new();
    let err = reader.read_to_end(&mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert!(err.to_string().contains("payload size"));
    assert_eq!(out, b"leading block");
}

#[test]
fn test_lone_corrupt_block_is_not_a_block_start() {
    let dir = TempDir::new().unwrap();
    let mut bytes = build_block(b"payload");
    let last = bytes.len() - 1;
    bytes[last] = 0xff;

    // No header in the file validates, so resynchronization finds nothing to decode.
    let mut reader = BgzfReader::new(write_file(&dir, &bytes)).unwrap();
    let mut out = Vec::new();
    assert_eq!(reader.read_to_end(&mut out).unwrap(), 0);
    assert_eq!(reader.block_position(), bytes.len() as u64);
}

#[test]
fn test_empty_file_is_eof() {
    let dir = TempDir::new().unwrap();
    let mut reader = BgzfReader::new(write_file(&dir, &[])).unwrap();
    assert_eq!(reader.read_byte().unwrap(), None);
}

#[test]
fn test_eof_marker_only() {
    let dir = TempDir::new().unwrap();
    let mut reader = BgzfReader::new(write_file(&dir, &BGZF_EOF)).unwrap();
    let mut out = Vec::new();
    assert_eq!(reader.read_to_end(&mut out).unwrap(), 0);
    assert_eq!(reader.empty_blocks_skipped(), 1);
}
