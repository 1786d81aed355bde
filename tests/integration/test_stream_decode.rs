//! End-to-end decoding of on-disk BGZF files through `BgzfReader`.

use bgzsplit_lib::BgzfReader;
use bgzsplit_lib::testutil::block_offsets;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufRead, Read, Seek, SeekFrom};
use tempfile::TempDir;

use crate::helpers::{random_text, write_bgzf};

#[test]
fn test_decode_file_to_end() {
    let dir = TempDir::new().unwrap();
    let data = random_text(300_000, 1);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 65_536);

    let mut reader = BgzfReader::new(File::open(&path).unwrap()).unwrap();
    let mut decoded = Vec::new();
    reader.read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded, data);
    assert_eq!(reader.blocks_decoded(), 5);
    assert_eq!(reader.empty_blocks_skipped(), 1);
}

#[test]
fn test_lines_match_source_text() {
    let dir = TempDir::new().unwrap();
    let data = random_text(80_000, 2);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 7_000);

    let reader = BgzfReader::new(File::open(&path).unwrap()).unwrap();
    let lines: Vec<Vec<u8>> = reader.split(b'\n').map(|l| l.unwrap()).collect();
    let expected: Vec<Vec<u8>> = data.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
    // `split` yields no trailing empty segment when the data ends with a newline.
    let expected_len = if data.ends_with(b"\n") { expected.len() - 1 } else { expected.len() };
    assert_eq!(lines, expected[..expected_len]);
}

#[test]
fn test_read_byte_matches_bulk_read() {
    let dir = TempDir::new().unwrap();
    let data = random_text(20_000, 3);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 3_333);

    let mut reader = BgzfReader::new(File::open(&path).unwrap()).unwrap();
    let mut bytes = Vec::new();
    while let Some(b) = reader.read_byte().unwrap() {
        bytes.push(b);
    }
    assert_eq!(bytes, data);
}

#[test]
fn test_resynchronize_from_random_offsets() {
    let dir = TempDir::new().unwrap();
    let data = random_text(100_000, 4);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 9_000);
    let file_bytes = std::fs::read(&path).unwrap();
    let offsets: Vec<u64> = block_offsets(&file_bytes).into_iter().map(|o| o as u64).collect();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let position = rng.random_range(0..file_bytes.len() as u64);
        let mut file = File::open(&path).unwrap();
        file.seek(SeekFrom::Start(position)).unwrap();
        let reader = BgzfReader::new(file).unwrap();
        // Past the last block start the reader is exhausted at end of file.
        let expected =
            offsets.iter().copied().find(|&o| o >= position).unwrap_or(file_bytes.len() as u64);
        assert_eq!(reader.block_position(), expected, "resynchronizing from {position}");
    }
}

#[test]
fn test_seek_and_resynchronize_restarts_decoding() {
    let dir = TempDir::new().unwrap();
    let data = random_text(30_000, 5);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 10_000);
    let offsets = block_offsets(&std::fs::read(&path).unwrap());

    let mut reader = BgzfReader::new(File::open(&path).unwrap()).unwrap();
    let mut head = vec![0u8; 100];
    reader.read_exact(&mut head).unwrap();
    assert_eq!(head, data[..100]);

    reader.seek_and_resynchronize(offsets[1] as u64 - 5).unwrap();
    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, data[10_000..]);
}
