//! Decoding a file through independent readers over disjoint ranges.

use bgzsplit_lib::split::{SplitRange, plan_splits};
use bgzsplit_lib::testutil::{build_block, build_stream};
use bgzsplit_lib::{BGZF_EOF, BgzfReader};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rstest::rstest;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

use crate::helpers::{random_text, write_bgzf};

fn decode_range(path: &Path, split: SplitRange) -> Vec<u8> {
    let file = File::open(path).unwrap();
    let mut reader = BgzfReader::with_range(file, split.start, split.end).unwrap();
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    out
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(16)]
#[case(100)]
fn test_parallel_splits_reassemble(#[case] num_splits: usize) {
    let dir = TempDir::new().unwrap();
    let data = random_text(250_000, 11);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 12_000);
    let len = std::fs::metadata(&path).unwrap().len();

    let splits = plan_splits(0, len, num_splits).unwrap();
    let pieces: Vec<Vec<u8>> = splits.par_iter().map(|s| decode_range(&path, *s)).collect();
    assert_eq!(pieces.concat(), data);
}

#[test]
fn test_random_split_points_reassemble() {
    let dir = TempDir::new().unwrap();
    let data = random_text(120_000, 12);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 5_000);
    let len = std::fs::metadata(&path).unwrap().len();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut cuts: Vec<u64> = (0..rng.random_range(1..20)).map(|_| rng.random_range(0..len)).collect();
        cuts.push(0);
        cuts.push(len);
        cuts.sort_unstable();
        cuts.dedup();

        let decoded: Vec<u8> = cuts
            .windows(2)
            .flat_map(|w| decode_range(&path, SplitRange { start: w[0], end: w[1] }))
            .collect();
        assert_eq!(decoded, data, "cuts {cuts:?}");
    }
}

#[test]
fn test_splits_with_interleaved_empty_blocks() {
    let dir = TempDir::new().unwrap();
    let mut file = Vec::new();
    let mut expected = Vec::new();
    for i in 0..200u32 {
        let payload = format!("record {i}\n");
        file.extend_from_slice(&build_block(payload.as_bytes()));
        expected.extend_from_slice(payload.as_bytes());
        for _ in 0..(i % 4) {
            file.extend_from_slice(&BGZF_EOF);
        }
    }
    file.extend_from_slice(&build_stream(&[b"", b"tail"]));
    expected.extend_from_slice(b"tail");
    let path = dir.path().join("empties.bgz");
    std::fs::write(&path, &file).unwrap();

    for num_splits in [1, 3, 17, 64] {
        let splits = plan_splits(0, file.len() as u64, num_splits).unwrap();
        let decoded: Vec<u8> = splits.iter().flat_map(|s| decode_range(&path, *s)).collect();
        assert_eq!(decoded, expected, "{num_splits} splits");
    }
}

#[test]
fn test_crc_checked_splits() {
    let dir = TempDir::new().unwrap();
    let data = random_text(40_000, 13);
    let path = write_bgzf(dir.path(), "data.bgz", &data, 4_000);
    let len = std::fs::metadata(&path).unwrap().len();

    let mut decoded = Vec::new();
    for split in plan_splits(0, len, 3).unwrap() {
        let file = File::open(&path).unwrap();
        let mut reader =
            BgzfReader::with_range(file, split.start, split.end).unwrap().with_crc_check(true);
        reader.read_to_end(&mut decoded).unwrap();
    }
    assert_eq!(decoded, data);
}
