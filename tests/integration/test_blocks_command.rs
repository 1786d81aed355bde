//! Integration tests for the blocks and splits commands.

use bgzsplit_lib::testutil::block_offsets;
use tempfile::TempDir;

use crate::helpers::{random_text, run_bgzsplit, write_bgzf};

#[test]
fn test_blocks_lists_every_block() {
    let temp_dir = TempDir::new().unwrap();
    let data = random_text(25_000, 31);
    let input = write_bgzf(temp_dir.path(), "input.bgz", &data, 10_000);
    let offsets = block_offsets(&std::fs::read(&input).unwrap());

    let result = run_bgzsplit(&["blocks", "-i", input.to_str().unwrap()]);
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    let rows: Vec<Vec<&str>> = stdout.lines().skip(1).map(|l| l.split('\t').collect()).collect();

    assert_eq!(rows.len(), offsets.len());
    for (row, offset) in rows.iter().zip(&offsets) {
        assert_eq!(row[0], offset.to_string());
    }
    let payloads: Vec<&str> = rows.iter().map(|r| r[2]).collect();
    assert_eq!(payloads, vec!["10000", "10000", "5000", "0"]);
}

#[test]
fn test_splits_report_block_starts() {
    let temp_dir = TempDir::new().unwrap();
    let data = random_text(100_000, 32);
    let input = write_bgzf(temp_dir.path(), "input.bgz", &data, 4_000);
    let offsets = block_offsets(&std::fs::read(&input).unwrap());

    let result = run_bgzsplit(&["splits", "-i", input.to_str().unwrap(), "-n", "6"]);
    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next().unwrap(), "start\tend\tfirst_block\tblocks\tpayload_bytes");

    let mut total_blocks = 0usize;
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        let start: usize = fields[0].parse().unwrap();
        let first: usize = fields[2].parse().unwrap();
        assert_eq!(first, *offsets.iter().find(|&&o| o >= start).unwrap());
        total_blocks += fields[3].parse::<usize>().unwrap();
    }
    assert_eq!(total_blocks, offsets.len());
}

#[test]
fn test_splits_rejects_zero() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_bgzf(temp_dir.path(), "input.bgz", b"data", 10);
    let result = run_bgzsplit(&["splits", "-i", input.to_str().unwrap(), "-n", "0"]);
    assert!(!result.status.success());
}
