//! Integration tests for the decompress command.

use bgzsplit_lib::testutil::block_offsets;
use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{random_text, run_bgzsplit, write_bgzf};

#[rstest]
#[case("1")]
#[case("4")]
fn test_decompress_to_file(#[case] threads: &str) {
    let temp_dir = TempDir::new().unwrap();
    let data = random_text(200_000, 21);
    let input = write_bgzf(temp_dir.path(), "input.bgz", &data, 10_000);
    let output = temp_dir.path().join("output.txt");

    let result = run_bgzsplit(&[
        "decompress",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--threads",
        threads,
        "--split-size",
        "20000",
    ]);
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(std::fs::read(&output).unwrap(), data);
}

#[test]
fn test_decompress_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let data = random_text(50_000, 22);
    let input = write_bgzf(temp_dir.path(), "input.bgz", &data, 8_000);

    let result = run_bgzsplit(&["decompress", "-i", input.to_str().unwrap(), "--check-crc"]);
    assert!(result.status.success());
    assert_eq!(result.stdout, data);
}

#[test]
fn test_decompress_ranges_concatenate() {
    let temp_dir = TempDir::new().unwrap();
    let data = random_text(60_000, 23);
    let input = write_bgzf(temp_dir.path(), "input.bgz", &data, 6_000);
    let cut = (block_offsets(&std::fs::read(&input).unwrap())[4] + 17).to_string();

    let head = run_bgzsplit(&["decompress", "-i", input.to_str().unwrap(), "--end", &cut]);
    let tail = run_bgzsplit(&["decompress", "-i", input.to_str().unwrap(), "--start", &cut]);
    assert!(head.status.success() && tail.status.success());
    assert_eq!(head.stdout, data[..30_000]);
    assert_eq!([head.stdout, tail.stdout].concat(), data);
}

#[test]
fn test_decompress_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.bgz");
    let result = run_bgzsplit(&["decompress", "-i", missing.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("does not exist"));
}

#[test]
fn test_decompress_start_past_end_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_bgzf(temp_dir.path(), "input.bgz", b"small", 100);
    let result = run_bgzsplit(&[
        "decompress",
        "-i",
        input.to_str().unwrap(),
        "--start",
        "20",
        "--end",
        "10",
    ]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("start"));
}
