//! BGZF fixtures written to disk for integration tests.

#![allow(dead_code)]

use bgzsplit_lib::testutil::build_bgzf_file;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Random text-like data: lines of bases with occasional tabs.
pub fn random_text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| match rng.random_range(0..40) {
            0 => b'\n',
            1 => b'\t',
            n => b"ACGTN"[n % 5],
        })
        .collect()
}

/// Write `data` as a BGZF file with `block_payload` bytes per block.
pub fn write_bgzf(dir: &Path, name: &str, data: &[u8], block_payload: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_bgzf_file(data, block_payload)).expect("Failed to write BGZF file");
    path
}

/// Run the bgzsplit binary with `args`.
pub fn run_bgzsplit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bgzsplit"))
        .args(args)
        .output()
        .expect("Failed to run bgzsplit")
}
