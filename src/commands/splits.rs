//! Show how a BGZF file divides among independent readers.
//!
//! For each of N near-equal compressed ranges, reports where a reader over the
//! range resynchronizes to, how many blocks it owns and how much payload they hold.

use anyhow::{Context, Result};
use bgzsplit_lib::BlockWalker;
use bgzsplit_lib::logging::format_count;
use bgzsplit_lib::split::{SplitRange, plan_splits};
use bgzsplit_lib::validation::validate_positive;
use clap::Parser;
use log::{debug, info};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::{create_output, open_input};

/// Plan N splits of a BGZF file and report their block boundaries.
#[derive(Debug, Parser)]
#[command(
    name = "splits",
    about = "\x1b[38;5;173m[INSPECT]\x1b[0m        \x1b[36mPlan parallel decoding ranges\x1b[0m",
    long_about = r#"
Divide a BGZF file into N near-equal compressed byte ranges and report, for
each, the first block a reader over that range would decode.

Writes a tab-separated table with the columns start, end, first_block, blocks
and payload_bytes. A range that holds no block start reports first_block as "-".

EXAMPLES:

  bgzsplit splits -i calls.vcf.gz -n 8
"#
)]
pub struct Splits {
    /// Input BGZF file.
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output file; stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Number of splits.
    #[arg(short = 'n', long = "num-splits", default_value_t = 4)]
    pub num_splits: usize,
}

/// Blocks owned by one split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplitSummary {
    first_block: Option<u64>,
    blocks: u64,
    payload_bytes: u64,
}

impl Command for Splits {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        validate_positive(self.num_splits as u64, "num-splits")?;
        let (mut file, file_len) = open_input(&self.input)?;
        let splits = plan_splits(0, file_len, self.num_splits)?;

        let mut writer = create_output(self.output.as_deref())?;
        writeln!(writer, "start\tend\tfirst_block\tblocks\tpayload_bytes")?;
        let mut empty_splits = 0usize;
        for split in &splits {
            let summary = summarize_split(&mut file, *split)?;
            let first = summary.first_block.map_or_else(|| "-".to_string(), |o| o.to_string());
            if summary.first_block.is_none() {
                empty_splits += 1;
            }
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                split.start, split.end, first, summary.blocks, summary.payload_bytes
            )?;
        }
        writer.flush().context("Failed to flush output")?;

        info!(
            "Planned {} splits of {} ({} without a block start)",
            format_count(splits.len() as u64),
            self.input.display(),
            format_count(empty_splits as u64)
        );
        Ok(())
    }
}

/// Walk the blocks whose first byte lies inside `split`.
fn summarize_split(file: &mut File, split: SplitRange) -> Result<SplitSummary> {
    file.seek(SeekFrom::Start(split.start))
        .with_context(|| format!("Failed to seek to offset {}", split.start))?;
    let mut summary = SplitSummary { first_block: None, blocks: 0, payload_bytes: 0 };
    for block in BlockWalker::new(&mut *file)? {
        let block = block.with_context(|| {
            format!("Failed to read block header in split [{}, {})", split.start, split.end)
        })?;
        if block.offset >= split.end {
            break;
        }
        summary.first_block.get_or_insert(block.offset);
        summary.blocks += 1;
        summary.payload_bytes += block.payload_size as u64;
    }
    Ok(summary)
}
