//! List the block layout of a BGZF file.
//!
//! Headers are parsed without decompressing, so this is fast even for large files.

use anyhow::{Context, Result};
use bgzsplit_lib::BlockWalker;
use bgzsplit_lib::logging::{OperationTimer, format_bytes, format_count};
use clap::Parser;
use log::{debug, info};
use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::{create_output, open_input};

/// List BGZF blocks as tab-separated rows.
#[derive(Debug, Parser)]
#[command(
    name = "blocks",
    about = "\x1b[38;5;173m[INSPECT]\x1b[0m        \x1b[36mList the blocks of a BGZF file\x1b[0m",
    long_about = r#"
List every block of a BGZF file, empty blocks included.

Writes a tab-separated table with the columns offset, block_size and
payload_size. With --start, listing begins at the first block boundary at or
after that offset.

EXAMPLES:

  bgzsplit blocks -i calls.vcf.gz | head
"#
)]
pub struct Blocks {
    /// Input BGZF file.
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output file; stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Compressed offset to start listing from.
    #[arg(long = "start", default_value_t = 0)]
    pub start: u64,
}

impl Command for Blocks {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        let (mut file, _) = open_input(&self.input)?;
        file.seek(SeekFrom::Start(self.start))
            .with_context(|| format!("Failed to seek to offset {}", self.start))?;

        let timer = OperationTimer::new(&format!("Listing blocks of {}", self.input.display()));
        let mut writer = create_output(self.output.as_deref())?;
        writeln!(writer, "offset\tblock_size\tpayload_size")?;

        let mut blocks = 0u64;
        let mut empty = 0u64;
        let mut payload = 0u64;
        for block in BlockWalker::new(file)? {
            let block = block.context("Failed to read block header")?;
            writeln!(writer, "{}\t{}\t{}", block.offset, block.block_size, block.payload_size)?;
            blocks += 1;
            if block.is_empty() {
                empty += 1;
            }
            payload += block.payload_size as u64;
        }
        writer.flush().context("Failed to flush output")?;

        info!(
            "Found {} blocks ({} empty) holding {} of payload",
            format_count(blocks),
            format_count(empty),
            format_bytes(payload)
        );
        timer.log_completion(payload);
        Ok(())
    }
}
