//! Decode a BGZF file, or a compressed byte range of one.
//!
//! With one thread the range is streamed through a single [`BgzfReader`]. With
//! more, the range is cut into fixed-size splits, each decoded by its own
//! reader on a rayon pool, and the results are written in split order.

use anyhow::{Context, Result};
use bgzsplit_lib::BgzfReader;
use bgzsplit_lib::logging::{OperationTimer, format_bytes, format_count};
use bgzsplit_lib::split::{SplitRange, plan_splits_by_size};
use bgzsplit_lib::validation::{validate_byte_range, validate_positive};
use clap::Parser;
use log::{debug, info};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::commands::command::Command;
use crate::commands::common::{build_thread_pool, create_output, open_input};

/// Decode a BGZF file to plain bytes.
#[derive(Debug, Parser)]
#[command(
    name = "decompress",
    about = "\x1b[38;5;72m[DECODE]\x1b[0m         \x1b[36mDecompress a BGZF file or byte range\x1b[0m",
    long_about = r#"
Decompress a BGZF file, or the blocks that begin inside a compressed byte range.

The reader resynchronizes to the first block boundary at or after --start, and
stops before the first block that begins at or after --end. Ranges that tile a
file therefore decode to pieces that concatenate to the whole output.

EXAMPLES:

  # Decompress a whole file to stdout
  bgzsplit decompress -i calls.vcf.gz > calls.vcf

  # Decompress with 8 threads
  bgzsplit decompress -i calls.vcf.gz -o calls.vcf --threads 8

  # Decompress the blocks starting in the first 10 MB
  bgzsplit decompress -i calls.vcf.gz --end 10000000
"#
)]
pub struct Decompress {
    /// Input BGZF file.
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output file; stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// First compressed offset of the range to decode.
    #[arg(long = "start", default_value_t = 0)]
    pub start: u64,

    /// Compressed offset one past the range to decode; end of file if omitted.
    #[arg(long = "end")]
    pub end: Option<u64>,

    /// Number of decoding threads.
    #[arg(short = '@', short_alias = 't', long = "threads", default_value_t = 1)]
    pub threads: usize,

    /// Compressed bytes per split when decoding with multiple threads.
    #[arg(long = "split-size", default_value_t = 4 * 1024 * 1024)]
    pub split_size: u64,

    /// Verify the CRC32 of every decoded block.
    #[arg(long = "check-crc", default_value_t = false)]
    pub check_crc: bool,
}

impl Command for Decompress {
    fn execute(&self, command_line: &str) -> Result<()> {
        debug!("Command line: {command_line}");
        validate_positive(self.threads as u64, "threads")?;
        validate_positive(self.split_size, "split-size")?;
        let (file, file_len) = open_input(&self.input)?;
        let end = validate_byte_range(self.start, self.end, file_len)?;

        info!("Input: {}", self.input.display());
        info!(
            "Output: {}",
            self.output.as_ref().map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
        );
        info!("Range: [{}, {}) of {}", self.start, end, format_bytes(file_len));
        info!("Threads: {}", self.threads);
        info!("CRC check: {}", if self.check_crc { "enabled" } else { "disabled" });

        let timer = OperationTimer::new(&format!("Decompressing {}", self.input.display()));
        let mut writer = create_output(self.output.as_deref())?;

        let written = if self.threads == 1 {
            self.decode_sequential(file, end, &mut writer)?
        } else {
            drop(file);
            self.decode_parallel(end, &mut writer)?
        };
        writer.flush().context("Failed to flush output")?;

        timer.log_completion(written);
        Ok(())
    }
}

impl Decompress {
    fn decode_sequential(&self, file: File, end: u64, writer: &mut dyn Write) -> Result<u64> {
        let mut reader =
            BgzfReader::with_range(file, self.start, end)?.with_crc_check(self.check_crc);
        let written = io::copy(&mut reader, writer).context("Failed to decompress input")?;
        info!(
            "Decoded {} blocks ({} empty blocks skipped)",
            format_count(reader.blocks_decoded()),
            format_count(reader.empty_blocks_skipped())
        );
        Ok(written)
    }

    fn decode_parallel(&self, end: u64, writer: &mut dyn Write) -> Result<u64> {
        let splits = plan_splits_by_size(self.start, end, self.split_size)?;
        info!("Decoding {} splits of up to {}", splits.len(), format_bytes(self.split_size));

        let pool = build_thread_pool(self.threads)?;
        let mut written = 0u64;
        for batch in splits.chunks(self.threads) {
            let decoded: Vec<Vec<u8>> = pool.install(|| {
                batch
                    .par_iter()
                    .map(|split| decode_split(&self.input, *split, self.check_crc))
                    .collect::<Result<Vec<_>>>()
            })?;
            for bytes in decoded {
                writer.write_all(&bytes).context("Failed to write output")?;
                written += bytes.len() as u64;
            }
        }
        Ok(written)
    }
}

/// Decode the blocks that begin inside one split with a dedicated reader.
fn decode_split(path: &Path, split: SplitRange, check_crc: bool) -> Result<Vec<u8>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input: {}", path.display()))?;
    let mut reader = BgzfReader::with_range(file, split.start, split.end)?.with_crc_check(check_crc);
    let mut decoded = Vec::new();
    reader
        .read_to_end(&mut decoded)
        .with_context(|| format!("Failed to decode split [{}, {})", split.start, split.end))?;
    debug!(
        "Split [{}, {}) decoded {} blocks to {}",
        split.start,
        split.end,
        reader.blocks_decoded(),
        format_bytes(decoded.len() as u64)
    );
    Ok(decoded)
}
