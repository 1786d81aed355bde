//! Integration tests for bgzsplit.
//!
//! These tests exercise the library and the binary end to end on BGZF files
//! written to temporary directories.

mod helpers;
mod test_blocks_command;
mod test_decompress_command;
mod test_error_paths;
mod test_split_decode;
mod test_stream_decode;
