//! The [`Command`] trait behind `bgzsplit decompress`, `blocks` and `splits`.
//!
//! `main` parses arguments into a `Subcommand` enum whose variants are the
//! command structs; `enum_dispatch` forwards [`Command::execute`] to the chosen one.

use anyhow::Result;
use enum_dispatch::enum_dispatch;

/// A bgzsplit subcommand: validates its own arguments, opens its input, and
/// writes decoded bytes or a TSV report.
#[enum_dispatch]
pub trait Command {
    /// Run the command. `command_line` is the full invocation, logged at debug level.
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self, command_line: &str) -> Result<()>;
}
