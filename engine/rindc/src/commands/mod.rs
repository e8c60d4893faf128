//! Command handlers for the `rind` CLI.
//!
//! Each submodule implements one command. Shared file helpers live here.

mod block;
mod check;
mod classify;
mod column;
mod indent;

pub use block::move_block;
pub use check::check_file;
pub use classify::classify_line;
pub use column::show_column;
pub use indent::indent_file;

use rind_lexer_core::SourceBuffer;

use crate::CliError;

/// Read a source file, naming the path in any error.
pub(crate) fn read_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::read(path, &e))
}

pub(crate) fn write_file(path: &str, content: &str) -> Result<(), CliError> {
    std::fs::write(path, content).map_err(|e| CliError::write(path, &e))
}

/// Reject a 0-based `line` past the end of `buf`, phrased for 1-based input.
pub(crate) fn check_line(buf: &SourceBuffer, line: u32) -> Result<(), CliError> {
    if line >= buf.line_count() {
        return Err(CliError::usage(format!(
            "line {} is past the end of the file ({} lines)",
            line + 1,
            buf.line_count()
        )));
    }
    Ok(())
}
