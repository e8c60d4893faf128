//! The `check` command: report misindented lines.

use rind_indent::reindent;
use rind_lexer_core::SourceBuffer;

use super::read_file;
use crate::{CliError, CommandOptions};

/// List every line whose indentation differs from the computed one.
///
/// Returns `true` if the file is already correctly indented.
pub fn check_file(options: &CommandOptions) -> Result<bool, CliError> {
    let path = options.positional(0, "file path")?;
    let source = read_file(path)?;
    let config = &options.config;
    let out = reindent(&source, config);

    let before = SourceBuffer::new(&source);
    let after = SourceBuffer::new(&out.text);
    let column = |buf: &SourceBuffer, line: u32| {
        buf.column(buf.indentation_end(buf.line_start(line)), config.tab_width)
    };
    for &line in &out.changed {
        println!(
            "{path}:{}: expected column {}, found {}",
            line + 1,
            column(&after, line),
            column(&before, line)
        );
    }
    Ok(out.changed.is_empty())
}
