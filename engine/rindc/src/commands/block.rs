//! The `block` command: block navigation from a line.

use rind_indent::{BlockNavigator, Direction};
use rind_lexer_core::SourceBuffer;

use super::{check_line, read_file};
use crate::{CliError, CommandOptions};

/// Print where a block move from `line` lands, as `line:column` with a
/// 1-based line and a 0-based column.
pub fn move_block(options: &CommandOptions) -> Result<(), CliError> {
    let path = options.positional(0, "file path")?;
    let line = options.line(1)?;
    let buf = SourceBuffer::new(&read_file(path)?);
    check_line(&buf, line)?;

    let direction = if options.backward {
        Direction::Backward
    } else {
        Direction::Forward
    };
    let boundary = BlockNavigator::new(&buf, options.config).move_to_block(
        buf.line_start(line),
        direction,
        options.count,
    );
    println!(
        "{}:{}",
        boundary.line + 1,
        buf.column(boundary.pos, options.config.tab_width)
    );
    Ok(())
}
