//! The `column` command: the computed indentation of one line.

use rind_indent::{IndentCalculator, IndentResult};
use rind_lexer_core::SourceBuffer;

use super::{check_line, read_file};
use crate::{CliError, CommandOptions};

pub fn show_column(options: &CommandOptions) -> Result<(), CliError> {
    let path = options.positional(0, "file path")?;
    let line = options.line(1)?;
    let buf = SourceBuffer::new(&read_file(path)?);
    check_line(&buf, line)?;

    match IndentCalculator::new(&buf, options.config).compute_indent(line)? {
        IndentResult::Column(column) => println!("{column}"),
        IndentResult::Indeterminate => println!("indeterminate"),
    }
    Ok(())
}
