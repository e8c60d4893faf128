//! The `indent` command: reindent a whole file.

use rind_indent::reindent;
use tracing::debug;

use super::{read_file, write_file};
use crate::{CliError, CommandOptions};

/// Print the reindented file, or rewrite it in place with `--write`.
pub fn indent_file(options: &CommandOptions) -> Result<(), CliError> {
    let path = options.positional(0, "file path")?;
    let source = read_file(path)?;
    let out = reindent(&source, &options.config);
    debug!(
        path,
        changed = out.changed.len(),
        skipped = out.skipped.len(),
        "reindented"
    );

    for line in &out.skipped {
        eprintln!("{path}:{}: indentation could not be computed", line + 1);
    }
    if !options.write {
        print!("{}", out.text);
        return Ok(());
    }
    if !out.changed.is_empty() {
        write_file(path, &out.text)?;
    }
    eprintln!("{path}: {} line(s) reindented", out.changed.len());
    Ok(())
}
