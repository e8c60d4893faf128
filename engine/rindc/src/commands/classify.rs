//! The `classify` command: dump the scan state at the start of a line.

use rind_indent::IndentError;
use rind_lexer_core::{Classifier, SourceBuffer};

use super::{check_line, read_file};
use crate::{CliError, CommandOptions};

pub fn classify_line(options: &CommandOptions) -> Result<(), CliError> {
    let path = options.positional(0, "file path")?;
    let line = options.line(1)?;
    let buf = SourceBuffer::new(&read_file(path)?);
    check_line(&buf, line)?;

    let config = options.config;
    let classifier = Classifier::new(&buf, config.scan_options());
    let target = buf.line_start(line);
    let start = classifier.resume_point(target, config.resume);
    let state = classifier
        .classify(start, target)
        .map_err(IndentError::from)?;

    let at = |pos: u32| {
        format!(
            "{}:{}",
            buf.line_of(pos) + 1,
            buf.column(pos, config.tab_width)
        )
    };
    println!("resume:    {}", at(start));
    match state.in_string() {
        Some(pos) => println!("literal:   open since {}", at(pos)),
        None => println!("literal:   none"),
    }
    println!("depth:     {}", state.depth());
    for entry in state.nest() {
        let kind = match entry.bracket() {
            Some(bracket) => char::from(bracket.open()).to_string(),
            None => String::from_utf8_lossy(buf.bytes_between(entry.open(), entry.pos()))
                .into_owned(),
        };
        let anchored = if entry.is_anchored() { " (anchored)" } else { "" };
        println!("open:      {kind} at {}{anchored}", at(entry.open()));
    }
    for anchor in state.anchors() {
        println!(
            "anchor:    {} (outer depth {})",
            at(anchor.pos()),
            anchor.depth()
        );
    }
    Ok(())
}
