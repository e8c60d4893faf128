//! Applying computed indentation to source text.

use std::ops::Range;

use rind_lexer_core::{Classifier, SourceBuffer};
use tracing::debug;

use crate::{BlockNavigator, IndentCalculator, IndentConfig, IndentError, IndentResult};

/// Replacement of one line's leading whitespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineEdit {
    pub line: u32,
    /// Start of the line.
    pub start: u32,
    /// End of the old indentation.
    pub end: u32,
    /// Column the new indentation reaches.
    pub column: u32,
    pub replacement: String,
}

impl LineEdit {
    /// `source` with this edit applied.
    ///
    /// `source` must be the text the edit was computed from.
    pub fn apply(&self, source: &str) -> String {
        let (start, end) = (self.start as usize, self.end as usize);
        let mut out = String::with_capacity(source.len() + self.replacement.len());
        out.push_str(&source[..start]);
        out.push_str(&self.replacement);
        out.push_str(&source[end..]);
        out
    }

    /// Where a cursor at `pos` lands after the edit.
    ///
    /// A cursor inside the old indentation moves to the end of the new one.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "replacement is whitespace for a u32 column"
    )]
    pub fn map_cursor(&self, pos: u32) -> u32 {
        let new_end = self.start + self.replacement.len() as u32;
        if pos < self.start {
            pos
        } else if pos <= self.end {
            new_end
        } else {
            pos - self.end + new_end
        }
    }
}

/// Edit that indents `line` to its computed column.
///
/// `None` if the line is indeterminate or already correct.
pub fn indent_line(
    buf: &SourceBuffer,
    line: u32,
    config: &IndentConfig,
) -> Result<Option<LineEdit>, IndentError> {
    let IndentResult::Column(column) = IndentCalculator::new(buf, *config).compute_indent(line)?
    else {
        return Ok(None);
    };
    let start = buf.line_start(line);
    let end = buf.indentation_end(start);
    let replacement = config.indent_string(column);
    if buf.bytes_between(start, end) == replacement.as_bytes() {
        return Ok(None);
    }
    Ok(Some(LineEdit {
        line,
        start,
        end,
        column,
        replacement,
    }))
}

/// Result of reindenting a region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reindented {
    pub text: String,
    /// Lines whose indentation changed.
    pub changed: Vec<u32>,
    /// Lines left alone because their indentation could not be computed.
    pub skipped: Vec<u32>,
}

/// Reindent every line of `source`.
pub fn reindent(source: &str, config: &IndentConfig) -> Reindented {
    let count = SourceBuffer::new(source).line_count();
    reindent_lines(source, 0..count, config)
}

/// Reindent `lines` of `source`, top to bottom.
///
/// Each line is indented against the text as already rewritten above it.
/// Blank lines are left as they are.
pub fn reindent_lines(source: &str, lines: Range<u32>, config: &IndentConfig) -> Reindented {
    let mut out = Reindented {
        text: source.to_owned(),
        ..Reindented::default()
    };
    for line in lines {
        let buf = SourceBuffer::new(&out.text);
        if line >= buf.line_count() {
            break;
        }
        if buf.line_is_blank(line) {
            continue;
        }
        match indent_line(&buf, line, config) {
            Ok(Some(edit)) => {
                out.text = edit.apply(&out.text);
                out.changed.push(line);
            }
            Ok(None) => {}
            Err(err) => {
                debug!(line, %err, "line left unchanged");
                out.skipped.push(line);
            }
        }
    }
    out
}

/// Reindent `line` and, if it opens a block, every line through the one
/// that closes it.
pub fn indent_block(source: &str, line: u32, config: &IndentConfig) -> Reindented {
    let buf = SourceBuffer::new(source);
    let classifier = Classifier::new(&buf, config.scan_options());
    let last = if classifier.line_nesting(line).delta > 0 {
        BlockNavigator::new(&buf, *config)
            .end_of_block(buf.line_end(line))
            .map_or(line, |close| buf.line_of(close.saturating_sub(1)))
    } else {
        line
    };
    reindent_lines(source, line..last + 1, config)
}
