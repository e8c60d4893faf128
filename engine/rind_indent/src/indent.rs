//! Indentation calculation.
//!
//! The column for a line comes from the scan state at the end of the line
//! before it, then from the line's own leading token:
//!
//! 1. Scan from a resume point to the newline ending the previous line. A
//!    line that starts inside a literal is [`IndentResult::Indeterminate`].
//! 2. Inside a deep bracket, align with the bracket and stop there.
//! 3. Otherwise indent one unit past the line holding the innermost opener.
//! 4. Outdent a leading `end`, closer or mid-block keyword, or add one unit
//!    when the previous code line leaves an expression unfinished.

use rind_lexer_core::{
    is_ident_continue, is_operator_char, is_special_char, keyword_at, Bracket, Classifier,
    DeepIndent, Keyword, NestEntry, SourceBuffer,
};
use tracing::debug;

use crate::{IndentConfig, IndentError};

/// Outcome of [`IndentCalculator::compute_indent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentResult {
    /// Column for the line's first non-blank character.
    Column(u32),
    /// The line starts inside a literal, so its leading whitespace is
    /// content and must not change.
    Indeterminate,
}

impl IndentResult {
    pub fn column(self) -> Option<u32> {
        match self {
            Self::Column(column) => Some(column),
            Self::Indeterminate => None,
        }
    }
}

/// Computes indentation columns for the lines of one buffer.
pub struct IndentCalculator<'a> {
    buf: &'a SourceBuffer,
    config: IndentConfig,
    classifier: Classifier<'a>,
}

impl<'a> IndentCalculator<'a> {
    pub fn new(buf: &'a SourceBuffer, config: IndentConfig) -> Self {
        Self {
            buf,
            config,
            classifier: Classifier::new(buf, config.scan_options()),
        }
    }

    /// Column that `line` should be indented to.
    pub fn compute_indent(&self, line: u32) -> Result<IndentResult, IndentError> {
        let count = self.buf.line_count();
        if line >= count {
            return Err(IndentError::LineOutOfRange { line, count });
        }
        let indent_point = self.buf.line_start(line);
        if self.buf.line_bytes(line).starts_with(b"=begin") {
            return Ok(IndentResult::Indeterminate);
        }

        let parse_start = self
            .classifier
            .resume_point(indent_point, self.config.resume);
        // Stopping before this line's first byte keeps a heredoc terminator
        // on this line inside its heredoc.
        let bound = if indent_point > parse_start {
            indent_point - 1
        } else {
            indent_point
        };
        let state = self.classifier.classify(parse_start, bound)?;
        if let Some(at) = state.in_string() {
            debug!(line, at, "line starts inside a literal");
            return Ok(IndentResult::Indeterminate);
        }

        let bytes = self.buf.as_bytes();
        let head = self.buf.indentation_end(indent_point);
        let closer = Bracket::from_close(self.buf.byte_at(head));
        let unit = i64::from(self.config.indent_unit);
        let depth = i64::from(state.depth());

        let mut column = match state.innermost() {
            Some(entry) if entry.is_anchored() => {
                return Ok(IndentResult::Column(self.anchored_column(entry, closer)));
            }
            Some(entry) if !entry.is_keyword() => self.opener_line_column(entry) + unit,
            _ if depth > 0 => {
                let Some(entry) = state.innermost() else {
                    return Err(IndentError::UnanchoredNest {
                        pos: indent_point,
                        depth: state.depth(),
                    });
                };
                if keyword_at(bytes, entry.open() as usize) == Some(Keyword::Do) {
                    self.opener_line_column(entry) + unit
                } else {
                    self.column_at(entry.open()) + unit
                }
            }
            _ => self.column_at(self.buf.indentation_end(parse_start)) + unit * depth.min(0),
        };

        let outdent = match leading_keyword(bytes, head) {
            Some(keyword) => keyword.is_mid_block() || keyword == Keyword::End,
            None => closer.is_some(),
        };
        if outdent {
            column -= unit;
        } else if self.continues_previous_line(line, parse_start)? {
            column += unit;
        }

        if column < 0 {
            debug!(line, column, "negative indentation clamped to 0");
            return Ok(IndentResult::Column(0));
        }
        Ok(IndentResult::Column(u32::try_from(column).unwrap_or(u32::MAX)))
    }

    fn column_at(&self, pos: u32) -> i64 {
        i64::from(self.buf.column(pos, self.config.tab_width))
    }

    /// Indentation of the line holding `entry`'s opener.
    fn opener_line_column(&self, entry: NestEntry) -> i64 {
        self.column_at(self.buf.indentation_end(entry.open()))
    }

    fn anchored_column(&self, entry: NestEntry, closer: Option<Bracket>) -> u32 {
        let closes = closer.is_some() && closer == entry.bracket();
        let style = entry
            .bracket()
            .and_then(|bracket| self.config.deep_indent.get(bracket))
            .unwrap_or(DeepIndent::Aligned);
        let tab_width = self.config.tab_width;
        match style {
            DeepIndent::IndentUnit => {
                let base = self
                    .buf
                    .column(self.buf.indentation_end(entry.open()), tab_width);
                if closes {
                    base
                } else {
                    base + self.config.indent_unit
                }
            }
            DeepIndent::Aligned | DeepIndent::Space if closes => {
                self.buf.column(entry.open(), tab_width)
            }
            DeepIndent::Aligned | DeepIndent::Space => self.buf.column(entry.pos(), tab_width),
        }
    }

    // ─── Continuation ───

    /// `true` if the last code line before `line` ends with an operator or
    /// a hanging keyword, outside any bracket or literal.
    fn continues_previous_line(&self, line: u32, parse_start: u32) -> Result<bool, IndentError> {
        let floor = self.buf.line_of(parse_start);
        let Some(prev) = self.buf.find_line_backward(line, floor, is_code_line) else {
            return Ok(false);
        };
        let start = self.buf.line_start(prev);
        let code_end = self.code_end(parse_start, prev)?;
        if code_end <= start {
            return Ok(false);
        }
        let state = self.classifier.classify(parse_start, code_end)?;
        if state.is_in_string() || state.innermost().is_some_and(|entry| !entry.is_keyword()) {
            return Ok(false);
        }

        let bytes = self.buf.as_bytes();
        let last = code_end - 1;
        let c = bytes[last as usize];
        if is_ident_continue(c) {
            let mut word = last;
            while word > start && is_ident_continue(bytes[word as usize - 1]) {
                word -= 1;
            }
            let sigil =
                word > start && matches!(bytes[word as usize - 1], b'.' | b':' | b'@' | b'$');
            return Ok(
                !sigil && keyword_at(bytes, word as usize).is_some_and(Keyword::is_hanging)
            );
        }
        if !is_operator_char(c) || c == b',' || is_special_char(bytes, last as usize) {
            return Ok(false);
        }
        // A `/`, `%` or `|` that ends a literal is not an operator.
        if self.classifier.classify(parse_start, last)?.is_in_string() {
            return Ok(false);
        }
        Ok(!(c == b'|' && self.closes_block_params(start, last)))
    }

    /// End of the code on `line`: before a trailing comment, without
    /// trailing blanks.
    fn code_end(&self, parse_start: u32, line: u32) -> Result<u32, IndentError> {
        let bytes = self.buf.as_bytes();
        let start = self.buf.line_start(line);
        let end = self.buf.line_end(line);
        let mut code_end = end;
        let mut from = start;
        while let Some(hash) = self.buf.find_byte(b'#', from, end) {
            if !is_special_char(bytes, hash as usize)
                && !self.classifier.classify(parse_start, hash)?.is_in_string()
            {
                code_end = hash;
                break;
            }
            from = hash + 1;
        }
        while code_end > start && matches!(bytes[code_end as usize - 1], b' ' | b'\t' | b'\r') {
            code_end -= 1;
        }
        Ok(code_end)
    }

    /// `true` if the `|` at `last` closes the parameters of a `{ |x|` or
    /// `do |x|` block.
    fn closes_block_params(&self, start: u32, last: u32) -> bool {
        let bytes = self.buf.as_bytes();
        let (start, last) = (start as usize, last as usize);
        let Some(open) = bytes[start..last].iter().rposition(|&b| b == b'|') else {
            return false;
        };
        let mut p = start + open;
        while p > start && matches!(bytes[p - 1], b' ' | b'\t') {
            p -= 1;
        }
        p == start
            || bytes[p - 1] == b'{'
            || (p >= start + 2 && keyword_at(bytes, p - 2) == Some(Keyword::Do))
    }
}

/// A line with code on it: not blank and not a whole-line comment.
fn is_code_line(line: &[u8]) -> bool {
    line.iter()
        .find(|&&b| !matches!(b, b' ' | b'\t' | b'\r'))
        .is_some_and(|&b| b != b'#')
}

/// The keyword at `head`, unless it is a method name (`end?`) or a hash
/// label (`else:`).
pub(crate) fn leading_keyword(bytes: &[u8], head: u32) -> Option<Keyword> {
    let keyword = keyword_at(bytes, head as usize)?;
    let after = (head + keyword.width()) as usize;
    match bytes.get(after) {
        Some(b'?' | b'!') => None,
        Some(b':') if bytes.get(after + 1) != Some(&b':') => None,
        _ => Some(keyword),
    }
}
