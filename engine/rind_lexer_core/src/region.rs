//! Region classification.
//!
//! A [`Classifier`] drives the [`Scanner`] across a byte range and returns
//! the accumulated [`ScanState`]. It also answers the questions built on top
//! of that: where scanning can safely resume before a line, how much one
//! line changes the nesting, and which lines start inside a multi-line
//! literal.

use tracing::trace;

use crate::options::{DeepIndentTable, ScanOptions};
use crate::scanner::{ScanError, ScanState, Scanner};
use crate::tag::{keyword_at, Keyword};
use crate::SourceBuffer;

/// Where [`Classifier::resume_point`] looks for a safe place to start
/// scanning.
///
/// Verifying a candidate means classifying from the buffer start, so a
/// search over many lines can cost a full scan per candidate. Hosts that
/// remember a known-good position can pass it as a [`ResumePolicy::Checkpoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResumePolicy {
    /// Always scan from the start of the buffer.
    BufferStart,
    /// The nearest preceding line that looks like the start of a statement.
    StatementStart {
        /// How many lines to walk back before giving up; `None` is no limit.
        max_lines: Option<u32>,
        /// Reject candidates that sit inside a literal.
        verify: bool,
    },
    /// A host-supplied position known to be outside any literal and
    /// nesting. Ignored when it lies after the target.
    Checkpoint(u32),
}

impl Default for ResumePolicy {
    fn default() -> Self {
        Self::StatementStart {
            max_lines: None,
            verify: true,
        }
    }
}

/// Nesting change across a single line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineNesting {
    /// Openers minus closers, brackets and block keywords alike.
    pub delta: i32,
    /// Block keywords that pushed a nest entry.
    pub opened: u32,
    /// `end` keywords.
    pub closed: u32,
}

/// `true` if `line` starts with `class`, `module` or `def` after optional
/// indentation, or with another block opener at column 0. A keyword used as
/// a hash label or method name (`class:`, `begin?`) does not count.
pub fn is_statement_start(line: &[u8]) -> bool {
    let indent = line
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    let Some(keyword) = keyword_at(line, indent) else {
        return false;
    };
    let after = indent + keyword.as_str().len();
    match line.get(after) {
        Some(b'?' | b'!') => return false,
        Some(b':') if line.get(after + 1) != Some(&b':') => return false,
        _ => {}
    }
    match keyword {
        Keyword::Class | Keyword::Module | Keyword::Def => true,
        Keyword::If
        | Keyword::Unless
        | Keyword::Case
        | Keyword::While
        | Keyword::Until
        | Keyword::For
        | Keyword::Begin => indent == 0,
        _ => false,
    }
}

/// Runs the scanner over regions of one buffer.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    buf: &'a SourceBuffer,
    options: ScanOptions,
}

impl<'a> Classifier<'a> {
    pub fn new(buf: &'a SourceBuffer, options: ScanOptions) -> Self {
        Self { buf, options }
    }

    pub fn buffer(&self) -> &'a SourceBuffer {
        self.buf
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Scan `start..end` from an empty state.
    pub fn classify(&self, start: u32, end: u32) -> Result<ScanState, ScanError> {
        classify_with(self.buf, start, end, self.options)
    }

    /// Like [`classify`](Self::classify), but stray closers only decrement
    /// the depth.
    pub fn classify_lenient(&self, start: u32, end: u32) -> ScanState {
        classify_with(self.buf, start, end, self.options.lenient()).unwrap_or_default()
    }

    /// Nesting change across `line`, scanned on its own.
    ///
    /// Brackets count as plain nesting here whatever their deep-indent
    /// style, so `foo(` opens one level just like `do`.
    pub fn line_nesting(&self, line: u32) -> LineNesting {
        let options = ScanOptions::new(DeepIndentTable::none()).lenient();
        let state = classify_with(
            self.buf,
            self.buf.line_start(line),
            self.buf.line_end(line),
            options,
        )
        .unwrap_or_default();
        LineNesting {
            delta: state.depth(),
            opened: state.keywords_opened(),
            closed: state.keywords_closed(),
        }
    }

    /// A position at or before the line of `target` from which scanning
    /// starts with an empty state.
    pub fn resume_point(&self, target: u32, policy: ResumePolicy) -> u32 {
        match policy {
            ResumePolicy::BufferStart => 0,
            ResumePolicy::StatementStart { max_lines, verify } => {
                self.statement_start(target, max_lines, verify)
            }
            ResumePolicy::Checkpoint(pos) if pos <= target => self.buf.line_start_of(pos),
            ResumePolicy::Checkpoint(_) => self.resume_point(target, ResumePolicy::default()),
        }
    }

    fn statement_start(&self, target: u32, max_lines: Option<u32>, verify: bool) -> u32 {
        let line = self.buf.line_of(target);
        let floor = max_lines.map_or(0, |n| line.saturating_sub(n));
        let mut from = line;
        while let Some(candidate) = self.buf.find_line_backward(from, floor, is_statement_start) {
            let start = self.buf.line_start(candidate);
            if !verify || !self.classify_lenient(0, start).is_in_string() {
                trace!(candidate, start, "resume point");
                return start;
            }
            trace!(candidate, "resume candidate inside a literal");
            from = candidate;
        }
        0
    }

    /// For every line, whether its start lies inside a multi-line literal
    /// (a string, a heredoc body, or an `=begin` block).
    pub fn literal_lines(&self) -> Vec<bool> {
        let options = self.options.lenient();
        let count = self.buf.line_count();
        let mut inside = vec![false; count as usize];
        let mut outside = 0;
        let mut scanner = Scanner::new(self.buf, 0, options);
        let mut state = ScanState::default();

        for (line, flag) in (0..count).zip(inside.iter_mut()).skip(1) {
            let start = self.buf.line_start(line);
            while scanner.pos() < start {
                state = scanner.advance(start, state).unwrap_or_default();
            }
            if state.is_in_string() {
                *flag = true;
                // The literal's end is past this line; rescan from the last
                // start known to be outside it.
                scanner = Scanner::new(self.buf, outside, options);
            } else {
                outside = start;
            }
            state = ScanState::default();
        }
        inside
    }
}

fn classify_with(
    buf: &SourceBuffer,
    start: u32,
    end: u32,
    options: ScanOptions,
) -> Result<ScanState, ScanError> {
    let end = end.min(buf.len());
    let mut scanner = Scanner::new(buf, start, options);
    let mut state = ScanState::default();
    while scanner.pos() < end {
        let before = scanner.pos();
        state = scanner.advance(end, state)?;
        if scanner.pos() <= before {
            trace!(pos = before, "scanner made no progress");
            break;
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests;
