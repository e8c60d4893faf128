//! Block navigation.
//!
//! [`BlockNavigator::move_to_block`] walks line by line, adding up each
//! line's nesting delta, and stops where a block it entered closes again or
//! where an enclosing block ends. Blank lines, comment lines and the lines
//! of multi-line literals are stepped over.
//!
//! With `advanced_navigation` off the walk compares indentation columns
//! instead of nesting.

use rind_lexer_core::{
    Classifier, DeepIndentTable, Keyword, ScanOptions, ScanState, Scanner, SourceBuffer,
};
use tracing::debug;

use crate::indent::leading_keyword;
use crate::{IndentCalculator, IndentConfig};

/// Which way [`BlockNavigator::move_to_block`] walks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the block.
    Forward,
    /// Towards its beginning.
    Backward,
}

impl Direction {
    fn signum(self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

/// Where a block move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockBoundary {
    /// First non-blank position of `line`.
    pub pos: u32,
    pub line: u32,
    /// Accumulated nesting depth when the walk stopped.
    pub depth: i32,
}

/// Moves between block boundaries in one buffer.
pub struct BlockNavigator<'a> {
    buf: &'a SourceBuffer,
    config: IndentConfig,
    classifier: Classifier<'a>,
}

impl<'a> BlockNavigator<'a> {
    pub fn new(buf: &'a SourceBuffer, config: IndentConfig) -> Self {
        Self {
            buf,
            config,
            classifier: Classifier::new(buf, config.scan_options()),
        }
    }

    /// Move `count` block boundaries from the line containing `pos`.
    ///
    /// A walk that runs off the buffer stops on the last line it reached.
    pub fn move_to_block(&self, pos: u32, direction: Direction, count: u32) -> BlockBoundary {
        let line = self.buf.line_of(pos.min(self.buf.len()));
        if self.config.advanced_navigation {
            self.by_nesting(line, direction, count)
        } else {
            self.by_indentation(line, direction, count)
        }
    }

    fn boundary(&self, line: u32, depth: i32) -> BlockBoundary {
        BlockBoundary {
            pos: self.buf.indentation_end(self.buf.line_start(line)),
            line,
            depth,
        }
    }

    fn head_keyword(&self, line: u32) -> Option<Keyword> {
        let head = self.buf.indentation_end(self.buf.line_start(line));
        leading_keyword(self.buf.as_bytes(), head)
    }

    /// `true` for lines the walk never stops on or counts.
    fn is_skippable(&self, line: u32, literal: &[bool]) -> bool {
        if literal.get(line as usize).copied().unwrap_or(false) {
            return true;
        }
        let bytes = self.buf.line_bytes(line);
        match bytes.iter().find(|&&b| !matches!(b, b' ' | b'\t' | b'\r')) {
            None | Some(b'#') => true,
            Some(_) => false,
        }
    }

    fn step(&self, line: u32, direction: Direction) -> Option<u32> {
        match direction {
            Direction::Forward => Some(line + 1).filter(|&next| next < self.buf.line_count()),
            Direction::Backward => line.checked_sub(1),
        }
    }

    // ─── Nesting walk ───

    fn by_nesting(&self, start: u32, direction: Direction, count: u32) -> BlockBoundary {
        let signum = direction.signum();
        let literal = self.classifier.literal_lines();
        let first = self.classifier.line_nesting(start);

        let mut depth = first.delta;
        if self.head_keyword(start).is_some_and(Keyword::is_mid_block) {
            depth += signum;
        }
        // Already inside the block we are leaving.
        if depth * signum < 0 {
            depth = 0;
        }

        let mut line = start;
        for _ in 0..count {
            let here = self.classifier.line_nesting(line);
            let mut down = match direction {
                Direction::Forward => here.opened > 0,
                Direction::Backward => here.closed > 0,
            };
            let mut done = false;
            while !done {
                let Some(next) = self.step(line, direction) else {
                    break;
                };
                line = next;
                if self.is_skippable(line, &literal) {
                    continue;
                }
                depth += self.classifier.line_nesting(line).delta;
                if signum * depth > 0 {
                    down = true;
                } else if down && depth == 0 {
                    done = true;
                } else if signum * depth < 0 {
                    done = true;
                }
            }
        }
        debug!(from = start, to = line, depth, "block move");
        self.boundary(line, depth)
    }

    // ─── Indentation walk ───

    fn by_indentation(&self, start: u32, direction: Direction, count: u32) -> BlockBoundary {
        let literal = self.classifier.literal_lines();
        let actual = |line: u32| {
            self.buf.column(
                self.buf.indentation_end(self.buf.line_start(line)),
                self.config.tab_width,
            )
        };
        let calculator = IndentCalculator::new(self.buf, self.config);

        let mut line = start;
        for _ in 0..count {
            let column = calculator
                .compute_indent(line)
                .ok()
                .and_then(|result| result.column())
                .unwrap_or_else(|| actual(line));
            let mut deeper = false;
            while let Some(next) = self.step(line, direction) {
                line = next;
                if self.is_skippable(line, &literal)
                    || self.head_keyword(line).is_some_and(Keyword::is_mid_block)
                {
                    continue;
                }
                let here = actual(line);
                if here > column {
                    deeper = true;
                } else if here < column || deeper {
                    break;
                }
            }
        }
        debug!(from = start, to = line, "indentation move");
        self.boundary(line, 0)
    }

    // ─── Accurate scans ───

    /// Position just past the token that closes the block containing
    /// `pos`, scanning forward from `pos` with a fresh state.
    pub fn end_of_block(&self, pos: u32) -> Option<u32> {
        self.scan_until(pos, |depth| depth < 0)
    }

    fn scan_until(&self, from: u32, mut done: impl FnMut(i32) -> bool) -> Option<u32> {
        let options = ScanOptions::new(DeepIndentTable::none()).lenient();
        let mut scanner = Scanner::new(self.buf, from, options);
        let mut state = ScanState::default();
        while scanner.pos() < self.buf.len() {
            state = scanner.advance(self.buf.len(), state).ok()?;
            if done(state.depth()) {
                return Some(scanner.pos());
            }
        }
        None
    }

    // ─── Definitions ───

    fn is_defun_line(&self, line: u32, literal: &[bool]) -> bool {
        !literal.get(line as usize).copied().unwrap_or(false)
            && self.head_keyword(line).is_some_and(Keyword::starts_definition)
    }

    /// Start of the nearest `def`, `class` or `module` before `pos`.
    pub fn beginning_of_defun(&self, pos: u32) -> Option<u32> {
        let literal = self.classifier.literal_lines();
        let line = self.buf.line_of(pos.min(self.buf.len()));
        (0..=line)
            .rev()
            .filter(|&l| self.is_defun_line(l, &literal))
            .map(|l| self.buf.indentation_end(self.buf.line_start(l)))
            .find(|&head| head < pos)
    }

    /// Start of the line after the `end` that closes the definition
    /// containing `pos`, or else the next definition after it.
    pub fn end_of_defun(&self, pos: u32) -> Option<u32> {
        let literal = self.classifier.literal_lines();
        let line = self.buf.line_of(pos.min(self.buf.len()));

        let containing = (0..=line)
            .rev()
            .filter(|&l| self.is_defun_line(l, &literal))
            .find(|&l| self.buf.indentation_end(self.buf.line_start(l)) <= pos)
            .and_then(|l| self.defun_end(l))
            .filter(|&end| end > pos);
        if containing.is_some() {
            return containing;
        }
        (line..self.buf.line_count())
            .filter(|&l| self.is_defun_line(l, &literal))
            .find(|&l| self.buf.indentation_end(self.buf.line_start(l)) > pos)
            .and_then(|l| self.defun_end(l))
    }

    fn defun_end(&self, line: u32) -> Option<u32> {
        let head = self.buf.indentation_end(self.buf.line_start(line));
        let mut entered = false;
        let close = self.scan_until(head, |depth| {
            entered |= depth > 0;
            entered && depth <= 0
        })?;
        Some(self.buf.line_start(self.buf.line_of(close) + 1))
    }
}
