//! Delimiter-hopping scanner.
//!
//! Each call to [`Scanner::advance`] probes forward for the next delimiter,
//! classifies it as one [`DelimiterKind`], and hands it to that kind's
//! handler. Handlers consume the whole construct (a string, a heredoc body, a
//! comment, a keyword) and update the [`ScanState`] the caller threads
//! through. Nothing else is tokenized.
//!
//! # State
//!
//! `nest` is the stack of unclosed openers (brackets and block keywords).
//! `depth` counts nesting relative to the innermost deep bracket: a deep
//! bracket saves the current depth as a [`ParenAnchor`] and restarts from
//! zero, and its closer restores the saved depth. `depth` may go negative
//! when a region closes blocks it did not open.
//!
//! # Bounds
//!
//! A construct still open at the end bound is not an error: the state records
//! where it began in `in_string` and the cursor stops at the bound.

use smallvec::SmallVec;
use tracing::trace;

use crate::context::{expr_can_begin, ExprContext};
use crate::cursor::Cursor;
use crate::options::{DeepIndent, ScanOptions, Underflow};
use crate::tag::{is_ident_continue, is_ident_start, keyword_at, Bracket, DelimiterKind, Keyword};
use crate::SourceBuffer;

/// One unclosed opener on the nesting stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NestEntry {
    bracket: Option<Bracket>,
    open: u32,
    pos: u32,
    anchored: bool,
}

impl NestEntry {
    /// The bracket, or `None` for a block keyword.
    pub fn bracket(&self) -> Option<Bracket> {
        self.bracket
    }

    /// Position of the opening bracket or the keyword's first byte.
    pub fn open(&self) -> u32 {
        self.open
    }

    /// Indentation reference: just past the opener, or the first content
    /// after a `space`-style bracket.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// `true` if this bracket was deep when opened and pushed an anchor.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn is_keyword(&self) -> bool {
        self.bracket.is_none()
    }
}

/// Indentation reference saved by a deep bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParenAnchor {
    pos: u32,
    depth: i32,
}

impl ParenAnchor {
    /// Indentation reference position.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Depth outside the bracket, restored when it closes.
    pub fn depth(&self) -> i32 {
        self.depth
    }
}

/// Scanner state carried from one [`Scanner::advance`] call to the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanState {
    in_string: Option<u32>,
    nest: SmallVec<[NestEntry; 8]>,
    depth: i32,
    anchors: SmallVec<[ParenAnchor; 4]>,
    opened: u32,
    closed: u32,
}

impl ScanState {
    /// Start of the literal still open at the bound, if any.
    pub fn in_string(&self) -> Option<u32> {
        self.in_string
    }

    pub fn is_in_string(&self) -> bool {
        self.in_string.is_some()
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Unclosed openers, outermost first.
    pub fn nest(&self) -> &[NestEntry] {
        &self.nest
    }

    pub fn innermost(&self) -> Option<NestEntry> {
        self.nest.last().copied()
    }

    /// Saved anchors of the open deep brackets, outermost first.
    pub fn anchors(&self) -> &[ParenAnchor] {
        &self.anchors
    }

    /// Block keywords that pushed a nest entry.
    pub fn keywords_opened(&self) -> u32 {
        self.opened
    }

    /// `end` keywords seen.
    pub fn keywords_closed(&self) -> u32 {
        self.closed
    }

    /// No open literal, no open opener, and zero depth.
    pub fn is_balanced(&self) -> bool {
        self.in_string.is_none() && self.nest.is_empty() && self.depth == 0
    }

    fn push_keyword(&mut self, open: u32, pos: u32) {
        self.nest.push(NestEntry {
            bracket: None,
            open,
            pos,
            anchored: false,
        });
        self.depth += 1;
        self.opened += 1;
    }
}

/// Malformed nesting found by a strict scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("invalid nest: `{closer}` at byte {pos} closes nothing")]
    InvalidNest { closer: char, pos: u32 },
}

/// A recognised `<<ID` / `<<-ID` / `<<~ID` opener.
#[derive(Clone, Copy, Debug)]
struct HeredocOpener {
    id_start: u32,
    id_end: u32,
    /// Position just past the opener (and any closing quote).
    end: u32,
    /// `-` or `~`: the terminator may be indented.
    indented: bool,
}

/// Delimiter-hopping scanner over one buffer.
pub struct Scanner<'a> {
    buf: &'a SourceBuffer,
    cursor: Cursor<'a>,
    options: ScanOptions,
    /// Scanning the remainder of a heredoc opener's line.
    on_opener_line: bool,
    /// Later openers on that line, awaiting their bodies.
    queued: SmallVec<[HeredocOpener; 2]>,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a SourceBuffer, pos: u32, options: ScanOptions) -> Self {
        Self {
            buf,
            cursor: buf.cursor_at(pos),
            options,
            on_opener_line: false,
            queued: SmallVec::new(),
        }
    }

    /// Current position.
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Advance across the next delimiter before `end` and return the
    /// updated state.
    ///
    /// Always consumes at least one byte unless the cursor is already at or
    /// past `end`. If no delimiter occurs before `end`, the cursor stops at
    /// `end`, or just past an identifier that straddles it.
    pub fn advance(&mut self, end: u32, mut state: ScanState) -> Result<ScanState, ScanError> {
        self.step(end, &mut state)?;
        Ok(state)
    }

    fn step(&mut self, end: u32, state: &mut ScanState) -> Result<(), ScanError> {
        let end = end.min(self.buf.len());
        let Some((kind, start)) = self.next_delimiter(end) else {
            self.cursor.seek(end.max(self.cursor.pos()));
            return Ok(());
        };
        trace!(?kind, start, "delimiter");

        match kind {
            DelimiterKind::Quote(quote) => {
                self.literal_or_open(start, start, quote, None, true, end, state);
            }
            DelimiterKind::SingleQuote => {
                self.literal_or_open(start, start, b'\'', None, false, end, state);
            }
            DelimiterKind::Slash => self.slash(start, end, state),
            DelimiterKind::Percent => self.percent(start, end, state),
            DelimiterKind::Question => self.question(start),
            DelimiterKind::Dollar => {
                self.cursor.seek(start + 1);
                if is_ident_continue(self.cursor.current()) {
                    self.cursor.eat_while(is_ident_continue);
                } else if !matches!(self.cursor.current(), b'\n' | 0) {
                    self.cursor.advance_char();
                }
            }
            DelimiterKind::Sigil => {
                self.cursor.seek(start + 1);
                if self.cursor.current() == b'@' {
                    self.cursor.advance();
                }
                self.cursor.eat_while(is_ident_continue);
            }
            DelimiterKind::Comment => self.cursor.skip_line(),
            DelimiterKind::BlockComment => self.block_comment(start, end, state),
            DelimiterKind::Open(bracket) => self.open_bracket(start, bracket, state),
            DelimiterKind::Close(bracket) => self.close_bracket(start, bracket, state)?,
            DelimiterKind::Dot => {
                self.cursor.seek(start + 1);
                if self.cursor.current() == b'.' {
                    self.cursor.advance();
                    if self.cursor.current() == b'.' {
                        self.cursor.advance();
                    }
                } else {
                    self.cursor.eat_while(is_ident_continue);
                }
            }
            DelimiterKind::Colon => self.colon(start, end, state),
            DelimiterKind::Heredoc => self.heredoc(start, end, state)?,
            DelimiterKind::Keyword(keyword) => self.keyword(start, keyword, state),
        }
        Ok(())
    }

    // ─── Probe ───

    /// Find the next delimiter before `end`, skipping plain identifiers and
    /// numbers.
    fn next_delimiter(&mut self, end: u32) -> Option<(DelimiterKind, u32)> {
        while self.cursor.pos() < end {
            let start = self.cursor.pos();
            let kind = match self.cursor.current() {
                b'"' => DelimiterKind::Quote(b'"'),
                b'`' => DelimiterKind::Quote(b'`'),
                b'\'' => DelimiterKind::SingleQuote,
                b'/' => DelimiterKind::Slash,
                b'%' => DelimiterKind::Percent,
                b'?' => DelimiterKind::Question,
                b'$' => DelimiterKind::Dollar,
                b'@' => DelimiterKind::Sigil,
                b'#' => DelimiterKind::Comment,
                b'.' => DelimiterKind::Dot,
                b':' => DelimiterKind::Colon,
                b'<' if self.cursor.peek() == b'<' => DelimiterKind::Heredoc,
                b'=' if self.buf.is_line_start(start)
                    && self.cursor.starts_with(b"=begin")
                    && !is_ident_continue(self.buf.byte_at(start + 6)) =>
                {
                    DelimiterKind::BlockComment
                }
                b'0'..=b'9' => {
                    self.cursor.eat_while(is_ident_continue);
                    continue;
                }
                b if is_ident_start(b) => {
                    self.cursor.eat_while(is_ident_continue);
                    if self.cursor.pos() > end {
                        continue;
                    }
                    match self.block_keyword_at(start) {
                        Some(keyword) => DelimiterKind::Keyword(keyword),
                        None => continue,
                    }
                }
                b => {
                    if let Some(bracket) = Bracket::from_open(b) {
                        DelimiterKind::Open(bracket)
                    } else if let Some(bracket) = Bracket::from_close(b) {
                        DelimiterKind::Close(bracket)
                    } else {
                        self.cursor.advance();
                        continue;
                    }
                }
            };
            return Some((kind, start));
        }
        None
    }

    /// The block keyword or `end` spelled by the identifier at `start`, with
    /// the cursor just past it.
    ///
    /// `end?`, `if!` are method names and `if:` is a hash label.
    fn block_keyword_at(&self, start: u32) -> Option<Keyword> {
        let keyword = keyword_at(self.buf.as_bytes(), start as usize)?;
        if !(keyword.opens_block() || keyword == Keyword::End) {
            return None;
        }
        match self.cursor.current() {
            b'?' | b'!' => None,
            b':' if self.cursor.peek() != b':' => None,
            _ => Some(keyword),
        }
    }

    // ─── Quoted literals ───

    /// Scan a literal whose opening delimiter is at `open_at`; on failure
    /// mark the state as inside a literal starting at `start`.
    #[allow(
        clippy::too_many_arguments,
        reason = "one call site per literal kind; a struct would only rename the arguments"
    )]
    fn literal_or_open(
        &mut self,
        start: u32,
        open_at: u32,
        close: u8,
        open: Option<u8>,
        expand: bool,
        end: u32,
        state: &mut ScanState,
    ) {
        if !self.forward_literal(open_at, close, open, expand, end) {
            state.in_string = Some(start);
            self.cursor.seek(end);
        }
    }

    /// Skip from the delimiter at `open_at` past its matching `close`.
    ///
    /// Backslash escapes one byte. With `open`, nested pairs must balance.
    /// With `expand`, `#{...}` is skipped as a balanced brace region.
    /// Returns `false` if the literal is still open at `end`.
    fn forward_literal(
        &mut self,
        open_at: u32,
        close: u8,
        open: Option<u8>,
        expand: bool,
        end: u32,
    ) -> bool {
        self.cursor.seek(open_at + 1);
        let mut level = 1u32;
        loop {
            let Some(b) = self.cursor.skip_to_literal_delim(close, open, expand, end) else {
                return false;
            };
            if b == b'\\' && close != b'\\' {
                self.cursor.advance();
                if self.cursor.pos() >= end {
                    return false;
                }
                self.cursor.advance_char();
            } else if b == close {
                self.cursor.advance();
                level -= 1;
                if level == 0 {
                    return true;
                }
            } else if Some(b) == open {
                self.cursor.advance();
                level += 1;
            } else if b == b'#' && self.cursor.peek() == b'{' {
                let brace = self.cursor.pos() + 1;
                if !self.forward_literal(brace, b'}', Some(b'{'), false, end) {
                    return false;
                }
            } else {
                self.cursor.advance();
            }
        }
    }

    fn slash(&mut self, start: u32, end: u32, state: &mut ScanState) {
        if self.buf.byte_at(start + 1) != b'='
            && expr_can_begin(self.buf, start, ExprContext::Regexp)
        {
            self.literal_or_open(start, start, b'/', None, true, end, state);
        } else {
            self.cursor.seek(start + 1);
        }
    }

    fn percent(&mut self, start: u32, end: u32, state: &mut ScanState) {
        self.cursor.seek(start + 1);
        let kind = self.buf.byte_at(start + 1);
        if kind == b'=' || !expr_can_begin(self.buf, start, ExprContext::PercentLiteral) {
            return;
        }
        let (delim_at, expand) = match kind {
            b'Q' | b'r' | b'x' | b'W' | b'I' => (start + 2, true),
            b'q' | b'w' | b'i' | b's' => (start + 2, false),
            _ => (start + 1, true),
        };
        let delim = self.buf.byte_at(delim_at);
        if delim_at >= self.buf.len()
            || delim.is_ascii_alphanumeric()
            || delim >= 0x80
            || matches!(delim, b' ' | b'\t' | b'\n' | b'\r')
        {
            return;
        }

        let paired = match delim {
            b'<' => Some(b'>'),
            _ => Bracket::from_open(delim).map(Bracket::close),
        };
        match paired {
            Some(close) => {
                self.literal_or_open(start, delim_at, close, Some(delim), expand, end, state);
            }
            None => {
                let expand = expand && delim != b'\\';
                self.literal_or_open(start, delim_at, delim, None, expand, end, state);
            }
        }
    }

    /// `?a`, `?\n`, `?\C-x`: a character literal where an expression can
    /// begin; otherwise the ternary operator.
    fn question(&mut self, start: u32) {
        self.cursor.seek(start + 1);
        if !expr_can_begin(self.buf, start, ExprContext::Plain) {
            return;
        }
        let mut probe = self.cursor;
        while probe.starts_with(b"\\C-") || probe.starts_with(b"\\M-") {
            probe.advance_n(3);
        }
        if probe.current() == b'\\' {
            probe.advance();
        }
        if probe.is_eof() || probe.current() == b'\n' {
            return;
        }
        probe.advance_char();
        self.cursor = probe;
    }

    fn colon(&mut self, start: u32, end: u32, state: &mut ScanState) {
        let next = self.buf.byte_at(start + 1);
        if next == b'"' || next == b'\'' {
            self.literal_or_open(start, start + 1, next, None, next == b'"', end, state);
        } else if let Some(len) = self.symbol_operator_len(start + 1) {
            self.cursor.seek(start + 1 + len);
        } else if next.is_ascii_alphabetic() || next == b'_' {
            self.cursor.seek(start + 1);
            self.cursor.eat_while(is_ident_continue);
            if matches!(self.cursor.current(), b'!' | b'?' | b'=') {
                self.cursor.advance();
            }
        } else {
            self.cursor.seek(start + 1);
        }
    }

    /// Length of an operator method name used as a symbol (`:+`, `:<=`,
    /// `:===`, `:!~`).
    fn symbol_operator_len(&self, at: u32) -> Option<u32> {
        let first = self.buf.byte_at(at);
        let second = self.buf.byte_at(at + 1);
        match first {
            b'-' | b',' | b'.' | b'+' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'<'
            | b'>' => Some(if second == b'=' { 2 } else { 1 }),
            b'=' if second == b'=' => Some(if self.buf.byte_at(at + 2) == b'=' { 3 } else { 2 }),
            b'!' => Some(if matches!(second, b'~' | b'=') { 2 } else { 1 }),
            _ => None,
        }
    }

    // ─── Comments and heredocs ───

    /// `=begin` runs to the next line starting with `=end`, then to the
    /// start of the following line.
    fn block_comment(&mut self, start: u32, end: u32, state: &mut ScanState) {
        let from = self.buf.line_of(start) + 1;
        let terminator = self
            .buf
            .find_line_forward(from, self.buf.len(), |line| line.starts_with(b"=end"))
            .filter(|&line| self.buf.line_start(line) + 4 <= end);
        match terminator {
            Some(line) => self.cursor.seek(self.buf.line_start(line + 1)),
            None => {
                state.in_string = Some(start);
                self.cursor.seek(end);
            }
        }
    }

    fn heredoc_opener(&self, start: u32) -> Option<HeredocOpener> {
        if !expr_can_begin(self.buf, start, ExprContext::Heredoc) {
            return None;
        }
        let mut p = start + 2;
        let indented = matches!(self.buf.byte_at(p), b'-' | b'~');
        if indented {
            p += 1;
        }
        let quote = self.buf.byte_at(p);
        if matches!(quote, b'"' | b'\'' | b'`') {
            let line_end = self.buf.line_end_of(p);
            let close = self.buf.find_byte(quote, p + 1, line_end)?;
            if close == p + 1 {
                return None;
            }
            Some(HeredocOpener {
                id_start: p + 1,
                id_end: close,
                end: close + 1,
                indented,
            })
        } else {
            if !is_ident_start(quote) {
                return None;
            }
            let mut cursor = self.buf.cursor_at(p);
            cursor.eat_while(is_ident_continue);
            Some(HeredocOpener {
                id_start: p,
                id_end: cursor.pos(),
                end: cursor.pos(),
                indented,
            })
        }
    }

    /// A heredoc opener: scan the rest of its line normally, then skip the
    /// bodies of every opener on that line, in order, through their
    /// terminator lines. `<<` that cannot open a heredoc is the shift
    /// operator.
    fn heredoc(&mut self, start: u32, end: u32, state: &mut ScanState) -> Result<(), ScanError> {
        let Some(opener) = self.heredoc_opener(start) else {
            self.cursor.seek(start + 2);
            return Ok(());
        };
        self.cursor.seek(opener.end);
        if self.on_opener_line {
            // Its body follows the bodies of the openers before it.
            self.queued.push(opener);
            return Ok(());
        }

        let line_end = self.buf.line_end_of(opener.end).min(end);
        self.on_opener_line = true;
        let rest = self.scan_to(line_end, state);
        self.on_opener_line = false;
        let queued = std::mem::take(&mut self.queued);
        rest?;

        let mut body = self.buf.line_of(opener.end) + 1;
        for opener in std::iter::once(opener).chain(queued) {
            match self.heredoc_terminator(&opener, body, end) {
                Some(line) => {
                    trace!(line, "heredoc terminator");
                    body = line + 1;
                }
                None => {
                    state.in_string = Some(opener.id_end);
                    self.cursor.seek(end);
                    return Ok(());
                }
            }
        }
        self.cursor.seek(self.buf.line_start(body));
        Ok(())
    }

    fn scan_to(&mut self, bound: u32, state: &mut ScanState) -> Result<(), ScanError> {
        while self.cursor.pos() < bound {
            self.step(bound, state)?;
        }
        Ok(())
    }

    /// First line from `body` on, starting no later than `end`, that
    /// terminates `opener`.
    fn heredoc_terminator(&self, opener: &HeredocOpener, body: u32, end: u32) -> Option<u32> {
        let id = self.buf.bytes_between(opener.id_start, opener.id_end);
        self.buf.find_line_forward(body, end, |line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let line = if opener.indented {
                let indent = line.iter().take_while(|&&b| b == b' ' || b == b'\t').count();
                &line[indent..]
            } else {
                line
            };
            line == id
        })
    }

    // ─── Nesting ───

    fn open_bracket(&mut self, start: u32, bracket: Bracket, state: &mut ScanState) {
        let deep = self.options.deep_indent.get(bracket).filter(|_| {
            bracket != Bracket::Curly || expr_can_begin(self.buf, start, ExprContext::Plain)
        });
        let mut pos = start + 1;
        match deep {
            Some(style) => {
                if style == DeepIndent::Space {
                    if let Some(content) = self.content_after_blanks(pos) {
                        pos = content;
                    }
                }
                state.nest.push(NestEntry {
                    bracket: Some(bracket),
                    open: start,
                    pos,
                    anchored: true,
                });
                state.anchors.push(ParenAnchor {
                    pos,
                    depth: state.depth,
                });
                state.depth = 0;
            }
            None => {
                state.nest.push(NestEntry {
                    bracket: Some(bracket),
                    open: start,
                    pos,
                    anchored: false,
                });
                state.depth += 1;
            }
        }
        self.cursor.seek(pos);
    }

    /// First content byte after at least one blank at `at`, unless the line
    /// ends or a comment starts first.
    fn content_after_blanks(&self, at: u32) -> Option<u32> {
        if !matches!(self.buf.byte_at(at), b' ' | b'\t') {
            return None;
        }
        let mut cursor = self.buf.cursor_at(at);
        cursor.eat_whitespace();
        match cursor.current() {
            b'#' | b'\n' | b'\r' | 0 => None,
            _ => Some(cursor.pos()),
        }
    }

    fn close_bracket(
        &mut self,
        start: u32,
        bracket: Bracket,
        state: &mut ScanState,
    ) -> Result<(), ScanError> {
        self.cursor.seek(start + 1);
        match state.nest.pop() {
            Some(entry) if entry.anchored => {
                state.depth = state
                    .anchors
                    .pop()
                    .map_or(state.depth - 1, |anchor| anchor.depth);
            }
            Some(_) => state.depth -= 1,
            None if self.options.underflow == Underflow::Lenient => state.depth -= 1,
            None => {
                return Err(ScanError::InvalidNest {
                    closer: char::from(bracket.close()),
                    pos: start,
                });
            }
        }
        Ok(())
    }

    fn keyword(&mut self, start: u32, keyword: Keyword, state: &mut ScanState) {
        let word_end = start + keyword.width();
        self.cursor.seek(word_end);
        match keyword {
            Keyword::End => {
                state.nest.pop();
                state.depth -= 1;
                state.closed += 1;
            }
            Keyword::Def => {
                state.push_keyword(start, word_end);
                // The method name may be an operator or a keyword.
                if matches!(self.cursor.current(), b' ' | b'\t') {
                    self.cursor.eat_whitespace();
                    self.cursor
                        .eat_while(|b| !matches!(b, b'(' | b'\n' | b';' | 0));
                }
            }
            Keyword::Do if self.do_is_redundant(start) => {}
            _ if keyword.is_modifier()
                && !expr_can_begin(self.buf, start, ExprContext::Modifier) => {}
            _ => state.push_keyword(start, word_end),
        }
    }

    /// `do` on a line headed by `while`/`until`/`for`/`rescue` belongs to
    /// that loop.
    fn do_is_redundant(&self, start: u32) -> bool {
        let head = self.buf.indentation_end(start);
        keyword_at(self.buf.as_bytes(), head as usize).is_some_and(Keyword::makes_do_redundant)
    }
}

#[cfg(test)]
mod tests;
