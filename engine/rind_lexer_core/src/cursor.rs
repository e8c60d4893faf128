//! Cursor over a sentinel-terminated buffer.
//!
//! The cursor advances through the buffer byte-by-byte. EOF is the sentinel
//! (`0x00`) at or past the source length; interior null bytes are told
//! apart by comparing `pos` against `source_len`.

/// Returns the earliest (minimum) of two optional positions.
///
/// Combines separate memchr calls when a search needs more needles than a
/// single `memchr2`/`memchr3` call supports.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor) or
/// [`SourceBuffer::cursor_at()`](crate::SourceBuffer::cursor_at). The cursor
/// is [`Copy`], so taking a snapshot before a speculative probe is free.
///
/// # Invariant
///
/// `buf[source_len]` is `0x00` and is followed by at least two more zero
/// bytes, and `pos <= source_len` after every operation except
/// `advance`/`advance_n`, which callers only use on bytes they have seen.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position (byte index into `buf`).
    pos: u32,
    /// Length of actual source content (excludes sentinel and padding).
    source_len: u32,
}

const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    /// Create a cursor at position 0.
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) + 2 < buf.len(),
            "padding must cover peek at the sentinel"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// The byte at the current position; `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.byte(self.pos)
    }

    /// The byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.byte(self.pos + 1)
    }

    #[inline]
    fn byte(&self, pos: u32) -> u8 {
        self.buf.get(pos as usize).copied().unwrap_or(0)
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Advance the cursor by `n` bytes.
    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// Move to `pos`, clamped to the source length.
    #[inline]
    pub fn seek(&mut self, pos: u32) {
        self.pos = pos.min(self.source_len);
    }

    /// Returns `true` if the cursor has reached EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// `true` if the source at the current position starts with `prefix`.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        let start = self.pos as usize;
        let end = self.source_len as usize;
        start <= end && self.buf[start..end].starts_with(prefix)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false` so the sentinel stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Returns the number of bytes in the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }

    /// Advance past horizontal whitespace (spaces and tabs).
    #[inline]
    pub fn eat_whitespace(&mut self) {
        self.eat_while(|b| b == b' ' || b == b'\t');
    }

    /// Advance to the next `\n` byte or EOF.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        self.pos = self.pos.min(self.source_len);
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(b'\n', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// Advance to the start of the next line, or EOF on the last line.
    pub fn skip_line(&mut self) {
        self.eat_until_newline_or_eof();
        if !self.is_eof() {
            self.advance();
        }
    }

    /// Advance to the next byte that can end or nest a quoted literal.
    ///
    /// The interesting bytes are `close`, a backslash, `open` for paired
    /// delimiters, and `#` when the literal expands `#{...}`. Returns the
    /// byte found, or `None` with the cursor at `end` if none occurs before
    /// `end`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn skip_to_literal_delim(
        &mut self,
        close: u8,
        open: Option<u8>,
        expand: bool,
        end: u32,
    ) -> Option<u8> {
        let end = end.min(self.source_len);
        if self.pos >= end {
            return None;
        }
        let remaining = &self.buf[self.pos as usize..end as usize];
        let primary = memchr::memchr2(close, b'\\', remaining);
        let secondary = match (open, expand) {
            (Some(open), true) => memchr::memchr2(open, b'#', remaining),
            (Some(open), false) => memchr::memchr(open, remaining),
            (None, true) => memchr::memchr(b'#', remaining),
            (None, false) => None,
        };

        if let Some(off) = earliest_of(primary, secondary) {
            self.pos += off as u32;
            Some(self.current())
        } else {
            self.pos = end;
            None
        }
    }
}
