//! Sentinel-terminated source buffer with a line index.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! so the scanner can detect EOF without explicit bounds checks. The total
//! size is rounded up past the next 64-byte boundary, which leaves at least
//! one full cache line of zero padding for `peek()` near the end of the
//! buffer.
//!
//! On top of the raw bytes the buffer keeps the start offset of every line.
//! This is the read-only text interface the indentation engine works against:
//! character access, line boundaries, columns, and line-anchored searches.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to a 64-byte boundary (at least 64 zeros)
///              source_len (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
    /// Byte offset of the first character of every line. Always non-empty.
    line_starts: Vec<u32>,
}

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source code.
    ///
    /// Source files larger than `u32::MAX` bytes are truncated at `u32::MAX`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "line offsets are bounded by source_len which fits in u32"
    )]
    pub fn new(source: &str) -> Self {
        let source_len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        let source_bytes = &source.as_bytes()[..source_len as usize];

        let padded_len = (source_bytes.len() + 2 * CACHE_LINE) & !(CACHE_LINE - 1);
        let mut buf = vec![0u8; padded_len];
        buf[..source_bytes.len()].copy_from_slice(source_bytes);

        let mut line_starts = Vec::with_capacity(source_bytes.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr::memchr_iter(b'\n', source_bytes).map(|nl| nl as u32 + 1));

        Self {
            buf,
            source_len,
            line_starts,
        }
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Create a cursor positioned at the start of the source.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Create a cursor positioned at `pos` (clamped to the source length).
    pub fn cursor_at(&self, pos: u32) -> Cursor<'_> {
        let mut cursor = self.cursor();
        cursor.seek(pos);
        cursor
    }

    /// The byte at `pos`, or `0` at and past the end of the source.
    #[inline]
    pub fn byte_at(&self, pos: u32) -> u8 {
        if pos < self.source_len {
            self.buf[pos as usize]
        } else {
            0
        }
    }

    /// The byte just before `pos`, or `None` at the start of the buffer.
    #[inline]
    pub fn byte_before(&self, pos: u32) -> Option<u8> {
        pos.checked_sub(1).map(|p| self.byte_at(p))
    }

    /// Source bytes in `start..end`, clamped to the source.
    pub fn bytes_between(&self, start: u32, end: u32) -> &[u8] {
        let end = end.min(self.source_len) as usize;
        let start = (start as usize).min(end);
        &self.buf[start..end]
    }

    /// Source text in `start..end`.
    ///
    /// Returns an empty string if the range does not fall on character
    /// boundaries.
    pub fn text_between(&self, start: u32, end: u32) -> &str {
        std::str::from_utf8(self.bytes_between(start, end)).unwrap_or_default()
    }

    // ─── Lines ───

    /// Number of lines. An empty buffer, and a trailing newline, both count
    /// as starting one (empty) line.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "there are never more lines than bytes, and source_len fits in u32"
    )]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Zero-based line index of `pos`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "there are never more lines than bytes, and source_len fits in u32"
    )]
    pub fn line_of(&self, pos: u32) -> u32 {
        let idx = match self.line_starts.binary_search(&pos) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        idx as u32
    }

    /// Start offset of `line`. Lines past the end map to the source length.
    pub fn line_start(&self, line: u32) -> u32 {
        self.line_starts
            .get(line as usize)
            .copied()
            .unwrap_or(self.source_len)
    }

    /// Offset of the newline ending `line`, or the source length for the
    /// last line.
    pub fn line_end(&self, line: u32) -> u32 {
        self.line_starts
            .get(line as usize + 1)
            .map_or(self.source_len, |next| next - 1)
    }

    /// Start of the line containing `pos`.
    pub fn line_start_of(&self, pos: u32) -> u32 {
        self.line_start(self.line_of(pos))
    }

    /// End of the line containing `pos`.
    pub fn line_end_of(&self, pos: u32) -> u32 {
        self.line_end(self.line_of(pos))
    }

    /// Content of `line` without its newline (a trailing `\r` is kept).
    pub fn line_bytes(&self, line: u32) -> &[u8] {
        self.bytes_between(self.line_start(line), self.line_end(line))
    }

    /// `true` if `line` holds nothing but spaces, tabs and a trailing `\r`.
    pub fn line_is_blank(&self, line: u32) -> bool {
        self.line_bytes(line)
            .iter()
            .all(|&b| matches!(b, b' ' | b'\t' | b'\r'))
    }

    /// `true` if `pos` is the first position of its line.
    #[inline]
    pub fn is_line_start(&self, pos: u32) -> bool {
        pos == 0 || self.byte_at(pos - 1) == b'\n'
    }

    /// First position on the line of `pos` that is not a space or tab
    /// (back-to-indentation).
    pub fn indentation_end(&self, pos: u32) -> u32 {
        let mut cursor = self.cursor_at(self.line_start_of(pos));
        cursor.eat_whitespace();
        cursor.pos()
    }

    /// Display column of `pos`: characters since the line start, with tabs
    /// advancing to the next multiple of `tab_width`.
    pub fn column(&self, pos: u32, tab_width: u32) -> u32 {
        let tab_width = tab_width.max(1);
        let start = self.line_start_of(pos);
        self.bytes_between(start, pos)
            .iter()
            .fold(0, |col, &b| match b {
                b'\t' => (col / tab_width + 1) * tab_width,
                // UTF-8 continuation bytes do not start a new character.
                0x80..=0xBF => col,
                _ => col + 1,
            })
    }

    // ─── Searches ───

    /// Position of the first `needle` in `from..bound`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "offsets are bounded by source_len which fits in u32"
    )]
    pub fn find_byte(&self, needle: u8, from: u32, bound: u32) -> Option<u32> {
        memchr::memchr(needle, self.bytes_between(from, bound)).map(|off| from + off as u32)
    }

    /// First line at or after `from_line` whose content satisfies `pred`
    /// and which starts no later than `bound`.
    pub fn find_line_forward(
        &self,
        from_line: u32,
        bound: u32,
        mut pred: impl FnMut(&[u8]) -> bool,
    ) -> Option<u32> {
        (from_line..self.line_count())
            .take_while(|&line| self.line_start(line) <= bound)
            .find(|&line| pred(self.line_bytes(line)))
    }

    /// Nearest line strictly before `from_line`, and not before `floor`,
    /// whose content satisfies `pred`.
    pub fn find_line_backward(
        &self,
        from_line: u32,
        floor: u32,
        mut pred: impl FnMut(&[u8]) -> bool,
    ) -> Option<u32> {
        (floor..from_line.min(self.line_count()))
            .rev()
            .find(|&line| pred(self.line_bytes(line)))
    }
}
