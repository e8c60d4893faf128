//! Preceding-context heuristics.
//!
//! Ruby reuses the same characters for operators and literal openers:
//! `<<` shifts or opens a heredoc, `/` divides or opens a regexp, `?` is a
//! ternary or a character literal, `{` is a block or a hash, and `if` opens
//! a block or trails a statement. Without a parser the only clue is what
//! comes right before. These checks look backward from a position and decide
//! whether a fresh expression can start there. They are heuristics and can
//! guess wrong; a wrong guess is never reported.

use crate::tag::{is_ident_continue, is_operator_char, Keyword};
use crate::SourceBuffer;

/// Which construct is asking [`expr_can_begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprContext {
    /// Character literals and `{`.
    Plain,
    /// A trailing `if`/`unless`/`while`/`until`.
    Modifier,
    /// `<<` heredoc openers.
    Heredoc,
    /// `%` literals.
    PercentLiteral,
    /// `/` regexps.
    Regexp,
}

/// `true` if a fresh expression can start at `pos`.
pub fn expr_can_begin(buf: &SourceBuffer, pos: u32, ctx: ExprContext) -> bool {
    let bytes = buf.as_bytes();
    let pos = (pos as usize).min(bytes.len());

    let mut p = pos;
    while p > 0 && matches!(bytes[p - 1], b' ' | b'\t') {
        p -= 1;
    }
    let spaced = p < pos;
    if p == 0 || bytes[p - 1] == b'\n' {
        return true;
    }

    let at = p - 1;
    let c = bytes[at];

    // `foo?` is a predicate call, `??` a character literal: neither leaves
    // room for an expression.
    if c == b'?' && at > 0 && (is_ident_continue(bytes[at - 1]) || is_special_char(bytes, at)) {
        return false;
    }
    if ctx == ExprContext::Heredoc && spaced {
        return true;
    }
    if is_operator_char(c) || matches!(c, b'[' | b'(' | b'{' | b',' | b';') {
        return true;
    }
    if matches!(c, b'!' | b'?')
        && (ctx != ExprContext::Modifier || at == 0 || bytes[at - 1] == b'\n')
    {
        return true;
    }
    if !is_ident_continue(c) {
        return false;
    }

    let mut w = at;
    while w > 0 && is_ident_continue(bytes[w - 1]) {
        w -= 1;
    }
    let word = &bytes[w..p];
    if Keyword::from_bytes(word).is_some_and(Keyword::starts_expression) {
        return bytes.get(p) != Some(&b'!');
    }

    let opener = match ctx {
        ExprContext::PercentLiteral => b'%',
        ExprContext::Regexp => b'/',
        _ => return false,
    };
    // `puts %w(a)` / `split /,/`: a bare word, a space, then an opener that
    // is not followed by a space reads as a method argument.
    spaced
        && word[0].is_ascii_alphabetic()
        && bytes.get(pos) == Some(&opener)
        && !matches!(bytes.get(pos + 1), Some(b' ' | b'\t'))
}

/// `true` if the byte at `at` is quoted by what precedes it: `?x`, `$x`,
/// a symbol colon at the start of a word (`:x`), or `?\x`.
pub fn is_special_char(bytes: &[u8], at: usize) -> bool {
    let Some(prev) = at.checked_sub(1).and_then(|i| bytes.get(i)).copied() else {
        return false;
    };
    let before = at.checked_sub(2).and_then(|i| bytes.get(i)).copied();
    match prev {
        b'?' | b'$' => true,
        b':' => before.map_or(true, |b| b.is_ascii_whitespace()),
        b'\\' => before == Some(b'?'),
        _ => false,
    }
}
