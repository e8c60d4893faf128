//! Lexical structure scanner for Ruby source.
//!
//! The scanner does not tokenize Ruby. It hops from one "interesting"
//! delimiter to the next (quotes, heredoc openers, percent literals,
//! comments, brackets, block keywords) and tracks just enough state to
//! answer two questions about any position: is it inside a literal, and how
//! deeply is it nested.
//!
//! # Layers
//!
//! ```text
//! SourceBuffer ──► Cursor ──► Scanner::advance ──► Classifier::classify
//!                                  │
//!                                  └─ context::expr_can_begin (preceding-context heuristics)
//! ```
//!
//! `rind_indent` builds indentation and block navigation on top of the
//! [`Classifier`].

mod context;
mod cursor;
mod options;
mod region;
mod scanner;
mod source_buffer;
mod tag;

pub use context::{expr_can_begin, is_special_char, ExprContext};
pub use cursor::Cursor;
pub use options::{DeepIndent, DeepIndentTable, ParseStyleError, ScanOptions, Underflow};
pub use region::{is_statement_start, Classifier, LineNesting, ResumePolicy};
pub use scanner::{NestEntry, ParenAnchor, ScanError, ScanState, Scanner};
pub use source_buffer::SourceBuffer;
pub use tag::{
    is_ident_continue, is_ident_start, is_operator_char, keyword_at, Bracket, DelimiterKind,
    Keyword,
};
