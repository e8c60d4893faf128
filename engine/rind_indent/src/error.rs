//! Error types for indentation and navigation.

use rind_lexer_core::ScanError;

/// Why an indentation could not be computed.
///
/// Callers that rewrite text treat every variant as "leave the line alone".
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndentError {
    /// A closer with nothing to close between the resume point and the line.
    #[error("malformed nesting: {0}")]
    Scan(#[from] ScanError),

    /// Positive depth with no opener on the stack to measure from.
    #[error("nesting depth {depth} at byte {pos} has no opener")]
    UnanchoredNest { pos: u32, depth: i32 },

    #[error("line {line} is out of range (buffer has {count} lines)")]
    LineOutOfRange { line: u32, count: u32 },
}

/// Invalid [`IndentConfig`](crate::IndentConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("indent unit must be at least 1")]
    ZeroIndentUnit,

    #[error("tab width must be at least 1")]
    ZeroTabWidth,
}
