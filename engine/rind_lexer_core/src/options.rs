//! Scanner options: per-bracket deep-indent styles and underflow policy.

use std::fmt;
use std::str::FromStr;

use crate::Bracket;

/// How lines inside an open bracket are aligned.
///
/// A bracket with a style is "deep": it records an indentation anchor when
/// opened and resets the relative depth to zero. A bracket without one nests
/// like a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeepIndent {
    /// Align with the column right after the bracket.
    Aligned,
    /// Align with the first content after the bracket, skipping blanks.
    Space,
    /// One indent unit past the indentation of the bracket's line.
    IndentUnit,
}

impl DeepIndent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aligned => "aligned",
            Self::Space => "space",
            Self::IndentUnit => "indent-unit",
        }
    }

    /// Parse a style name where `off` means "not deep".
    pub fn parse_optional(name: &str) -> Result<Option<Self>, ParseStyleError> {
        if name.eq_ignore_ascii_case("off") {
            Ok(None)
        } else {
            name.parse().map(Some)
        }
    }
}

impl fmt::Display for DeepIndent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown deep-indent style name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown deep-indent style `{0}` (expected aligned, space, indent-unit or off)")]
pub struct ParseStyleError(pub String);

impl FromStr for DeepIndent {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aligned" => Ok(Self::Aligned),
            "space" => Ok(Self::Space),
            "indent-unit" | "unit" => Ok(Self::IndentUnit),
            _ => Err(ParseStyleError(s.to_owned())),
        }
    }
}

/// Deep-indent style per bracket kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeepIndentTable {
    styles: [Option<DeepIndent>; 3],
}

impl Default for DeepIndentTable {
    /// `(` and `[` align with their content; `{` nests like a block.
    fn default() -> Self {
        Self {
            styles: [Some(DeepIndent::Space), Some(DeepIndent::Space), None],
        }
    }
}

impl DeepIndentTable {
    /// A table where no bracket is deep.
    pub fn none() -> Self {
        Self { styles: [None; 3] }
    }

    pub fn get(&self, bracket: Bracket) -> Option<DeepIndent> {
        self.styles[bracket.index()]
    }

    pub fn set(&mut self, bracket: Bracket, style: Option<DeepIndent>) {
        self.styles[bracket.index()] = style;
    }

    #[must_use]
    pub fn with(mut self, bracket: Bracket, style: Option<DeepIndent>) -> Self {
        self.set(bracket, style);
        self
    }
}

/// What a closing bracket does when the nesting stack is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Underflow {
    /// Report [`ScanError::InvalidNest`](crate::ScanError::InvalidNest).
    #[default]
    Strict,
    /// Decrement the depth and keep going; used to measure per-line deltas.
    Lenient,
}

/// Options threaded through every scanner call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub deep_indent: DeepIndentTable,
    pub underflow: Underflow,
}

impl ScanOptions {
    pub fn new(deep_indent: DeepIndentTable) -> Self {
        Self {
            deep_indent,
            underflow: Underflow::Strict,
        }
    }

    /// The same options with lenient underflow.
    #[must_use]
    pub fn lenient(self) -> Self {
        Self {
            underflow: Underflow::Lenient,
            ..self
        }
    }
}
