//! Ruby indentation and block navigation.
//!
//! Built on the classifier in `rind_lexer_core`:
//!
//! - [`IndentCalculator`] computes the column for a line;
//! - [`BlockNavigator`] moves between block boundaries;
//! - [`indent_line`], [`reindent`] and [`indent_block`] turn columns into
//!   text edits.
//!
//! Nothing here keeps state between calls. Each query rescans from a
//! resume point chosen by [`IndentConfig::resume`].
//!
//! # Example
//!
//! ```
//! use rind_indent::{reindent, IndentConfig};
//!
//! let out = reindent("def f\nx\nend\n", &IndentConfig::default());
//! assert_eq!(out.text, "def f\n  x\nend\n");
//! ```

mod config;
mod edit;
mod error;
mod indent;
mod navigate;

pub use config::{IndentConfig, INDENT_WIDTH, TAB_WIDTH};
pub use edit::{indent_block, indent_line, reindent, reindent_lines, LineEdit, Reindented};
pub use error::{ConfigError, IndentError};
pub use indent::{IndentCalculator, IndentResult};
pub use navigate::{BlockBoundary, BlockNavigator, Direction};
