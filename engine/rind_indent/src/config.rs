//! Indentation configuration.

use rind_lexer_core::{DeepIndentTable, ResumePolicy, ScanOptions};

use crate::ConfigError;

/// Columns per nesting level.
pub const INDENT_WIDTH: u32 = 2;

/// Columns per tab stop.
pub const TAB_WIDTH: u32 = 8;

/// Configuration for indentation and navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndentConfig {
    /// Columns added per nesting level.
    pub indent_unit: u32,

    /// Deep-indent style per bracket kind.
    /// Defaults to `space` for `(` and `[`, and off for `{`.
    pub deep_indent: DeepIndentTable,

    /// Build indentation from tabs where whole tab stops fit.
    pub use_tabs: bool,

    /// Columns per tab stop, for reading and writing indentation.
    pub tab_width: u32,

    /// Navigate blocks by nesting; `false` selects the line-based
    /// fallback that compares indentation columns.
    pub advanced_navigation: bool,

    /// Where scanning resumes before the line being indented.
    pub resume: ResumePolicy,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            indent_unit: INDENT_WIDTH,
            deep_indent: DeepIndentTable::default(),
            use_tabs: false,
            tab_width: TAB_WIDTH,
            advanced_navigation: true,
            resume: ResumePolicy::default(),
        }
    }
}

impl IndentConfig {
    #[must_use]
    pub fn with_indent_unit(self, indent_unit: u32) -> Self {
        Self {
            indent_unit,
            ..self
        }
    }

    #[must_use]
    pub fn with_deep_indent(self, deep_indent: DeepIndentTable) -> Self {
        Self {
            deep_indent,
            ..self
        }
    }

    #[must_use]
    pub fn with_tabs(self, use_tabs: bool) -> Self {
        Self { use_tabs, ..self }
    }

    #[must_use]
    pub fn with_resume(self, resume: ResumePolicy) -> Self {
        Self { resume, ..self }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent_unit == 0 {
            return Err(ConfigError::ZeroIndentUnit);
        }
        if self.tab_width == 0 {
            return Err(ConfigError::ZeroTabWidth);
        }
        Ok(())
    }

    /// Scanner options for strict classification under this config.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new(self.deep_indent)
    }

    /// Leading whitespace that reaches `column`.
    pub fn indent_string(&self, column: u32) -> String {
        if self.use_tabs && self.tab_width > 0 {
            let tabs = column / self.tab_width;
            let spaces = column % self.tab_width;
            let mut out = "\t".repeat(tabs as usize);
            out.push_str(&" ".repeat(spaces as usize));
            out
        } else {
            " ".repeat(column as usize)
        }
    }
}
