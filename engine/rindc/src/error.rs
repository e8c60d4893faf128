use rind_indent::{ConfigError, IndentError};
use rind_lexer_core::ParseStyleError;

/// Errors reported by the `rind` commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A file could not be read or written. The message names the path.
    #[error("{0}")]
    Io(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Style(#[from] ParseStyleError),

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Indent(#[from] IndentError),
}

impl CliError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub(crate) fn read(path: &str, err: &std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            std::io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            std::io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
            _ => format!("error reading '{path}': {err}"),
        };
        Self::Io(message)
    }

    pub(crate) fn write(path: &str, err: &std::io::Error) -> Self {
        Self::Io(format!("error writing '{path}': {err}"))
    }
}
