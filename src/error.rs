use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tileset generation
#[derive(Error, Diagnostic, Debug)]
pub enum TiledError {
    #[error("IO error: {0}")]
    #[diagnostic(code(ss14_tiled::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(ss14_tiled::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(ss14_tiled::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Inheritance error: {message}")]
    #[diagnostic(code(ss14_tiled::inheritance))]
    Inheritance {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(ss14_tiled::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(ss14_tiled::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl TiledError {
    /// Wrap a failure tied to a specific file.
    pub fn io(path: impl Into<std::path::PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// A per-item build failure without help text.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TiledError>;
