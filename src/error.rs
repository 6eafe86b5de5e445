use thiserror::Error;

use crate::diagnostics::Position;

/// Result alias for errors emitted by the engine and front end.
pub type LintResult<T> = Result<T, LintError>;

/// Structured error type for faulty-errorsas subsystems.
///
/// The analysis pass itself never fails; these cover everything around it.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load Go grammar: {0}")]
    Grammar(String),

    #[error("tree-sitter failed to parse source")]
    Parse,

    /// The source has syntax errors; such files are not analyzed.
    #[error("syntax error at {position}")]
    Syntax { position: Position },

    /// The source nests deeper than the analysis supports.
    #[error("nesting deeper than {limit} levels at {position}")]
    NestingTooDeep { position: Position, limit: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unknown lint: {0}")]
    UnknownLint(String),
}

impl LintError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
