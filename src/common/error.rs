//! Failure model shared by every compiler phase.
//!
//! All lexical, syntax and semantic failures are positioned: they carry the
//! file, line and column of the offending token, and render in the
//! `<file>:<line>:<col>: <message>` form the CLI reports on stderr.

use std::{io, path::PathBuf};

use crate::common::Position;

/// A positioned compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, position: Position, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            position,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.position, self.message)
    }
}

/// List of all errors that could possibly stop a compilation.
#[derive(Debug)]
pub enum CompileError {
    Lexical(Diagnostic),
    Syntax(Diagnostic),
    Semantic(Diagnostic),
    Io { path: PathBuf, error: io::Error },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexical(diagnostic) | Self::Syntax(diagnostic) | Self::Semantic(diagnostic) => {
                write!(f, "{diagnostic}")
            }
            Self::Io { path, error } => write!(f, "{}: {error}", path.display()),
        }
    }
}

impl std::error::Error for CompileError {}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::{CompileError, Diagnostic};
    use crate::common::Position;

    #[test]
    fn test_diagnostic_format() {
        let diagnostic = Diagnostic::new("Main.jack", Position::new(3, 14), "Missing ';'");

        assert_eq!(diagnostic.to_string(), "Main.jack:3:14: Missing ';'");
    }

    #[test]
    fn test_error_display_matches_diagnostic() {
        let error = CompileError::Syntax(Diagnostic::new(
            "Square.jack",
            Position::new(1, 7),
            "Expected '{'",
        ));

        assert_eq!(error.to_string(), "Square.jack:1:7: Expected '{'");
    }
}
