//! Lexical errors for Sharlox

use crate::utils::Span;
use thiserror::Error;

/// Lexical error recorded by the scanner
///
/// These never abort a scan; the scanner collects them and keeps going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unexpected character: {ch}")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("Unterminated string.")]
    UnterminatedString { span: Span },
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedCharacter { span, .. } => *span,
            Self::UnterminatedString { span } => *span,
        }
    }

    /// Line the error is reported on
    pub fn line(&self) -> usize {
        self.span().line
    }

    /// Stable error code used in structured reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. } => "E0001",
            Self::UnterminatedString { .. } => "E0002",
        }
    }

    /// Render the diagnostic line written to stderr
    pub fn report(&self) -> String {
        format!("[line {}] Error: {}", self.line(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let err = Error::UnexpectedCharacter { ch: '$', span: Span::new(0, 1, 3, 1) };
        assert_eq!(err.report(), "[line 3] Error: Unexpected character: $");
        assert_eq!(err.code(), "E0001");

        let err = Error::UnterminatedString { span: Span::new(5, 9, 1, 6) };
        assert_eq!(err.report(), "[line 1] Error: Unterminated string.");
        assert_eq!(err.code(), "E0002");
    }
}
