//! Structured Feedback Module
//!
//! Machine-readable output for a scan:
//! - the token list
//! - JSON error reports with codes and locations
//! - scan statistics

use serde::{Deserialize, Serialize};

use crate::frontend::scanner::ScanResult;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::Error;

// ==================== Structured Error Report ====================

/// A structured error report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0001")
    pub code: String,

    /// Error severity
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Location information
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl ErrorReport {
    /// Create an error report from a lexical error
    pub fn from_error(error: &Error, file_name: &str) -> Self {
        let span = error.span();
        Self {
            code: error.code().to_string(),
            severity: Severity::Error,
            message: error.to_string(),
            location: Location { file: file_name.to_string(), line: span.line, column: span.column },
        }
    }
}

// ==================== Scan Feedback ====================

/// Complete feedback for one scanned file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFeedback {
    /// True when no lexical error occurred
    pub success: bool,

    /// Source file
    pub source_file: String,

    /// All tokens, EOF included
    pub tokens: Vec<Token>,

    /// All diagnostics
    pub diagnostics: Vec<ErrorReport>,

    /// Scan statistics
    pub stats: ScanStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Tokens excluding the trailing EOF
    pub token_count: usize,

    /// Reserved words among them
    pub keyword_count: usize,

    pub error_count: usize,

    /// Line the scan ended on
    pub line_count: usize,
}

impl ScanFeedback {
    pub fn from_result(result: &ScanResult, file_name: &str) -> Self {
        let tokens: Vec<Token> = result.tokens.clone();
        let stats = ScanStats {
            token_count: tokens.iter().filter(|t| t.kind != TokenKind::Eof).count(),
            keyword_count: tokens.iter().filter(|t| t.kind.is_keyword()).count(),
            error_count: result.errors.len(),
            line_count: tokens.last().map_or(1, Token::line),
        };

        Self {
            success: !result.had_error(),
            source_file: file_name.to_string(),
            tokens,
            diagnostics: result.errors.iter().map(|e| ErrorReport::from_error(e, file_name)).collect(),
            stats,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
