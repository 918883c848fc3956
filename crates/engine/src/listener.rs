//! The diagnostic listener contract.
//!
//! Parsers and transformers report problems as [`Diagnostic`]s. A listener
//! decides what survives: warnings are data-quality notices and processing
//! continues; errors and fatals mean the current document's output can no
//! longer be trusted, so they are re-raised and the document is abandoned.

use crate::error::EngineError;
use std::fmt;

/// How serious a reported diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal error",
        };
        write!(f, "{word}")
    }
}

/// Source position a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

/// A single parser or transform diagnostic. Consumed synchronously, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Fatal, message)
    }

    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.location = Some(Location { line, col });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {} ({})", self.severity, self.message, location),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Intercepts diagnostics raised during parsing or transformation.
///
/// Each call stands alone; implementations hold no state across calls.
pub trait ErrorListener: Send + Sync {
    /// A non-fatal notice. Processing continues.
    fn warning(&self, diagnostic: &Diagnostic);

    /// Logged, then re-raised; the caller abandons the current document.
    fn error(&self, diagnostic: Diagnostic) -> Result<(), EngineError>;

    fn fatal(&self, diagnostic: Diagnostic) -> Result<(), EngineError>;
}

/// Default listener: logs through the `log` facade and re-raises anything
/// above warning severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogListener;

impl ErrorListener for LogListener {
    fn warning(&self, diagnostic: &Diagnostic) {
        log::warn!("{diagnostic}");
    }

    fn error(&self, diagnostic: Diagnostic) -> Result<(), EngineError> {
        log::error!("{diagnostic}");
        Err(EngineError::Diagnostic(diagnostic))
    }

    fn fatal(&self, diagnostic: Diagnostic) -> Result<(), EngineError> {
        log::error!("{diagnostic}");
        Err(EngineError::Diagnostic(diagnostic))
    }
}
