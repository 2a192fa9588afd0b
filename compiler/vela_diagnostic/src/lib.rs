//! Diagnostic system for the Vela front end.
//!
//! Diagnostics are plain values: a code, a message, an optional primary
//! location, secondary labels, and help lines. The parser appends them to a
//! [`DiagnosticQueue`], which keeps a sticky failure flag; rendering is a
//! separate concern handled by [`emitter`].

pub mod emitter;
mod error_code;
mod queue;
pub mod span_utils;

pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;

use vela_ir::Loc;

/// How serious a diagnostic is.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn describe(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

/// A secondary location attached to a diagnostic, e.g. "the previous
/// definition is here".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Label {
    pub loc: Loc,
    pub message: String,
}

/// One reported problem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// Where the problem is. Absent for file-level I/O failures.
    pub primary: Option<Loc>,
    pub labels: Vec<Label>,
    /// Free-form extra lines, e.g. the module paths that were tried.
    pub help: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            primary: None,
            labels: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code, message)
        }
    }

    #[must_use]
    pub fn at(mut self, loc: Loc) -> Self {
        self.primary = Some(loc);
        self
    }

    #[must_use]
    pub fn with_label(mut self, loc: Loc, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            loc,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn with_help(mut self, line: impl Into<String>) -> Self {
        self.help.push(line.into());
        self
    }
}
