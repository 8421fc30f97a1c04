//! Build warnings: unresolved references, malformed links, duplicate
//! definitions. Warnings are reported through a [`DiagnosticSink`] and never
//! stop a render.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A cross-reference no registry could resolve.
    UnresolvedXref { target: String },
    /// A comment link written as `` `name`_ ``.
    TrailingUnderscore { target: String },
    /// A `ts:type` role pointing at an unknown type.
    DanglingTypeRef { target: String },
    /// A type defined a second time; the later definition wins.
    DuplicateDefinition { name: String, previous_page: String },
    /// Dedent removed characters that were not whitespace.
    DedentStrippedText,
    /// An emphasized line beyond the end of the sample.
    LineOutOfRange { line: usize, lines: usize },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnresolvedXref { target } => {
                write!(f, "code block contains unresolved xref '{target}'")
            }
            DiagnosticKind::TrailingUnderscore { target } => write!(
                f,
                "code block contains xref to '{target}' with unsupported trailing underscore"
            ),
            DiagnosticKind::DanglingTypeRef { target } => {
                write!(f, "undefined TypeScript type: {target}")
            }
            DiagnosticKind::DuplicateDefinition {
                name,
                previous_page,
            } => write!(
                f,
                "duplicate definition of type '{name}', overriding the one in '{previous_page}'"
            ),
            DiagnosticKind::DedentStrippedText => write!(f, "non-whitespace stripped by dedent"),
            DiagnosticKind::LineOutOfRange { line, lines } => {
                write!(f, "line number spec is out of range(1-{lines}): {line}")
            }
        }
    }
}

/// A warning with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub page: String,
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.page, self.line, self.kind)
    }
}

/// Receiver for build warnings. Shared across rendering threads.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Logs every diagnostic as a `warn` event and counts them.
#[derive(Debug, Default)]
pub struct TracingSink {
    count: AtomicUsize,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.count.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            page = %diagnostic.page,
            line = diagnostic.line,
            "{}",
            diagnostic.kind
        );
    }
}

/// Keeps diagnostics in memory, mostly for tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.items.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.items.lock().push(diagnostic);
    }
}
