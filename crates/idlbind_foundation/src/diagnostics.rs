//! Collected, non-fatal diagnostics.
//!
//! Recoverable problems (malformed declarations, unknown extended
//! attributes) are accumulated here and reported together at the end of a
//! run instead of aborting on the first one.

use std::fmt;

use crate::error::Error;

/// How serious a collected diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Worth reporting, does not affect the output.
    Warning,
    /// A declaration was dropped from the model.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single reported problem.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity of the problem.
    pub severity: Severity,
    /// The underlying error.
    pub error: Error,
}

impl Diagnostic {
    /// Creates an error-level diagnostic.
    #[must_use]
    pub fn error(error: Error) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    /// Creates a warning-level diagnostic.
    #[must_use]
    pub fn warning(error: Error) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.error)?;
        if let Some(context) = &self.error.context {
            write!(f, " {context}")?;
        }
        Ok(())
    }
}

/// An ordered list of diagnostics gathered across a run.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Records an error-level diagnostic.
    pub fn error(&mut self, error: Error) {
        self.push(Diagnostic::error(error));
    }

    /// Records a warning-level diagnostic.
    pub fn warning(&mut self, error: Error) {
        self.push(Diagnostic::warning(error));
    }

    /// Moves every diagnostic from `other` into this list.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if any error-level diagnostic was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Counts diagnostics of the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Iterates diagnostics in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
