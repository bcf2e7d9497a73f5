//! Error types for the idlbind pipeline.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for idlbind operations.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating one if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Returns false only for errors the pipeline can recover from.
    ///
    /// A syntax error skips one declaration; everything else means the
    /// model cannot be flattened or emitted.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self.kind, ErrorKind::Syntax { .. })
    }

    /// Creates a syntax error at the given position.
    #[must_use]
    pub fn syntax(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::new(ErrorKind::Syntax {
            message: message.into(),
            line,
            column,
        })
    }

    /// Creates a duplicate declaration error.
    #[must_use]
    pub fn duplicate_declaration(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateDeclaration {
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unknown symbol error.
    #[must_use]
    pub fn unknown_symbol(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownSymbol(name.into()))
    }

    /// Creates an unresolved type error.
    #[must_use]
    pub fn unresolved_type(
        type_name: impl Into<String>,
        member: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnresolvedType {
            type_name: type_name.into(),
            member: member.into(),
            owner: owner.into(),
        })
    }

    /// Creates an invalid extended attribute error.
    #[must_use]
    pub fn invalid_extended_attribute(
        attribute: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidExtendedAttribute {
            attribute: attribute.into(),
            target: target.into(),
            reason: reason.into(),
        })
    }

    /// Creates a cyclic inheritance error from the visited chain.
    ///
    /// The chain ends with the name that was revisited.
    #[must_use]
    pub fn cyclic_inheritance(chain: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicInheritance { chain })
    }

    /// Creates a cyclic typedef error from the expansion chain.
    #[must_use]
    pub fn cyclic_typedef(chain: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicTypedef { chain })
    }

    /// Creates an invalid enum error.
    #[must_use]
    pub fn invalid_enum(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidEnum {
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Creates a duplicate member error.
    #[must_use]
    pub fn duplicate_member(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateMember {
            owner: owner.into(),
            member: member.into(),
        })
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(
        operation: impl Into<String>,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidParameter {
            operation: operation.into(),
            parameter: parameter.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid default value error.
    #[must_use]
    pub fn invalid_default(
        target: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidDefault {
            target: target.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates a kind mismatch error.
    #[must_use]
    pub fn kind_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::KindMismatch {
            name: name.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Malformed declaration text. The declaration is skipped.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// Description of the problem.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// A name was declared twice in a way that cannot be merged.
    #[error("duplicate declaration of `{name}`: {reason}")]
    DuplicateDeclaration {
        /// The declared name.
        name: String,
        /// Why the definitions conflict.
        reason: String,
    },

    /// A referenced declaration does not exist.
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    /// A type reference in a member signature does not resolve.
    #[error("unresolved type `{type_name}` in `{owner}.{member}`")]
    UnresolvedType {
        /// The type name that failed to resolve.
        type_name: String,
        /// The member that references it.
        member: String,
        /// The declaration owning the member.
        owner: String,
    },

    /// An extended attribute appears where it is not supported.
    #[error("extended attribute [{attribute}] is not valid on {target}: {reason}")]
    InvalidExtendedAttribute {
        /// The extended attribute name.
        attribute: String,
        /// Description of the annotated declaration or member.
        target: String,
        /// Why it is rejected.
        reason: String,
    },

    /// An inheritance chain revisits an interface.
    #[error("cyclic inheritance: {}", chain.join(" -> "))]
    CyclicInheritance {
        /// The chain walked, ending with the repeated name.
        chain: Vec<String>,
    },

    /// A typedef expands to itself.
    #[error("cyclic typedef: {}", chain.join(" -> "))]
    CyclicTypedef {
        /// The typedefs expanded, ending with the repeated name.
        chain: Vec<String>,
    },

    /// An enum is empty or repeats a value.
    #[error("invalid enum `{name}`: {reason}")]
    InvalidEnum {
        /// The enum name.
        name: String,
        /// What is wrong with its values.
        reason: String,
    },

    /// Two members collide within one declaration's scope.
    #[error("duplicate member `{member}` in `{owner}`")]
    DuplicateMember {
        /// The owning declaration.
        owner: String,
        /// The colliding member name.
        member: String,
    },

    /// An operation parameter list is malformed.
    #[error("invalid parameter `{parameter}` of `{operation}`: {reason}")]
    InvalidParameter {
        /// The operation name.
        operation: String,
        /// The parameter name.
        parameter: String,
        /// What is wrong.
        reason: String,
    },

    /// A default or constant value does not match its declared type.
    #[error("invalid default for {target}: expected {expected}, found {found}")]
    InvalidDefault {
        /// The parameter, member or constant carrying the value.
        target: String,
        /// Description of acceptable values.
        expected: String,
        /// The literal that was given.
        found: String,
    },

    /// A name resolved to the wrong kind of declaration.
    #[error("`{name}` is a {found}, expected {expected}")]
    KindMismatch {
        /// The referenced name.
        name: String,
        /// The kind that was required.
        expected: String,
        /// The kind that was found.
        found: String,
    },

    /// Reading sources or writing output failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Encoding the binding model failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Source file the declaration came from.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<u32>,
    /// Column number in source.
    pub column: Option<u32>,
    /// Enclosing declarations and members, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        for frame in &self.stack {
            write!(f, "\n  {frame}")?;
        }
        Ok(())
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
