//! Integration tests for Error types
//!
//! Tests error construction, display, context, and fatality.

use idlbind_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_duplicate_declaration() {
    let err = Error::duplicate_declaration("Node", "conflicting parents EventTarget and Object");
    assert!(matches!(err.kind, ErrorKind::DuplicateDeclaration { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("Node"));
    assert!(msg.contains("conflicting parents"));
}

#[test]
fn error_unknown_symbol() {
    let err = Error::unknown_symbol("Y");
    assert!(matches!(&err.kind, ErrorKind::UnknownSymbol(name) if name == "Y"));
    assert_eq!(format!("{err}"), "unknown symbol `Y`");
}

#[test]
fn error_invalid_enum() {
    let err = Error::invalid_enum("E", "duplicate value \"a\"");
    let msg = format!("{err}");
    assert!(msg.contains("`E`"));
    assert!(msg.contains("\"a\""));
}

#[test]
fn error_invalid_default() {
    let err = Error::invalid_default("argument force", "a boolean", "\"yes\"");
    assert_eq!(
        format!("{err}"),
        "invalid default for argument force: expected a boolean, found \"yes\""
    );
}

#[test]
fn error_kind_mismatch() {
    let err = Error::kind_mismatch("ChildNode", "interface", "interface mixin");
    assert_eq!(
        format!("{err}"),
        "`ChildNode` is a interface mixin, expected interface"
    );
}

// =============================================================================
// Fatality
// =============================================================================

#[test]
fn only_syntax_errors_are_recoverable() {
    let recoverable = Error::syntax("unexpected `}`", 1, 1);
    assert!(!recoverable.is_fatal());

    let fatal = [
        Error::duplicate_member("Node", "remove"),
        Error::invalid_parameter("go", "rest", "variadic parameter must be last"),
        Error::cyclic_typedef(vec!["A".into(), "B".into(), "A".into()]),
        Error::io("disk full"),
        Error::config("bad key"),
        Error::new(ErrorKind::Internal("oops".into())),
    ];
    assert!(fatal.iter().all(Error::is_fatal));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_display_with_frames() {
    let context = ErrorContext::new()
        .with_source("dom.webidl")
        .with_position(12, 5)
        .with_frame("in operation cloneNode")
        .with_frame("in interface Node");
    assert_eq!(
        format!("{context}"),
        "at dom.webidl:12:5\n  in operation cloneNode\n  in interface Node"
    );
}

#[test]
fn frames_stack_innermost_first() {
    let err = Error::unresolved_type("Frob", "go", "Node")
        .in_frame("in operation go")
        .in_frame("in interface Node");
    let context = err.context.unwrap();
    assert_eq!(context.stack, vec!["in operation go", "in interface Node"]);
    assert!(context.source.is_none());
}

#[test]
fn with_context_replaces_location() {
    let err = Error::unknown_symbol("Y")
        .in_frame("parent of interface X")
        .with_context(ErrorContext::new().with_source("x.webidl"));
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("x.webidl"));
    assert!(context.stack.is_empty());
}
