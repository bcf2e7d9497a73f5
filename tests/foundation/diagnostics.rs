//! Integration tests for Diagnostics
//!
//! Tests accumulation, counting, and display.

use idlbind_foundation::{Diagnostics, Error, ErrorContext, Severity};

#[test]
fn diagnostics_accumulate_in_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.warning(Error::invalid_extended_attribute(
        "Frobnicate",
        "attribute x",
        "unrecognized extended attribute",
    ));
    diagnostics.error(Error::syntax("expected `;`", 4, 2));

    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.count(Severity::Warning), 1);
    let severities: Vec<_> = diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(severities, vec![Severity::Warning, Severity::Error]);
}

#[test]
fn warnings_alone_are_not_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.warning(Error::invalid_extended_attribute("X", "interface A", "unknown"));
    assert!(!diagnostics.has_errors());
}

#[test]
fn extend_merges_runs() {
    let mut first = Diagnostics::new();
    first.error(Error::syntax("a", 1, 1));
    let mut second = Diagnostics::new();
    second.error(Error::syntax("b", 2, 1));
    second.warning(Error::syntax("c", 3, 1));
    first.extend(second);
    assert_eq!(first.len(), 3);
    assert_eq!(first.count(Severity::Error), 2);
}

#[test]
fn diagnostic_display_includes_location() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.error(
        Error::syntax("expected identifier", 2, 9)
            .with_context(ErrorContext::new().with_source("bad.webidl").with_position(2, 9)),
    );
    let text = diagnostics.iter().next().unwrap().to_string();
    assert!(text.starts_with("error: syntax error at 2:9: expected identifier"));
    assert!(text.contains("at bad.webidl:2:9"));
}
