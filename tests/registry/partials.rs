//! Partial definition merging across source files

use idlbind_foundation::ErrorKind;
use idlbind_language::{Declaration, Member, SourceMap, parse_file};
use idlbind_registry::SymbolTable;

/// Registers each `(name, text)` file in order.
fn register(files: &[(&str, &str)]) -> idlbind_foundation::Result<SymbolTable> {
    let mut sources = SourceMap::new();
    let ids: Vec<_> = files
        .iter()
        .map(|(name, text)| sources.add(*name, *text))
        .collect();
    let mut table = SymbolTable::with_sources(sources.clone());
    for id in ids {
        let output = parse_file(&sources, id)?;
        assert!(output.is_clean(), "{:?}", output.errors);
        table.register_definitions(output.definitions)?;
    }
    Ok(table)
}

#[test]
fn partials_from_several_files_merge() {
    let table = register(&[
        ("dom.webidl", "interface Document : Node { readonly attribute DOMString URL; };"),
        ("html.webidl", "partial interface Document { attribute DOMString title; };"),
        ("cssom.webidl", "partial interface Document { readonly attribute StyleSheetList styleSheets; };"),
    ])
    .unwrap();

    let document = table.resolve_interface("Document").unwrap();
    assert_eq!(document.parent.as_deref(), Some("Node"));
    let names: Vec<_> = document.members.iter().map(Member::name).collect();
    assert_eq!(names, vec!["URL", "title", "styleSheets"]);
    assert_eq!(table.fragments("Document").count(), 3);
    assert_eq!(table.fragment_spans("Document").len(), 3);
}

#[test]
fn partial_dictionaries_and_mixins_merge() {
    let table = register(&[
        ("a.webidl", "dictionary EventInit { boolean bubbles = false; };\ninterface mixin ChildNode { undefined remove(); };"),
        ("b.webidl", "partial dictionary EventInit { boolean composed = false; };\npartial interface mixin ChildNode { undefined after(); };"),
    ])
    .unwrap();

    let Declaration::Dictionary(init) = table.resolve("EventInit").unwrap() else {
        panic!("expected dictionary");
    };
    let names: Vec<_> = init.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["bubbles", "composed"]);

    let child = table.resolve("ChildNode").unwrap();
    let names: Vec<_> = child.members().iter().map(Member::name).collect();
    assert_eq!(names, vec!["remove", "after"]);
}

#[test]
fn conflicting_parents_across_files_cite_first_declaration() {
    let err = register(&[
        ("a.webidl", "interface Element : Node {};"),
        ("b.webidl", "\n\ninterface Element : EventTarget {};"),
    ])
    .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::DuplicateDeclaration { .. }));
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("b.webidl"));
    assert_eq!(context.line, Some(3));
    assert!(
        context
            .stack
            .iter()
            .any(|frame| frame.starts_with("first declared at a.webidl:1:"))
    );
}

#[test]
fn overlapping_partial_members_fail() {
    let err = register(&[
        ("a.webidl", "interface Window { attribute DOMString name; };"),
        ("b.webidl", "partial interface Window { attribute DOMString name; };"),
    ])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateDeclaration { .. }));
}
