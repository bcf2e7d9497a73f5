//! Symbol lookup and kind queries

use idlbind_foundation::ErrorKind;
use idlbind_language::{DeclarationKind, parse};
use idlbind_registry::SymbolTable;

fn table(source: &str) -> SymbolTable {
    let mut table = SymbolTable::new();
    table.register_definitions(parse(source).definitions).unwrap();
    table
}

#[test]
fn kinds_of_declarations() {
    let table = table(
        r#"
        interface Node {};
        interface mixin ChildNode {};
        callback interface EventListener { undefined handleEvent(Event e); };
        callback EventHandlerNonNull = any (Event event);
        dictionary EventInit {};
        enum ShadowRootMode { "open", "closed" };
        typedef unsigned long long DOMTimeStamp;
        "#,
    );
    assert_eq!(table.len(), 7);
    assert_eq!(table.kind_of("Node"), Some(DeclarationKind::Interface));
    assert_eq!(table.kind_of("ChildNode"), Some(DeclarationKind::InterfaceMixin));
    assert_eq!(
        table.kind_of("EventListener"),
        Some(DeclarationKind::CallbackInterface)
    );
    assert_eq!(
        table.kind_of("EventHandlerNonNull"),
        Some(DeclarationKind::CallbackFunction)
    );
    assert_eq!(table.kind_of("DOMTimeStamp"), Some(DeclarationKind::Typedef));
    assert_eq!(table.kind_of("Window"), None);
}

#[test]
fn unknown_names_report_the_name() {
    let table = table("interface Node {};");
    let err = table.resolve("Element").unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnknownSymbol(name) if name == "Element"));
    assert!(!table.contains("Element"));
    assert!(table.get("Node").is_some());
}

#[test]
fn mixins_of_lists_applied_mixins() {
    let table = table(
        r"
        interface Element {};
        interface mixin ParentNode {};
        interface mixin ChildNode {};
        Element includes ParentNode;
        Element includes ChildNode;
        ",
    );
    let mixins: Vec<_> = table.mixins_of("Element").collect();
    assert_eq!(mixins, vec!["ParentNode", "ChildNode"]);
    assert_eq!(table.interfaces().count(), 1);
}

#[test]
fn duplicate_enum_value_cites_value() {
    let mut table = SymbolTable::new();
    let err = table
        .register_definitions(parse(r#"enum E { "a", "a" };"#).definitions)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidEnum { .. }));
    assert!(err.to_string().contains("\"a\""));
    assert!(table.is_empty());
}
