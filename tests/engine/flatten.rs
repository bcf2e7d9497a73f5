//! Inheritance flattening integration tests

use idlbind_engine::{MixinCollision, MixinOrder, Resolver, ResolverPolicy, flatten, resolve_all};
use idlbind_foundation::ErrorKind;
use idlbind_language::parse;
use idlbind_registry::SymbolTable;

fn table(source: &str) -> SymbolTable {
    let output = parse(source);
    assert!(output.is_clean(), "{:?}", output.errors);
    let mut table = SymbolTable::new();
    table.register_definitions(output.definitions).unwrap();
    table
}

fn names(table: &SymbolTable, interface: &str) -> Vec<String> {
    flatten(table, interface)
        .unwrap()
        .members
        .iter()
        .map(|m| m.name().to_string())
        .collect()
}

// =============================================================================
// Chains
// =============================================================================

#[test]
fn base_members_come_first() {
    let t = table("interface Base { attribute long x; }; interface Derived : Base { attribute long y; };");
    assert_eq!(names(&t, "Derived"), vec!["x", "y"]);
    assert_eq!(names(&t, "Base"), vec!["x"]);
}

#[test]
fn dom_chain_depths_and_origins() {
    let t = table(
        r"
        interface EventTarget { undefined addEventListener(DOMString type); };
        interface Node : EventTarget { readonly attribute Node? parentNode; };
        interface Element : Node { attribute DOMString id; };
        interface HTMLElement : Element { attribute DOMString title; };
        ",
    );
    let flat = flatten(&t, "HTMLElement").unwrap();
    assert_eq!(flat.ancestry, vec!["EventTarget", "Node", "Element", "HTMLElement"]);
    assert_eq!(flat.depth(), 3);
    assert_eq!(flat.parent(), Some("Element"));
    let summary: Vec<_> = flat
        .members
        .iter()
        .map(|m| (m.name(), m.origin.as_str(), m.depth))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("addEventListener", "EventTarget", 0),
            ("parentNode", "Node", 1),
            ("id", "Element", 2),
            ("title", "HTMLElement", 3),
        ]
    );
}

#[test]
fn two_cycle_terminates_with_error() {
    let t = table("interface A : B {}; interface B : A {};");
    let err = flatten(&t, "A").unwrap_err();
    let ErrorKind::CyclicInheritance { chain } = &err.kind else {
        panic!("expected cyclic inheritance, got {err}");
    };
    assert_eq!(chain.first(), chain.last());
    assert!(chain.contains(&"B".to_string()));
}

#[test]
fn undeclared_parent_is_named() {
    let t = table("interface X : Y {};");
    let err = flatten(&t, "X").unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnknownSymbol(name) if name == "Y"));
}

// =============================================================================
// Mixins and Shadowing
// =============================================================================

#[test]
fn members_are_unique_by_signature() {
    let t = table(
        r"
        interface Base {
          attribute long shared;
          undefined run(long x);
          undefined run(DOMString s);
        };
        interface Derived : Base {
          attribute long shared;
          undefined run(long x);
          undefined run(boolean b);
        };
        ",
    );
    let flat = flatten(&t, "Derived").unwrap();
    let keys: Vec<_> = flat
        .members
        .iter()
        .map(|m| {
            let signature = m
                .member
                .as_operation()
                .map(|op| op.signature().iter().map(ToString::to_string).collect::<Vec<_>>().join(","))
                .unwrap_or_default();
            (m.name().to_string(), signature, m.origin.clone())
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            ("shared".to_string(), String::new(), "Derived".to_string()),
            ("run".to_string(), "long".to_string(), "Derived".to_string()),
            ("run".to_string(), "DOMString".to_string(), "Base".to_string()),
            ("run".to_string(), "boolean".to_string(), "Derived".to_string()),
        ]
    );
}

#[test]
fn mixin_members_flatten_at_including_level() {
    let t = table(
        r"
        interface Node { readonly attribute Node? parentNode; };
        interface mixin ChildNode { undefined remove(); };
        interface mixin ParentNode { readonly attribute unsigned long childElementCount; };
        interface Element : Node { attribute DOMString id; };
        Element includes ParentNode;
        Element includes ChildNode;
        ",
    );
    let flat = flatten(&t, "Element").unwrap();
    let summary: Vec<_> = flat
        .members
        .iter()
        .map(|m| (m.name(), m.from_mixin, m.depth))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("parentNode", false, 0),
            ("childElementCount", true, 1),
            ("remove", true, 1),
            ("id", false, 1),
        ]
    );

    let alphabetical = Resolver::with_policy(
        &t,
        ResolverPolicy::default().with_mixin_order(MixinOrder::Alphabetical),
    );
    let order: Vec<_> = alphabetical
        .flatten("Element")
        .unwrap()
        .members
        .iter()
        .filter(|m| m.from_mixin)
        .map(|m| m.origin.clone())
        .collect();
    assert_eq!(order, vec!["ChildNode", "ParentNode"]);
}

#[test]
fn collision_policy_decides_inherited_versus_mixin() {
    let t = table(
        r"
        interface Base { attribute long x; };
        interface mixin M { attribute DOMString x; };
        interface Derived : Base {};
        Derived includes M;
        ",
    );
    let origin = |collision| {
        Resolver::with_policy(&t, ResolverPolicy::default().with_mixin_collision(collision))
            .flatten("Derived")
            .map(|f| f.members[0].origin.clone())
    };
    assert_eq!(origin(MixinCollision::KeepInherited).unwrap(), "Base");
    assert_eq!(origin(MixinCollision::Shadow).unwrap(), "M");
    assert!(origin(MixinCollision::Reject).is_err());
}

#[test]
fn resolve_all_covers_interfaces_and_dictionaries() {
    let t = table(
        r"
        interface Node {};
        interface Element : Node {};
        dictionary EventInit { boolean bubbles = false; };
        dictionary FocusEventInit : EventInit { boolean composed = false; };
        ",
    );
    let resolution = resolve_all(&t).unwrap();
    assert_eq!(resolution.interfaces.len(), 2);
    assert_eq!(resolution.dictionaries.len(), 2);
    let focus = resolution
        .dictionaries
        .iter()
        .find(|d| d.name == "FocusEventInit")
        .unwrap();
    assert_eq!(focus.ancestry, vec!["EventInit", "FocusEventInit"]);
}
