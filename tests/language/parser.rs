//! Parser integration tests
//!
//! Tests parsing of DOM-shaped declarations and recovery across them.

use idlbind_foundation::Primitive;
use idlbind_language::{
    Declaration, DeclarationKind, Definition, ExtendedAttributeValue, Literal, MemberKind,
    SourceMap, Special, TypeRef, parse, parse_file,
};

const DOM: &str = r#"
    [Exposed=Window]
    interface Node : EventTarget {
      const unsigned short ELEMENT_NODE = 1;
      readonly attribute DOMString nodeName;
      [CEReactions] attribute DOMString? textContent;
      [CEReactions, NewObject] Node cloneNode(optional boolean subtree = false);
    };

    partial interface Node {
      boolean isSameNode(Node? otherNode);
    };

    interface mixin ChildNode {
      [CEReactions, Unscopable] undefined remove();
    };
    Node includes ChildNode;

    [Exposed=Window, LegacyFactoryFunction=Image(optional unsigned long width)]
    interface HTMLImageElement : HTMLElement {
      [HTMLConstructor] constructor();
    };

    interface HTMLCollection {
      getter Element? item(unsigned long index);
      iterable<Element>;
    };

    enum ShadowRootMode { "open", "closed" };
    typedef (Node or DOMString) NodeOrString;
    callback EventHandlerNonNull = any (Event event);
    dictionary FocusEventInit : EventInit { EventTarget? relatedTarget = null; };
"#;

fn declarations(source: &str) -> Vec<Declaration> {
    let output = parse(source);
    assert!(output.is_clean(), "unexpected errors: {:?}", output.errors);
    output.declarations().cloned().collect()
}

#[test]
fn dom_fixture_declarations() {
    let decls = declarations(DOM);
    let kinds: Vec<_> = decls.iter().map(Declaration::kind).collect();
    assert_eq!(
        kinds,
        vec![
            DeclarationKind::Interface,
            DeclarationKind::Interface,
            DeclarationKind::InterfaceMixin,
            DeclarationKind::Interface,
            DeclarationKind::Interface,
            DeclarationKind::Enum,
            DeclarationKind::Typedef,
            DeclarationKind::CallbackFunction,
            DeclarationKind::Dictionary,
        ]
    );
    assert!(decls[1].is_partial());
}

#[test]
fn includes_statements_are_definitions() {
    let output = parse(DOM);
    let includes: Vec<_> = output.includes().collect();
    assert_eq!(includes.len(), 1);
    assert_eq!(includes[0].target, "Node");
    assert_eq!(includes[0].mixin, "ChildNode");
    assert!(
        output
            .definitions
            .iter()
            .any(|d| matches!(d, Definition::Includes(_)))
    );
}

#[test]
fn node_members() {
    let decls = declarations(DOM);
    let node = decls[0].as_interface().unwrap();
    assert_eq!(node.parent.as_deref(), Some("EventTarget"));
    let kinds: Vec<_> = node.members.iter().map(|m| (m.name(), m.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            ("ELEMENT_NODE", MemberKind::Constant),
            ("nodeName", MemberKind::Attribute),
            ("textContent", MemberKind::Attribute),
            ("cloneNode", MemberKind::Operation),
        ]
    );

    let clone = node.members[3].as_operation().unwrap();
    assert!(clone.new_object() && clone.ce_reactions());
    assert_eq!(clone.arguments[0].default, Some(Literal::Boolean(false)));
    assert!(clone.arguments[0].optional);
}

#[test]
fn constructors_and_factories() {
    let decls = declarations(DOM);
    let image = decls[3].as_interface().unwrap();
    assert!(image.has_constructor());
    assert_eq!(image.legacy_factory_functions(), vec!["Image"]);
    let factory = image.attributes.get("LegacyFactoryFunction").unwrap();
    let ExtendedAttributeValue::NamedArgumentList { name, arguments } = &factory.value else {
        panic!("expected a named argument list");
    };
    assert_eq!(name, "Image");
    assert_eq!(arguments.len(), 1);
}

#[test]
fn special_operations_and_collections() {
    let decls = declarations(DOM);
    let collection = decls[4].as_interface().unwrap();
    let item = collection.members[0].as_operation().unwrap();
    assert_eq!(item.special, Some(Special::Getter));
    assert_eq!(item.display_name(), "item");
    assert!(collection.collection.is_some());
}

#[test]
fn typedef_union() {
    let decls = declarations(DOM);
    let Declaration::Typedef(typedef) = &decls[6] else {
        panic!("expected typedef");
    };
    assert_eq!(
        typedef.ty,
        TypeRef::Union(vec![
            TypeRef::named("Node"),
            TypeRef::Primitive(Primitive::DomString)
        ])
    );
}

#[test]
fn recovery_keeps_later_declarations() {
    let mut sources = SourceMap::new();
    let id = sources.add(
        "broken.webidl",
        "interface A { attribute long; };\nenum E { \"x\" };\ninterface B : A {};",
    );
    let output = parse_file(&sources, id).unwrap();
    assert_eq!(output.errors.len(), 1);
    let names: Vec<_> = output.declarations().map(Declaration::name).collect();
    assert_eq!(names, vec!["E", "B"]);
    assert_eq!(
        output.errors[0].context.as_ref().unwrap().source.as_deref(),
        Some("broken.webidl")
    );
}
