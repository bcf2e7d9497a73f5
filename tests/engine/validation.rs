//! Validation integration tests

use idlbind_engine::{
    MixinCollision, ResolvedSignature, ResolvedType, ResolverPolicy, Validator, ValidatorOptions,
    validate,
};
use idlbind_foundation::{ErrorKind, Primitive, Severity};
use idlbind_language::{DeclarationKind, parse};
use idlbind_registry::SymbolTable;

fn table(source: &str) -> SymbolTable {
    let output = parse(source);
    assert!(output.is_clean(), "{:?}", output.errors);
    let mut table = SymbolTable::new();
    table.register_definitions(output.definitions).unwrap();
    table
}

const DOM: &str = r#"
    typedef (Node or DOMString) NodeOrString;
    typedef unsigned long long DOMHighResTimeStamp;

    [Exposed=Window]
    interface EventTarget {
      constructor();
      undefined addEventListener(DOMString type, EventListener? callback);
    };
    callback interface EventListener { undefined handleEvent(Event event); };

    [Exposed=(Window,Worker)]
    interface Event {
      constructor(DOMString type, optional EventInit eventInitDict = {});
      readonly attribute DOMHighResTimeStamp timeStamp;
    };
    dictionary EventInit { boolean bubbles = false; };

    [Exposed=Window]
    interface Node : EventTarget {
      const unsigned short ELEMENT_NODE = 1;
      [CEReactions] attribute DOMString? textContent;
    };
    interface mixin ChildNode {
      [CEReactions, Unscopable] undefined before(NodeOrString... nodes);
    };
    Node includes ChildNode;
"#;

#[test]
fn dom_fixture_validates() {
    let t = table(DOM);
    let model = validate(&t).unwrap();
    assert!(model.diagnostics().is_empty());
    assert_eq!(model.interfaces().len(), 3);
    assert_eq!(model.callback_interfaces().len(), 1);
    assert_eq!(model.dictionaries().len(), 1);
    assert_eq!(model.typedefs().len(), 2);
}

#[test]
fn typedefs_are_expanded_in_signatures() {
    let t = table(DOM);
    let model = validate(&t).unwrap();
    let event = model.interface("Event").unwrap();
    let time_stamp = event
        .members
        .iter()
        .find(|m| m.name() == "timeStamp")
        .unwrap();
    assert_eq!(
        time_stamp.signature,
        ResolvedSignature::Attribute {
            ty: ResolvedType::primitive(Primitive::UnsignedLongLong)
        }
    );

    let node = model.interface("Node").unwrap();
    let before = node.members.iter().find(|m| m.name() == "before").unwrap();
    let ResolvedSignature::Operation { arguments, .. } = &before.signature else {
        panic!("expected operation");
    };
    let ResolvedType::Union { members } = &arguments[0].ty else {
        panic!("expected union, got {}", arguments[0].ty);
    };
    assert_eq!(members[0].named_kind(), Some(DeclarationKind::Interface));
    assert!(arguments[0].variadic);
}

#[test]
fn unresolved_type_names_owner_and_member() {
    let t = table("interface Window { attribute Frobnicator frob; };");
    let err = validate(&t).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedType {
            type_name: "Frobnicator".into(),
            member: "frob".into(),
            owner: "Window".into(),
        }
    );
}

#[test]
fn mixin_used_as_type_is_kind_mismatch() {
    let t = table("interface mixin ChildNode {}; interface A { attribute ChildNode c; };");
    let err = validate(&t).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::KindMismatch { .. }));
}

#[test]
fn unknown_attributes_are_warnings_unless_strict() {
    let source = "[Exposed=Window, Pref=\"dom.webgpu\"] interface GPU {};";
    let t = table(source);
    let lenient = validate(&t).unwrap();
    assert_eq!(lenient.diagnostics().count(Severity::Warning), 1);

    let err = Validator::with_options(&t, ValidatorOptions::strict())
        .validate()
        .unwrap_err();
    assert!(matches!(
        &err.kind,
        ErrorKind::InvalidExtendedAttribute { attribute, .. } if attribute == "Pref"
    ));
}

#[test]
fn policy_applies_during_validation() {
    let t = table(
        r"
        interface Base { attribute long x; };
        interface mixin M { attribute long x; };
        interface Derived : Base {};
        Derived includes M;
        ",
    );
    assert!(validate(&t).is_ok());
    let options = ValidatorOptions::default()
        .with_policy(ResolverPolicy::default().with_mixin_collision(MixinCollision::Reject));
    let err = Validator::with_options(&t, options).validate().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateMember { .. }));
}

#[test]
fn cyclic_inheritance_fails_validation() {
    let t = table("interface A : B {}; interface B : A {};");
    let err = validate(&t).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CyclicInheritance { .. }));
}
