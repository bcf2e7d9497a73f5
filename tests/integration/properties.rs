//! Observable guarantees of a full run.

use idlbind_emit::MemberDetail;
use idlbind_foundation::ErrorKind;
use idlbind_runtime::{GeneratorConfig, Pipeline, RunOutput};

fn run(sources: &[(&str, &str)]) -> idlbind_foundation::Result<RunOutput> {
    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    for (name, text) in sources {
        pipeline.add_source_text(*name, *text);
    }
    pipeline.run()
}

fn names(output: &RunOutput, interface: &str) -> Vec<String> {
    output
        .model
        .interface(interface)
        .unwrap()
        .members
        .iter()
        .map(|m| m.name.clone())
        .collect()
}

#[test]
fn ancestors_come_first() {
    let output = run(&[(
        "base.webidl",
        "interface Base { attribute long x; }; interface Derived : Base { attribute long y; };",
    )])
    .unwrap();
    assert_eq!(names(&output, "Derived"), vec!["x", "y"]);

    let derived = output.model.interface("Derived").unwrap();
    assert_eq!(derived.ancestry, vec!["Base", "Derived"]);
    assert_eq!(derived.member("x").unwrap().origin, "Base");
    assert_eq!(derived.member("x").unwrap().depth, 0);
    assert_eq!(derived.member("y").unwrap().depth, 1);
}

#[test]
fn every_interface_is_flattened() {
    let output = run(&[(
        "chain.webidl",
        r"
        interface A { attribute long a; };
        interface B : A { attribute long b; };
        interface C : B { attribute long c; };
        interface D : C { attribute long d; };",
    )])
    .unwrap();
    assert_eq!(names(&output, "A"), vec!["a"]);
    assert_eq!(names(&output, "B"), vec!["a", "b"]);
    assert_eq!(names(&output, "D"), vec!["a", "b", "c", "d"]);
    assert_eq!(output.model.interface("D").unwrap().depth, 3);
}

#[test]
fn cycles_are_reported() {
    let err = run(&[("cycle.webidl", "interface A : B {}; interface B : A {};")]).unwrap_err();
    let ErrorKind::CyclicInheritance { chain } = &err.kind else {
        panic!("expected cyclic inheritance, got {err}");
    };
    assert!(chain.iter().any(|n| n == "A"));
    assert!(chain.iter().any(|n| n == "B"));
    assert_eq!(chain.first(), chain.last());
}

#[test]
fn unknown_parent_is_named() {
    let err = run(&[("x.webidl", "interface X : Y {};")]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownSymbol("Y".into()));
}

#[test]
fn partials_merge_across_files() {
    let output = run(&[
        ("late.webidl", "partial interface Document { undefined open(); };"),
        (
            "document.webidl",
            "[Exposed=Window] interface Document : Node { attribute DOMString title; };",
        ),
        ("node.webidl", "[Exposed=Window] interface Node {};"),
    ])
    .unwrap();
    assert_eq!(names(&output, "Document"), vec!["open", "title"]);
    let document = output.model.interface("Document").unwrap();
    assert_eq!(document.parent.as_deref(), Some("Node"));
    assert_eq!(document.exposure, vec!["Window"]);
}

#[test]
fn conflicting_parents_cite_both_files() {
    let err = run(&[
        ("a.webidl", "interface A : B {}; interface B {};"),
        ("b.webidl", "interface C {};\ninterface A : C {};"),
    ])
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateDeclaration { ref name, .. } if name == "A"));

    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("b.webidl"));
    assert_eq!(context.line, Some(2));
    assert!(
        context
            .stack
            .iter()
            .any(|frame| frame.starts_with("first declared at a.webidl:1:")),
        "{:?}",
        context.stack
    );
}

#[test]
fn repeated_enum_value_is_cited() {
    let err = run(&[("enum.webidl", r#"enum E { "a", "a" };"#)]).unwrap_err();
    let ErrorKind::InvalidEnum { name, reason } = &err.kind else {
        panic!("expected invalid enum, got {err}");
    };
    assert_eq!(name, "E");
    assert!(reason.contains("\"a\""));
}

#[test]
fn mixins_enter_at_the_including_level() {
    let output = run(&[(
        "mixins.webidl",
        r"
        interface Node { attribute long nodeType; };
        interface Element : Node { attribute DOMString id; };
        interface mixin ChildNode { undefined remove(); };
        Element includes ChildNode;",
    )])
    .unwrap();
    let element = output.model.interface("Element").unwrap();
    let remove = element.member("remove").unwrap();
    assert!(remove.from_mixin);
    assert_eq!(remove.origin, "ChildNode");
    assert_eq!(remove.depth, 1);
    assert!(matches!(remove.detail, MemberDetail::Operation { .. }));
    assert!(output.model.interface("ChildNode").is_none());
}

#[test]
fn derived_overloads_extend_the_set() {
    let output = run(&[(
        "overloads.webidl",
        r"
        interface Base { undefined send(DOMString data); undefined close(); };
        interface Socket : Base { undefined send(Blob data); };
        interface Blob {};",
    )])
    .unwrap();
    let socket = output.model.interface("Socket").unwrap();
    assert_eq!(socket.overloads("send").count(), 2);
    assert_eq!(names(&output, "Socket"), vec!["send", "close", "send"]);
    assert_eq!(socket.members[2].origin, "Socket");
}
