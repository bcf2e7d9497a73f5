//! Configuration flowing through a run.

use std::thread;

use idlbind_engine::{MixinCollision, MixinOrder};
use idlbind_foundation::{ErrorKind, Severity};
use idlbind_runtime::{GeneratorConfig, OutputFormat, Pipeline, from_bytes, to_bytes};

const DOCUMENT: &str = r#"
    [Exposed=Window]
    interface Node { readonly attribute DOMString nodeName; };

    [Exposed=Window, Pref="dom.document"]
    interface Document : Node {
      constructor();
      [NewObject] Element createElement(DOMString localName);
      readonly attribute DOMString title;
    };

    [Exposed=Window]
    interface Element : Node { attribute DOMString title; };

    interface mixin NonElementParentNode { Element? getElementById(DOMString elementId); };
    interface mixin DocumentOrShadowRoot { readonly attribute Element? activeElement; };
    Document includes NonElementParentNode;
    Document includes DocumentOrShadowRoot;
"#;

fn pipeline(config: GeneratorConfig) -> Pipeline {
    let mut pipeline = Pipeline::new(config);
    pipeline.add_source_text("document.webidl", DOCUMENT);
    pipeline
}

#[test]
fn unknown_attributes_depend_on_strictness() {
    let output = pipeline(GeneratorConfig::default()).run().unwrap();
    assert_eq!(output.diagnostics.count(Severity::Warning), 1);
    assert!(!output.diagnostics.has_errors());
    let warning = output.diagnostics.iter().next().unwrap();
    assert!(warning.to_string().contains("Pref"));

    let err = pipeline(GeneratorConfig::default().with_strict(true))
        .run()
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidExtendedAttribute { ref attribute, .. } if attribute == "Pref"
    ));
}

#[test]
fn mixin_order_follows_configuration() {
    let declared = pipeline(GeneratorConfig::default()).run().unwrap().model;
    let sorted = pipeline(GeneratorConfig::default().with_mixin_order(MixinOrder::Alphabetical))
        .run()
        .unwrap()
        .model;

    let own = |model: &idlbind_emit::BindingModel| -> Vec<String> {
        model
            .interface("Document")
            .unwrap()
            .own_members()
            .map(|m| m.name.clone())
            .collect()
    };
    assert_eq!(
        own(&declared),
        vec!["getElementById", "activeElement", "createElement", "title"]
    );
    assert_eq!(
        own(&sorted),
        vec!["activeElement", "getElementById", "createElement", "title"]
    );
}

#[test]
fn collision_policy_follows_configuration() {
    let source = r"
        interface Base { attribute long shared; };
        interface mixin Extra { attribute DOMString shared; };
        interface Derived : Base {};
        Derived includes Extra;
    ";
    let run = |config: GeneratorConfig| {
        let mut pipeline = Pipeline::new(config);
        pipeline.add_source_text("collide.webidl", source);
        pipeline.run()
    };

    let kept = run(GeneratorConfig::default()).unwrap().model;
    let shared = kept.interface("Derived").unwrap().member("shared").unwrap();
    assert_eq!(shared.origin, "Base");

    let shadowed = run(GeneratorConfig::lenient()).unwrap().model;
    let shared = shadowed.interface("Derived").unwrap().member("shared").unwrap();
    assert_eq!(shared.origin, "Extra");
    assert!(shared.from_mixin);

    let err = run(GeneratorConfig::default().with_mixin_collision(MixinCollision::Reject))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateMember { .. }));
}

#[test]
fn syntax_errors_skip_one_declaration() {
    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    pipeline.add_source_text(
        "broken.webidl",
        r"
        interface Good { attribute long a; };
        interface Bad { attribute long; };
        interface AlsoGood : Good {};
        ",
    );
    let output = pipeline.run().unwrap();
    assert_eq!(output.diagnostics.count(Severity::Error), 1);
    assert!(output.model.interface("Bad").is_none());
    assert_eq!(output.model.interface("AlsoGood").unwrap().members.len(), 1);

    let mut strict = Pipeline::new(GeneratorConfig::strict());
    strict.add_source_text("broken.webidl", "interface Bad { attribute long; };");
    let err = strict.run().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Syntax { .. }));
}

#[test]
fn failed_runs_still_report_syntax_errors() {
    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    pipeline.add_source_text("a.webidl", "interface A : B {};\ninterface A : C {};\n");
    pipeline.add_source_text("b.webidl", "interface Broken { attribute ; };\n");
    let report = pipeline.report();
    let lines: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("error: "));
    assert!(lines[0].contains("b.webidl"));
    assert!(report.outcome.is_err());
}

#[test]
fn partial_exposure_reaches_members() {
    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    pipeline.add_source_text(
        "navigator.webidl",
        "[Exposed=Window] interface Navigator { readonly attribute DOMString userAgent; };",
    );
    pipeline.add_source_text(
        "gpu.webidl",
        "[Exposed=Worker, SecureContext] partial interface Navigator { readonly attribute long gpu; };",
    );
    let output = pipeline.run().unwrap();
    assert!(output.diagnostics.is_empty());
    let navigator = output.model.interface("Navigator").unwrap();
    assert_eq!(navigator.exposure, vec!["Window"]);
    assert!(navigator.member("userAgent").unwrap().exposure.is_empty());
    let gpu = navigator.member("gpu").unwrap();
    assert_eq!(gpu.exposure, vec!["Worker"]);
    assert!(gpu.extended_attributes.contains("SecureContext"));
}

#[test]
fn partial_attributes_are_validated() {
    let mut pipeline = Pipeline::new(GeneratorConfig::default());
    pipeline.add_source_text("document.webidl", "[Exposed=Window] interface Document {};");
    pipeline.add_source_text(
        "extra.webidl",
        "[LegacyUnforgeable] partial interface Document { readonly attribute long extra; };",
    );
    let err = pipeline.run().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidExtendedAttribute { ref attribute, .. } if attribute == "LegacyUnforgeable"
    ));
}

#[test]
fn formats_agree_on_the_model() {
    let model = pipeline(GeneratorConfig::default()).run().unwrap().model;
    for format in [OutputFormat::Json, OutputFormat::Msgpack] {
        let bytes = to_bytes(&model, format).unwrap();
        assert_eq!(from_bytes(&bytes, format).unwrap(), model, "{format}");
    }

    let json: serde_json::Value =
        serde_json::from_slice(&to_bytes(&model, OutputFormat::Json).unwrap()).unwrap();
    let document = json["interfaces"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == "Document")
        .unwrap();
    assert_eq!(document["parent"], "Node");
    assert_eq!(document["ancestry"][0], "Node");
}

#[test]
fn runs_are_repeatable() {
    let pipeline = pipeline(GeneratorConfig::default());
    let first = pipeline.run().unwrap().model;
    let second = pipeline.run().unwrap().model;
    assert_eq!(first, second);
}

#[test]
fn independent_pipelines_run_in_parallel() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let mut pipeline = Pipeline::new(GeneratorConfig::default());
                pipeline.add_source_text(
                    format!("thread{i}.webidl"),
                    format!("interface Root {{}}; interface Leaf{i} : Root {{ attribute long n{i}; }};"),
                );
                pipeline.run().map(|output| output.model)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let model = handle.join().unwrap().unwrap();
        let leaf = model.interface(&format!("Leaf{i}")).unwrap();
        assert_eq!(leaf.ancestry, vec!["Root".to_string(), format!("Leaf{i}")]);
        assert_eq!(leaf.members[0].name, format!("n{i}"));
    }
}
