//! Emit, render, parse, emit again: the member sets must agree.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use idlbind_emit::{BindingModel, InterfaceBinding, MemberDetail, emit, render_idl};
use idlbind_engine::validate;
use idlbind_language::parse;
use idlbind_registry::SymbolTable;

fn model(source: &str) -> BindingModel {
    let output = parse(source);
    assert!(output.is_clean(), "{:?}\n{source}", output.errors);
    let mut table = SymbolTable::new();
    table.register_definitions(output.definitions).unwrap();
    emit(&validate(&table).unwrap())
}

type MemberKey = (String, bool, &'static str, usize);

/// Members as an unordered set plus each overload group in order.
fn shape(
    interface: &InterfaceBinding,
) -> (BTreeSet<MemberKey>, BTreeMap<(String, bool), Vec<String>>) {
    let mut members = BTreeSet::new();
    let mut groups: BTreeMap<(String, bool), Vec<String>> = BTreeMap::new();
    for member in &interface.members {
        members.insert((
            member.name.clone(),
            member.is_static,
            member.kind_name(),
            member.depth,
        ));
        if let MemberDetail::Operation { arguments, .. } = &member.detail {
            let signature = arguments
                .iter()
                .map(|a| a.ty.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            groups
                .entry((member.name.clone(), member.is_static))
                .or_default()
                .push(signature);
        }
    }
    (members, groups)
}

/// Constructor signatures; attribute spans differ between sources.
fn constructors(interface: &InterfaceBinding) -> Vec<(String, bool)> {
    interface
        .constructors
        .iter()
        .map(|c| {
            let signature = c
                .arguments
                .iter()
                .map(|a| format!("{}{}", a.ty, if a.optional { "?" } else { "" }))
                .collect::<Vec<_>>()
                .join(", ");
            (signature, c.html_constructor)
        })
        .collect()
}

fn assert_round_trip(first: &BindingModel) -> BindingModel {
    let text = render_idl(first);
    let second = model(&text);
    assert_eq!(first.interfaces().len(), second.interfaces().len(), "{text}");
    for interface in first.interfaces() {
        let again = second
            .interface(&interface.name)
            .unwrap_or_else(|| panic!("{} missing from\n{text}", interface.name));
        assert_eq!(shape(interface), shape(again), "{}\n{text}", interface.name);
        assert_eq!(interface.ancestry, again.ancestry);
        assert_eq!(constructors(interface), constructors(again));
        assert_eq!(interface.exposure, again.exposure);
    }
    second
}

const DOM: &str = r#"
    [Exposed=Window]
    interface EventTarget {
      constructor();
      undefined addEventListener(DOMString type, EventListener? callback, optional boolean capture = false);
      undefined removeEventListener(DOMString type, EventListener? callback);
      boolean dispatchEvent(Event event);
    };
    callback interface EventListener { undefined handleEvent(Event event); };

    [Exposed=(Window,Worker)]
    interface Event {
      constructor(DOMString type, optional EventInit eventInitDict = {});
      readonly attribute DOMString type;
      const unsigned short NONE = 0;
      const unsigned short CAPTURING_PHASE = 1;
      undefined stopPropagation();
    };
    dictionary EventInit { boolean bubbles = false; boolean cancelable = false; };
    dictionary FocusEventInit : EventInit { EventTarget? relatedTarget = null; };

    [Exposed=Window]
    interface Node : EventTarget {
      readonly attribute Node? parentNode;
      [CEReactions] attribute DOMString? textContent;
      [CEReactions, NewObject] Node cloneNode(optional boolean subtree = false);
      boolean contains(Node? other);
      static Node create();
    };
    interface mixin ChildNode {
      [CEReactions, Unscopable] undefined before((Node or DOMString)... nodes);
      [CEReactions, Unscopable] undefined remove();
    };
    interface mixin ParentNode {
      readonly attribute unsigned long childElementCount;
      Element? querySelector(DOMString selectors);
    };
    [Exposed=Window]
    interface Element : Node {
      attribute DOMString id;
      [CEReactions] undefined setAttribute(DOMString name, DOMString value);
      stringifier;
    };
    Element includes ChildNode;
    Element includes ParentNode;

    [Exposed=Window, LegacyFactoryFunction=Image(optional unsigned long width, optional unsigned long height)]
    interface HTMLImageElement : Element {
      [HTMLConstructor] constructor();
      [CEReactions, Reflect] attribute DOMString alt;
      Promise<undefined> decode();
    };

    interface HTMLCollection {
      readonly attribute unsigned long length;
      getter Element? item(unsigned long index);
      getter Element? namedItem(DOMString name);
    };

    [Exposed=Window]
    interface Storage {
      getter DOMString? getItem(DOMString key);
      setter undefined (DOMString key, DOMString value);
      deleter undefined removeItem(DOMString key);
    };

    interface FormData {
      constructor();
      undefined append(USVString name, USVString value);
      undefined append(USVString name, Blob blobValue, optional USVString filename);
      iterable<USVString, FormDataEntryValue>;
    };
    interface Blob {};
    typedef (Blob or USVString) FormDataEntryValue;

    enum ShadowRootMode { "open", "closed" };
    callback EventHandlerNonNull = any (Event event);
"#;

#[test]
fn dom_fixture_round_trips() {
    let first = model(DOM);
    let second = assert_round_trip(&first);

    let element = second.interface("Element").unwrap();
    assert!(element.member("remove").is_some());
    assert_eq!(element.member("remove").unwrap().depth, 2);

    let form = second.interface("FormData").unwrap();
    assert_eq!(
        form.collection,
        first.interface("FormData").unwrap().collection
    );

    assert_eq!(second.enums(), first.enums());
    assert_eq!(second.callbacks(), first.callbacks());
    assert_eq!(second.callback_interfaces(), first.callback_interfaces());
    for dictionary in first.dictionaries() {
        let again = second.dictionary(&dictionary.name).unwrap();
        assert_eq!(again, dictionary);
    }
}

#[test]
fn factory_functions_survive_typedefs() {
    let first = model(
        "typedef unsigned long Dim;\n\
         [LegacyFactoryFunction=Image(optional Dim w)] interface HTMLImageElement {};",
    );
    let second = assert_round_trip(&first);
    let factories = &second
        .interface("HTMLImageElement")
        .unwrap()
        .legacy_factory_functions;
    assert_eq!(factories.len(), 1);
    assert_eq!(factories[0].name, "Image");
    let w = &factories[0].arguments[0];
    assert_eq!(w.name, "w");
    assert_eq!(w.ty.to_string(), "unsigned long");
    assert!(w.optional);
}

#[test]
fn rendering_is_stable() {
    let first = model(DOM);
    let once = render_idl(&first);
    let twice = render_idl(&model(&once));
    assert_eq!(once, twice);
}

// =============================================================================
// Random Inheritance Graphs
// =============================================================================

const MEMBER_POOL: &[&str] = &[
    "attribute long a;",
    "readonly attribute DOMString b;",
    "undefined f(long x);",
    "undefined f(DOMString x);",
    "static attribute long a;",
    "const long K = 1;",
    "getter long item(unsigned long index);",
];

const MIXIN_MEMBERS: &[&str] = &["attribute long a;", "undefined f(boolean x);", "attribute long m;"];

/// Each interface: parent choice, member picks, and mixin picks.
type Node = (usize, Vec<usize>, Vec<usize>);

fn source(nodes: &[Node]) -> String {
    let mut text = String::new();
    for (i, member) in MIXIN_MEMBERS.iter().enumerate() {
        text.push_str(&format!("interface mixin M{i} {{ {member} }};\n"));
    }
    for (i, (parent, members, mixins)) in nodes.iter().enumerate() {
        let parent = if *parent < i {
            format!(" : I{parent}")
        } else {
            String::new()
        };
        let picked: BTreeSet<_> = members.iter().collect();
        let body: String = picked.iter().map(|&&m| format!("{} ", MEMBER_POOL[m])).collect();
        text.push_str(&format!("interface I{i}{parent} {{ {body}}};\n"));
        let included: BTreeSet<_> = mixins.iter().collect();
        for mixin in included {
            text.push_str(&format!("I{i} includes M{mixin};\n"));
        }
    }
    text
}

fn graph() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(
        (
            0..8usize,
            prop::collection::vec(0..MEMBER_POOL.len(), 0..5),
            prop::collection::vec(0..MIXIN_MEMBERS.len(), 0..3),
        ),
        1..8,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_graphs_round_trip(nodes in graph()) {
        let first = model(&source(&nodes));
        assert_round_trip(&first);
    }
}
