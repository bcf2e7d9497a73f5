//! Binding model integration tests

use idlbind_emit::{BindingModel, EnumBinding, MemberDetail, emit};
use idlbind_engine::validate;
use idlbind_language::{DeclarationKind, Special, parse};
use idlbind_registry::SymbolTable;

fn model(source: &str) -> BindingModel {
    let output = parse(source);
    assert!(output.is_clean(), "{:?}", output.errors);
    let mut table = SymbolTable::new();
    table.register_definitions(output.definitions).unwrap();
    emit(&validate(&table).unwrap())
}

#[test]
fn enum_lookup_is_indexed() {
    let model = model(r#"enum ReferrerPolicy { "", "no-referrer", "origin", "unsafe-url" };"#);
    let policy = model.enumeration("ReferrerPolicy").unwrap();
    assert_eq!(policy.len(), 4);
    assert_eq!(policy.index_of(""), Some(0));
    assert_eq!(policy.index_of("unsafe-url"), Some(3));
    assert_eq!(policy.index_of("strict-origin"), None);
    assert_eq!(policy.value_at(2), Some("origin"));
    let indexes: Vec<_> = policy.values().iter().map(|v| v.index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 3]);
}

#[test]
fn enum_lookup_survives_deserialization() {
    let e = EnumBinding::new("Mode", ["open".to_string(), "closed".to_string()]);
    let json = serde_json::to_string(&e).unwrap();
    let back: EnumBinding = serde_json::from_str(&json).unwrap();
    assert_eq!(back.index_of("closed"), Some(1));
    assert_eq!(back, e);
}

#[test]
fn named_types_carry_kinds() {
    let model = model(
        r#"
        enum ScrollBehavior { "auto", "smooth" };
        dictionary ScrollOptions { ScrollBehavior behavior = "auto"; };
        callback FrameRequestCallback = undefined (double time);
        interface Window {
          undefined scroll(optional ScrollOptions options = {});
          unsigned long requestAnimationFrame(FrameRequestCallback callback);
        };
        "#,
    );
    let window = model.interface("Window").unwrap();
    let kind_of_first_argument = |name: &str| {
        let MemberDetail::Operation { arguments, .. } = &window.member(name).unwrap().detail else {
            panic!("expected operation");
        };
        arguments[0].ty.named_kind()
    };
    assert_eq!(kind_of_first_argument("scroll"), Some(DeclarationKind::Dictionary));
    assert_eq!(
        kind_of_first_argument("requestAnimationFrame"),
        Some(DeclarationKind::CallbackFunction)
    );

    let options = model.dictionary("ScrollOptions").unwrap();
    assert_eq!(
        options.members[0].ty.named_kind(),
        Some(DeclarationKind::Enum)
    );
}

#[test]
fn special_operations_and_overloads() {
    let model = model(
        r"
        interface Storage {
          getter DOMString? getItem(DOMString key);
          setter undefined setItem(DOMString key, DOMString value);
          deleter undefined removeItem(DOMString key);
          undefined clear();
          undefined clear(boolean deep);
        };
        ",
    );
    let storage = model.interface("Storage").unwrap();
    let MemberDetail::Operation { special, .. } = &storage.member("getItem").unwrap().detail else {
        panic!("expected operation");
    };
    assert_eq!(*special, Some(Special::Getter));
    assert_eq!(storage.overloads("clear").count(), 2);
}

#[test]
fn json_shape_is_stable() {
    let model = model("interface A { readonly attribute long x; };");
    let value = serde_json::to_value(&model).unwrap();
    let member = &value["interfaces"][0]["members"][0];
    assert_eq!(member["name"], "x");
    assert_eq!(member["detail"]["attribute"]["readonly"], true);
    assert_eq!(member["detail"]["attribute"]["ty"]["type"], "primitive");
}
