//! Renders a binding model back to interface definition text.
//!
//! Each interface is written with its parent and the members that entered
//! at its own level, mixin members included. Parsing the output and
//! emitting again yields the same member sets.

use std::fmt::{self, Write};

use idlbind_language::{
    CollectionKind, ExtendedAttribute, ExtendedAttributeValue, ExtendedAttributes, Parameter,
    Special,
};

use crate::model::{
    ArgumentBinding, BindingModel, CallbackBinding, CallbackInterfaceBinding, CollectionBinding,
    ConstructorBinding, DictionaryBinding, EnumBinding, InterfaceBinding, MemberBinding,
    MemberDetail,
};

/// Words that must be escaped with a leading `_` when used as names.
const RESERVED: &[&str] = &[
    "async",
    "attribute",
    "callback",
    "const",
    "constructor",
    "deleter",
    "dictionary",
    "enum",
    "getter",
    "includes",
    "inherit",
    "interface",
    "iterable",
    "maplike",
    "mixin",
    "namespace",
    "optional",
    "or",
    "partial",
    "readonly",
    "required",
    "setlike",
    "setter",
    "static",
    "stringifier",
    "typedef",
    "unrestricted",
];

const INDENT: &str = "  ";

/// Renders every binding as source text.
#[must_use]
pub fn render_idl(model: &BindingModel) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_model(&mut out, model);
    out
}

fn write_model(out: &mut String, model: &BindingModel) -> fmt::Result {
    let mut first = true;
    let mut separate = |out: &mut String| {
        if !first {
            out.push('\n');
        }
        first = false;
    };

    for e in model.enums() {
        separate(out);
        write_enum(out, e)?;
    }
    for callback in model.callbacks() {
        separate(out);
        write_callback(out, callback)?;
    }
    for callback in model.callback_interfaces() {
        separate(out);
        write_callback_interface(out, callback)?;
    }
    for dictionary in model.dictionaries() {
        separate(out);
        write_dictionary(out, dictionary)?;
    }
    for interface in model.interfaces() {
        separate(out);
        write_interface(out, interface)?;
    }
    Ok(())
}

// =============================================================================
// Declarations
// =============================================================================

fn write_enum(out: &mut String, e: &EnumBinding) -> fmt::Result {
    writeln!(out, "enum {} {{", name(e.name()))?;
    for (i, value) in e.values().iter().enumerate() {
        let comma = if i + 1 < e.len() { "," } else { "" };
        writeln!(out, "{INDENT}\"{}\"{comma}", value.value)?;
    }
    writeln!(out, "}};")
}

fn write_callback(out: &mut String, callback: &CallbackBinding) -> fmt::Result {
    writeln!(
        out,
        "callback {} = {} ({});",
        name(&callback.name),
        callback.return_type,
        arguments(&callback.arguments)
    )
}

fn write_callback_interface(out: &mut String, callback: &CallbackInterfaceBinding) -> fmt::Result {
    writeln!(out, "callback interface {} {{", name(&callback.name))?;
    for member in &callback.members {
        write_member(out, member)?;
    }
    writeln!(out, "}};")
}

fn write_dictionary(out: &mut String, dictionary: &DictionaryBinding) -> fmt::Result {
    write!(out, "dictionary {}", name(&dictionary.name))?;
    if let Some(parent) = &dictionary.parent {
        write!(out, " : {}", name(parent))?;
    }
    writeln!(out, " {{")?;
    for member in dictionary.members.iter().filter(|m| m.origin == dictionary.name) {
        write!(out, "{INDENT}")?;
        if member.required {
            write!(out, "required ")?;
        }
        write!(out, "{} {}", member.ty, name(&member.name))?;
        if let Some(default) = &member.default {
            write!(out, " = {default}")?;
        }
        writeln!(out, ";")?;
    }
    writeln!(out, "}};")
}

fn write_interface(out: &mut String, interface: &InterfaceBinding) -> fmt::Result {
    if !interface.extended_attributes.is_empty() {
        writeln!(out, "{}", interface_attribute_list(interface))?;
    }
    write!(out, "interface {}", name(&interface.name))?;
    if let Some(parent) = &interface.parent {
        write!(out, " : {}", name(parent))?;
    }
    writeln!(out, " {{")?;

    for constructor in &interface.constructors {
        write_constructor(out, constructor)?;
    }
    if let Some(collection) = &interface.collection {
        write_collection(out, collection)?;
    }
    for member in interface.own_members() {
        write_member(out, member)?;
    }
    writeln!(out, "}};")
}

// =============================================================================
// Members
// =============================================================================

fn write_constructor(out: &mut String, constructor: &ConstructorBinding) -> fmt::Result {
    write!(out, "{INDENT}")?;
    write_attributes(out, &constructor.extended_attributes, " ")?;
    writeln!(out, "constructor({});", arguments(&constructor.arguments))
}

fn write_collection(out: &mut String, collection: &CollectionBinding) -> fmt::Result {
    write!(out, "{INDENT}")?;
    if collection.is_async {
        write!(out, "async ")?;
    }
    if collection.readonly {
        write!(out, "readonly ")?;
    }
    let keyword = match collection.kind {
        CollectionKind::Iterable => "iterable",
        CollectionKind::Maplike => "maplike",
        CollectionKind::Setlike => "setlike",
    };
    match &collection.key {
        Some(key) => writeln!(out, "{keyword}<{key}, {}>;", collection.value),
        None => writeln!(out, "{keyword}<{}>;", collection.value),
    }
}

fn write_member(out: &mut String, member: &MemberBinding) -> fmt::Result {
    write!(out, "{INDENT}")?;
    write_attributes(out, &member.extended_attributes, " ")?;

    match &member.detail {
        MemberDetail::Attribute {
            ty,
            readonly,
            inherit,
            stringifier,
            ..
        } => {
            if *stringifier {
                write!(out, "stringifier ")?;
            }
            if member.is_static {
                write!(out, "static ")?;
            }
            if *inherit {
                write!(out, "inherit ")?;
            }
            if *readonly {
                write!(out, "readonly ")?;
            }
            writeln!(out, "attribute {ty} {};", name(&member.name))
        }
        MemberDetail::Operation {
            special,
            return_type,
            arguments: args,
        } => {
            let unnamed = special.is_some_and(|s| s.keyword() == member.name);
            if *special == Some(Special::Stringifier) && unnamed && args.is_empty() {
                return writeln!(out, "stringifier;");
            }
            if let Some(special) = special {
                write!(out, "{} ", special.keyword())?;
            }
            if member.is_static {
                write!(out, "static ")?;
            }
            write!(out, "{return_type}")?;
            if !unnamed {
                write!(out, " {}", name(&member.name))?;
            }
            writeln!(out, "({});", arguments(args))
        }
        MemberDetail::Constant { ty, value } => {
            writeln!(out, "const {ty} {} = {value};", name(&member.name))
        }
    }
}

fn arguments(args: &[ArgumentBinding]) -> String {
    args.iter()
        .map(|arg| {
            let mut text = attribute_prefix(&arg.extended_attributes);
            if arg.optional {
                text.push_str("optional ");
            }
            let _ = write!(text, "{}", arg.ty);
            if arg.variadic {
                text.push_str("...");
            }
            text.push(' ');
            text.push_str(&name(&arg.name));
            if let Some(default) = &arg.default {
                let _ = write!(text, " = {default}");
            }
            text
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Extended Attributes
// =============================================================================

fn write_attributes(out: &mut String, attributes: &ExtendedAttributes, after: &str) -> fmt::Result {
    if attributes.is_empty() {
        return Ok(());
    }
    write!(out, "{}{after}", attribute_list(attributes))
}

fn attribute_prefix(attributes: &ExtendedAttributes) -> String {
    if attributes.is_empty() {
        String::new()
    } else {
        format!("{} ", attribute_list(attributes))
    }
}

fn attribute_list(attributes: &ExtendedAttributes) -> String {
    let items: Vec<String> = attributes.iter().map(attribute).collect();
    format!("[{}]", items.join(", "))
}

fn attribute(attribute: &ExtendedAttribute) -> String {
    let name = &attribute.name;
    match &attribute.value {
        ExtendedAttributeValue::None => name.clone(),
        ExtendedAttributeValue::Identifier(id) => format!("{name}={id}"),
        ExtendedAttributeValue::IdentifierList(ids) => format!("{name}=({})", ids.join(", ")),
        ExtendedAttributeValue::String(s) => format!("{name}=\"{s}\""),
        ExtendedAttributeValue::Integer(n) => format!("{name}={n}"),
        ExtendedAttributeValue::Decimal(n) => format!("{name}={n:?}"),
        ExtendedAttributeValue::Wildcard => format!("{name}=*"),
        ExtendedAttributeValue::ArgumentList(params) => {
            format!("{name}({})", parameters(params))
        }
        ExtendedAttributeValue::NamedArgumentList {
            name: function,
            arguments,
        } => format!("{name}={function}({})", parameters(arguments)),
    }
}

/// Like [`attribute_list`], but factory arguments come from the resolved
/// bindings so typedef names do not reappear in the output.
fn interface_attribute_list(interface: &InterfaceBinding) -> String {
    let mut factories = interface.legacy_factory_functions.iter();
    let items: Vec<String> = interface
        .extended_attributes
        .iter()
        .map(|attr| {
            if attr.name != "LegacyFactoryFunction" {
                return attribute(attr);
            }
            match &attr.value {
                ExtendedAttributeValue::NamedArgumentList { .. } => match factories.next() {
                    Some(factory) => format!(
                        "{}={}({})",
                        attr.name,
                        factory.name,
                        arguments(&factory.arguments)
                    ),
                    None => attribute(attr),
                },
                ExtendedAttributeValue::Identifier(_) => {
                    factories.next();
                    attribute(attr)
                }
                _ => attribute(attr),
            }
        })
        .collect();
    format!("[{}]", items.join(", "))
}

/// Renders unresolved parameters, as found in extended attribute arguments.
fn parameters(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| {
            let mut text = attribute_prefix(&p.attributes);
            if p.optional {
                text.push_str("optional ");
            }
            let _ = write!(text, "{}", p.ty);
            if p.variadic {
                text.push_str("...");
            }
            text.push(' ');
            text.push_str(&name(&p.name));
            if let Some(default) = &p.default {
                let _ = write!(text, " = {default}");
            }
            text
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escapes a name that would otherwise read as a keyword.
fn name(raw: &str) -> String {
    if raw.starts_with('_') || RESERVED.contains(&raw) {
        format!("_{raw}")
    } else {
        raw.to_string()
    }
}
