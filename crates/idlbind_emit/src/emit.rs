//! Conversion from a validated model to a [`BindingModel`].
//!
//! Emission cannot fail: every name and type was resolved by validation.

use tracing::{debug, trace};

use idlbind_engine::{
    ResolvedCollection, ResolvedParameter, ResolvedSignature, ValidatedCallback,
    ValidatedCallbackInterface, ValidatedDictionary, ValidatedFactory, ValidatedInterface,
    ValidatedMember, ValidatedModel,
};
use idlbind_language::{Member, Special};

use crate::model::{
    ArgumentBinding, BindingModel, CallbackBinding, CallbackInterfaceBinding, CollectionBinding,
    ConstructorBinding, DictionaryBinding, DictionaryMemberBinding, EnumBinding, FactoryBinding,
    InterfaceBinding, MemberBinding, MemberDetail,
};

/// Builds the binding model.
#[must_use]
pub fn emit(model: &ValidatedModel) -> BindingModel {
    let binding = BindingModel {
        interfaces: model.interfaces().iter().map(interface).collect(),
        dictionaries: model.dictionaries().iter().map(dictionary).collect(),
        enums: model
            .enums()
            .iter()
            .map(|e| EnumBinding::new(&e.name, e.values.iter().cloned()))
            .collect(),
        callback_interfaces: model
            .callback_interfaces()
            .iter()
            .map(callback_interface)
            .collect(),
        callbacks: model.callbacks().iter().map(callback).collect(),
    };
    debug!(bindings = binding.len(), "emitted binding model");
    binding
}

fn interface(validated: &ValidatedInterface) -> InterfaceBinding {
    trace!(interface = %validated.name, "emitting");

    let mut members = Vec::with_capacity(validated.members.len());
    let mut constructors = Vec::new();
    for entry in &validated.members {
        match (&entry.member, &entry.signature) {
            (Member::Operation(op), ResolvedSignature::Operation { arguments, .. })
                if op.is_constructor() =>
            {
                constructors.push(ConstructorBinding {
                    arguments: arguments_of(arguments),
                    html_constructor: op.attributes.contains("HTMLConstructor"),
                    extended_attributes: op.attributes.clone(),
                });
            }
            _ => members.push(member(entry)),
        }
    }

    InterfaceBinding {
        name: validated.name.clone(),
        parent: validated.parent().map(str::to_string),
        ancestry: validated.ancestry.clone(),
        depth: validated.depth(),
        members,
        exposure: validated.attributes.exposure(),
        legacy_factory_functions: validated.factories.iter().map(factory).collect(),
        constructors,
        collection: validated.collection.as_ref().map(collection),
        extended_attributes: validated.attributes.clone(),
    }
}

fn member(entry: &ValidatedMember) -> MemberBinding {
    let detail = match &entry.signature {
        ResolvedSignature::Attribute { ty } => {
            let declared = match &entry.member {
                Member::Attribute(attribute) => Some(attribute),
                _ => None,
            };
            MemberDetail::Attribute {
                ty: ty.clone(),
                readonly: declared.is_some_and(|a| a.readonly),
                nullable: ty.is_nullable(),
                inherit: declared.is_some_and(|a| a.inherit),
                stringifier: declared.is_some_and(|a| a.stringifier),
            }
        }
        ResolvedSignature::Operation {
            return_type,
            arguments,
        } => {
            let declared = entry.member.as_operation();
            MemberDetail::Operation {
                special: declared
                    .and_then(|op| op.special)
                    .filter(|s| *s != Special::Constructor),
                return_type: return_type.clone(),
                arguments: arguments_of(arguments),
            }
        }
        ResolvedSignature::Constant { ty, value } => MemberDetail::Constant {
            ty: ty.clone(),
            value: value.clone(),
        },
    };

    let attributes = entry.member.attributes();
    MemberBinding {
        name: entry.name().to_string(),
        detail,
        origin: entry.origin.clone(),
        from_mixin: entry.from_mixin,
        depth: entry.depth,
        is_static: entry.member.is_static(),
        ce_reactions: attributes.contains("CEReactions"),
        new_object: attributes.contains("NewObject"),
        exposure: attributes.exposure(),
        extended_attributes: attributes.clone(),
    }
}

fn arguments_of(resolved: &[ResolvedParameter]) -> Vec<ArgumentBinding> {
    resolved
        .iter()
        .map(|p| ArgumentBinding {
            name: p.name.clone(),
            ty: p.ty.clone(),
            optional: p.optional,
            default: p.default.clone(),
            variadic: p.variadic,
            extended_attributes: p.attributes.clone(),
        })
        .collect()
}

fn factory(validated: &ValidatedFactory) -> FactoryBinding {
    FactoryBinding {
        name: validated.name.clone(),
        arguments: arguments_of(&validated.arguments),
    }
}

fn collection(resolved: &ResolvedCollection) -> CollectionBinding {
    CollectionBinding {
        kind: resolved.kind,
        key: resolved.key.clone(),
        value: resolved.value.clone(),
        readonly: resolved.readonly,
        is_async: resolved.is_async,
    }
}

fn dictionary(validated: &ValidatedDictionary) -> DictionaryBinding {
    let parent = validated
        .ancestry
        .len()
        .checked_sub(2)
        .and_then(|i| validated.ancestry.get(i))
        .cloned();

    DictionaryBinding {
        name: validated.name.clone(),
        parent,
        members: validated
            .members
            .iter()
            .map(|m| DictionaryMemberBinding {
                name: m.name.clone(),
                ty: m.ty.clone(),
                required: m.required,
                default: m.default.clone(),
                origin: m.origin.clone(),
                depth: m.depth,
            })
            .collect(),
    }
}

fn callback_interface(validated: &ValidatedCallbackInterface) -> CallbackInterfaceBinding {
    CallbackInterfaceBinding {
        name: validated.name.clone(),
        members: validated.members.iter().map(member).collect(),
    }
}

fn callback(validated: &ValidatedCallback) -> CallbackBinding {
    CallbackBinding {
        name: validated.name.clone(),
        return_type: validated.return_type.clone(),
        arguments: arguments_of(&validated.arguments),
    }
}
