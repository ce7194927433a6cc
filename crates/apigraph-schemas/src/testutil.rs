//! Shared proptest strategies for schema tests.

use std::collections::BTreeMap;

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

use crate::{
    AnnotationDef, ClassDef, EnumConstantDef, EnumDef, HeaderMatch, HttpMethod, MemberDef,
    MethodDef, ModuleDef, ParameterDef, RouteDef, Snapshot, TypeName,
};

/// Strategy for generating arbitrary identifier-like names.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,19}"
}

/// Strategy for generating arbitrary dotted type identities
/// (e.g. `com.example.Foo`).
pub fn arb_identity() -> impl Strategy<Value = TypeName> {
    (arb_name(), arb_name(), "[A-Z][a-zA-Z0-9]{0,14}")
        .prop_map(|(a, b, c)| TypeName::new(format!("{a}.{b}.{c}")))
}

/// Strategy for generating arbitrary attribute maps.
///
/// Values are strings or integers only, so they survive a JSON roundtrip
/// without float-precision drift.
fn arb_attributes() -> impl Strategy<Value = BTreeMap<String, serde_json::Value>> {
    let value = prop_oneof![
        arb_name().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
    ];
    btree_map(arb_name(), value, 0..3)
}

/// Strategy for generating arbitrary annotations.
pub fn arb_annotation() -> impl Strategy<Value = AnnotationDef> {
    (arb_identity(), arb_attributes()).prop_map(|(name, attributes)| AnnotationDef {
        name: name.to_string(),
        attributes,
    })
}

/// Strategy for generating arbitrary class members.
fn arb_member() -> impl Strategy<Value = MemberDef> {
    (arb_name(), arb_identity(), vec(arb_annotation(), 0..2)).prop_map(
        |(name, ty, annotations)| MemberDef {
            name,
            type_name: ty.to_string(),
            annotations,
        },
    )
}

/// Strategy for generating arbitrary parameters.
fn arb_parameter() -> impl Strategy<Value = ParameterDef> {
    (arb_name(), arb_identity(), vec(arb_annotation(), 0..2)).prop_map(
        |(name, ty, annotations)| ParameterDef {
            name,
            type_name: ty.to_string(),
            annotations,
        },
    )
}

/// Strategy for generating arbitrary important methods.
fn arb_method() -> impl Strategy<Value = MethodDef> {
    (
        arb_name(),
        vec(arb_parameter(), 0..3),
        arb_identity(),
        vec(arb_annotation(), 0..2),
    )
        .prop_map(|(name, parameters, ret, annotations)| MethodDef {
            name,
            parameters,
            return_type: ret.to_string(),
            annotations,
        })
}

/// Strategy for generating arbitrary class descriptors.
pub fn arb_class() -> impl Strategy<Value = ClassDef> {
    (
        arb_identity(),
        vec("[A-Z]", 0..3),
        proptest::option::of(arb_identity().prop_map(|t| t.to_string())),
        vec(arb_identity().prop_map(|t| t.to_string()), 0..2),
        vec(arb_member(), 0..4),
        vec(arb_method(), 0..2),
        vec(arb_annotation(), 0..2),
    )
        .prop_map(
            |(name, type_parameters, superclass, interfaces, members, methods, annotations)| {
                ClassDef {
                    name,
                    type_parameters,
                    superclass,
                    interfaces,
                    members,
                    important_methods: methods,
                    annotations,
                }
            },
        )
}

/// Strategy for generating arbitrary enum descriptors.
///
/// Constant values are strings or integers, matching what real enum
/// introspection produces.
pub fn arb_enum() -> impl Strategy<Value = EnumDef> {
    let constant = (
        "[A-Z][A-Z0-9_]{0,9}",
        prop_oneof![
            arb_name().prop_map(serde_json::Value::from),
            any::<i32>().prop_map(serde_json::Value::from),
        ],
        arb_attributes(),
    )
        .prop_map(|(name, value, properties)| EnumConstantDef {
            name,
            value,
            properties,
            annotations: Vec::new(),
        });
    (arb_identity(), vec(constant, 0..4))
        .prop_map(|(name, constants)| EnumDef { name, constants })
}

/// Strategy for generating arbitrary module descriptors.
pub fn arb_module() -> impl Strategy<Value = ModuleDef> {
    (arb_identity(), vec(arb_annotation(), 0..2))
        .prop_map(|(name, annotations)| ModuleDef { name, annotations })
}

/// Strategy for generating arbitrary routes.
pub fn arb_route() -> impl Strategy<Value = RouteDef> {
    let method = prop_oneof![
        Just(HttpMethod::Get),
        Just(HttpMethod::Post),
        Just(HttpMethod::Put),
        Just(HttpMethod::Delete),
    ];
    let header = (arb_name(), proptest::option::of(arb_name()), any::<bool>()).prop_map(
        |(name, value, negated)| HeaderMatch {
            name,
            value,
            negated,
        },
    );
    (
        arb_name(),
        arb_identity(),
        vec(method, 1..3),
        vec(arb_name().prop_map(|p| format!("/{p}")), 1..3),
        vec(header, 0..2),
        vec(arb_parameter(), 0..3),
        vec(arb_annotation(), 0..2),
        arb_identity(),
    )
        .prop_map(
            |(name, bean, mut methods, patterns, headers, parameters, annotations, ret)| {
                methods.sort_unstable();
                methods.dedup();
                RouteDef {
                    name,
                    bean,
                    methods,
                    patterns,
                    headers,
                    parameters,
                    annotations,
                    return_type: ret.to_string(),
                }
            },
        )
}

/// Strategy for generating arbitrary snapshots.
pub fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (
        vec(arb_module(), 0..3),
        vec(arb_route(), 0..3),
        vec(arb_class(), 0..3),
        vec(arb_enum(), 0..3),
    )
        .prop_map(|(modules, routes, classes, enums)| Snapshot {
            modules,
            routes,
            classes,
            enums,
        })
}
