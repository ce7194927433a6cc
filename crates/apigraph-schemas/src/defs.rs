//! Descriptor types for the API metadata snapshot.
//!
//! A snapshot captures four kinds of descriptors (modules, routes, classes,
//! enums) keyed by canonical type identity. Descriptors are built once
//! per identity by the collection engine and emitted in a deterministic
//! order: classes and enums sorted by identity, routes sorted by an explicit
//! [`RouteKey`], modules in registration order.
//!
//! ## Terminology
//!
//! - **Identity**: the canonical dotted name of a raw type (e.g.
//!   `com.example.UserController`). Wrapped in [`TypeName`].
//! - **Rendered type**: the display form of a full type expression (e.g.
//!   `java.util.Map<java.lang.String, com.example.User>`), stored as a plain
//!   string in descriptor fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Canonical dotted name of a raw type, used as the unique graph-node key.
///
/// Two type expressions naming the same `TypeName` are the same node
/// regardless of generic instantiation: `List<String>` and `List<User>`
/// both resolve to the identity `java.util.List`.
///
/// Serializes transparently as a plain string.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a type name from a raw identity string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for TypeName {
    /// Enables `BTreeMap<TypeName, _>::get("com.example.Foo")` lookups.
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// An annotation attached to a class, method, parameter, or module.
///
/// `name` is the annotation interface identity; `attributes` carries the
/// annotation's attribute values verbatim as JSON, since client generators
/// interpret well-known annotations (request mappings, parameter bindings)
/// by their attribute payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct AnnotationDef {
    /// Annotation interface identity.
    pub name: String,

    /// Attribute values, keyed by attribute name. Omitted if empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[ts(type = "Record<string, any>")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl AnnotationDef {
    /// Creates an annotation with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute value, consuming and returning the annotation.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// A class field (member) with its rendered type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MemberDef {
    /// Field name.
    pub name: String,

    /// Rendered type of the field.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Annotations declared on the field. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,
}

/// A method or route handler parameter with its rendered type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ParameterDef {
    /// Parameter name.
    pub name: String,

    /// Rendered type of the parameter.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Annotations declared on the parameter. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,
}

/// A method recorded on a class because the caller's important-method
/// predicate accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MethodDef {
    /// Method name.
    pub name: String,

    /// Ordered parameter list.
    pub parameters: Vec<ParameterDef>,

    /// Rendered return type.
    #[serde(rename = "returnType")]
    pub return_type: String,

    /// Annotations declared on the method. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,
}

/// Metadata for one class identity.
///
/// Built exactly once per identity within a transaction. The rendered
/// `superclass` and `interfaces` strings reference types that were
/// themselves collected when this descriptor was built, so every name
/// appearing here resolves to a class or enum entry in the same snapshot
/// (unless excluded by the class filter).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct ClassDef {
    /// Canonical identity of the class.
    pub name: TypeName,

    /// Declared type parameter names, in declaration order. Omitted if empty.
    #[serde(rename = "typeParameters", default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,

    /// Rendered superclass type. Absent for root types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    /// Rendered implemented interface types. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,

    /// Fields, in declaration order.
    pub members: Vec<MemberDef>,

    /// Methods accepted by the important-method predicate. Omitted if empty.
    #[serde(rename = "importantMethods", default, skip_serializing_if = "Vec::is_empty")]
    pub important_methods: Vec<MethodDef>,

    /// Annotations declared on the class. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,
}

/// One constant of an enum type.
///
/// `value` is the constant's wire value (a string or a number; client
/// generators derive the enum's overall value type from the set of
/// constants), `properties` carries any additional per-constant fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct EnumConstantDef {
    /// Constant name.
    pub name: String,

    /// Wire value of the constant.
    #[ts(type = "any")]
    pub value: serde_json::Value,

    /// Additional per-constant properties. Omitted if empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    #[ts(type = "Record<string, any>")]
    pub properties: BTreeMap<String, serde_json::Value>,

    /// Annotations declared on the constant. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,
}

/// Metadata for one enum identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct EnumDef {
    /// Canonical identity of the enum.
    pub name: TypeName,

    /// Constants, in declaration order.
    pub constants: Vec<EnumConstantDef>,
}

/// Metadata for one module identity.
///
/// Modules are the caller's explicit registrations of an API surface (the
/// route-owning beans), recorded unconditionally; the class filter does
/// not apply to them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct ModuleDef {
    /// Canonical identity of the module.
    pub name: TypeName,

    /// Annotations declared on the module. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,
}

/// HTTP request method of a route.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

impl HttpMethod {
    /// Returns the uppercase wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One header match expression of a route, e.g. `X-Api-Version=2` or
/// `!X-Legacy`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct HeaderMatch {
    /// Header name.
    pub name: String,

    /// Required header value. Absent when only presence/absence matters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Whether the expression is negated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negated: bool,
}

/// Metadata for one discovered route (handler method).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct RouteDef {
    /// Handler method name.
    pub name: String,

    /// Identity of the owning module (the route's bean).
    pub bean: TypeName,

    /// Accepted HTTP methods, sorted and deduplicated.
    pub methods: Vec<HttpMethod>,

    /// Ordered path patterns.
    pub patterns: Vec<String>,

    /// Header match expressions. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderMatch>,

    /// Ordered handler parameter list.
    pub parameters: Vec<ParameterDef>,

    /// Annotations declared on the handler method. Omitted if empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationDef>,

    /// Rendered return type of the handler.
    #[serde(rename = "returnType")]
    pub return_type: String,
}

impl RouteDef {
    /// Computes the route's sort key.
    ///
    /// The key orders by first pattern, then method set, then handler name,
    /// falling back to the owning bean and the parameter type signature so
    /// the order is total over distinct handlers. It is used purely for
    /// deterministic ordering, never for descriptor equality.
    pub fn sort_key(&self) -> RouteKey {
        RouteKey {
            pattern: self.patterns.first().cloned().unwrap_or_default(),
            methods: self
                .methods
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(","),
            name: self.name.clone(),
            bean: self.bean.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|p| p.type_name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Total-order sort key for routes.
///
/// Derived from a [`RouteDef`]; never serialized. Two routes with the same
/// full key are the same handler registration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteKey {
    /// First path pattern of the route (empty if the route has none).
    pub pattern: String,
    /// Comma-joined method set.
    pub methods: String,
    /// Handler method name.
    pub name: String,
    /// Owning bean identity.
    pub bean: TypeName,
    /// Comma-joined parameter type signature.
    pub parameters: String,
}

/// The immutable result of one collection transaction.
///
/// Ordering is part of the contract: two transactions collecting the same
/// inputs produce byte-identical serialized snapshots regardless of the
/// order their collection entry points were called in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct Snapshot {
    /// Modules in registration order.
    pub modules: Vec<ModuleDef>,

    /// Routes in ascending [`RouteKey`] order.
    pub routes: Vec<RouteDef>,

    /// Classes in ascending identity order.
    pub classes: Vec<ClassDef>,

    /// Enums in ascending identity order.
    pub enums: Vec<EnumDef>,
}

impl Snapshot {
    /// Looks up a class descriptor by identity.
    pub fn find_class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name.as_str() == name)
    }

    /// Looks up an enum descriptor by identity.
    pub fn find_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.iter().find(|e| e.name.as_str() == name)
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
            && self.routes.is_empty()
            && self.classes.is_empty()
            && self.enums.is_empty()
    }
}
