//! In-memory fake type system for walker and context tests.
//!
//! `FakeClass` and `FakeVar` are mutable after construction so tests can
//! tie classes into cycles (`A` has a field of `B`, `B` has a field of `A`)
//! and give variables self-referential bounds, mirroring what a real
//! reflective type system hands the walker.

use std::sync::{Arc, Mutex};

use apigraph_schemas::{AnnotationDef, EnumConstantDef};

use crate::error::SourceError;
use crate::types::{
    ClassShape, RawClass, RawField, RawMethod, RawParameter, TypeExpr, TypeVariable,
};

/// Builds an enum constant with no extra properties.
pub fn constant(name: &str, value: serde_json::Value) -> EnumConstantDef {
    EnumConstantDef {
        name: name.to_owned(),
        value,
        properties: Default::default(),
        annotations: Vec::new(),
    }
}

/// Builds a method from `(parameter name, parameter type)` pairs.
pub fn method(name: &str, parameters: Vec<(&str, TypeExpr)>, return_type: TypeExpr) -> RawMethod {
    RawMethod {
        name: name.to_owned(),
        parameters: parameters
            .into_iter()
            .map(|(name, ty)| RawParameter {
                name: name.to_owned(),
                ty,
                annotations: Vec::new(),
            })
            .collect(),
        return_type,
        annotations: Vec::new(),
    }
}

/// A scriptable [`RawClass`] implementation.
pub struct FakeClass {
    name: String,
    shape: ClassShape,
    constants: Vec<EnumConstantDef>,
    type_parameters: Mutex<Vec<String>>,
    superclass: Mutex<Option<TypeExpr>>,
    interfaces: Mutex<Vec<TypeExpr>>,
    fields: Mutex<Vec<RawField>>,
    methods: Mutex<Vec<RawMethod>>,
    annotations: Mutex<Vec<AnnotationDef>>,
    field_failure: Mutex<Option<String>>,
}

impl FakeClass {
    fn new(name: &str, shape: ClassShape, constants: Vec<EnumConstantDef>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            shape,
            constants,
            type_parameters: Mutex::new(Vec::new()),
            superclass: Mutex::new(None),
            interfaces: Mutex::new(Vec::new()),
            fields: Mutex::new(Vec::new()),
            methods: Mutex::new(Vec::new()),
            annotations: Mutex::new(Vec::new()),
            field_failure: Mutex::new(None),
        })
    }

    /// An ordinary class or interface.
    pub fn plain(name: &str) -> Arc<Self> {
        Self::new(name, ClassShape::Plain, Vec::new())
    }

    /// A primitive type.
    pub fn primitive(name: &str) -> Arc<Self> {
        Self::new(name, ClassShape::Primitive, Vec::new())
    }

    /// An array type with the given component.
    pub fn array_of(name: &str, component: TypeExpr) -> Arc<Self> {
        Self::new(name, ClassShape::Array(component), Vec::new())
    }

    /// An enum type with the given constants.
    pub fn enumeration(name: &str, constants: Vec<EnumConstantDef>) -> Arc<Self> {
        Self::new(name, ClassShape::Enum, constants)
    }

    /// Wraps this class in a [`TypeExpr`].
    pub fn expr(self: &Arc<Self>) -> TypeExpr {
        TypeExpr::Class(self.clone())
    }

    pub fn add_field(&self, name: &str, ty: TypeExpr) {
        self.fields.lock().unwrap().push(RawField {
            name: name.to_owned(),
            ty,
            annotations: Vec::new(),
        });
    }

    pub fn add_method(&self, method: RawMethod) {
        self.methods.lock().unwrap().push(method);
    }

    pub fn add_type_parameter(&self, name: &str) {
        self.type_parameters.lock().unwrap().push(name.to_owned());
    }

    pub fn set_superclass(&self, ty: TypeExpr) {
        *self.superclass.lock().unwrap() = Some(ty);
    }

    pub fn add_interface(&self, ty: TypeExpr) {
        self.interfaces.lock().unwrap().push(ty);
    }

    pub fn add_annotation(&self, annotation: AnnotationDef) {
        self.annotations.lock().unwrap().push(annotation);
    }

    /// Makes `fields()` fail with the given message.
    pub fn fail_fields(&self, message: &str) {
        *self.field_failure.lock().unwrap() = Some(message.to_owned());
    }

    /// Makes `fields()` succeed again.
    pub fn clear_field_failure(&self) {
        *self.field_failure.lock().unwrap() = None;
    }
}

impl RawClass for FakeClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> ClassShape {
        self.shape.clone()
    }

    fn type_parameters(&self) -> Vec<String> {
        self.type_parameters.lock().unwrap().clone()
    }

    fn superclass(&self) -> Option<TypeExpr> {
        self.superclass.lock().unwrap().clone()
    }

    fn interfaces(&self) -> Vec<TypeExpr> {
        self.interfaces.lock().unwrap().clone()
    }

    fn fields(&self) -> Result<Vec<RawField>, SourceError> {
        if let Some(message) = self.field_failure.lock().unwrap().as_ref() {
            return Err(message.clone().into());
        }
        Ok(self.fields.lock().unwrap().clone())
    }

    fn methods(&self) -> Result<Vec<RawMethod>, SourceError> {
        Ok(self.methods.lock().unwrap().clone())
    }

    fn enum_constants(&self) -> Result<Vec<EnumConstantDef>, SourceError> {
        Ok(self.constants.clone())
    }

    fn annotations(&self) -> Vec<AnnotationDef> {
        self.annotations.lock().unwrap().clone()
    }
}

/// A scriptable [`TypeVariable`] implementation.
pub struct FakeVar {
    name: String,
    bounds: Mutex<Vec<TypeExpr>>,
}

impl FakeVar {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            bounds: Mutex::new(Vec::new()),
        })
    }

    /// Adds a bound; the bound may reference the variable itself.
    pub fn add_bound(&self, bound: TypeExpr) {
        self.bounds.lock().unwrap().push(bound);
    }
}

impl TypeVariable for FakeVar {
    fn name(&self) -> &str {
        &self.name
    }

    fn bounds(&self) -> Vec<TypeExpr> {
        self.bounds.lock().unwrap().clone()
    }
}
