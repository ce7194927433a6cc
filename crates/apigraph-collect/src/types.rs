//! Type expressions and the type-system collaborator seam.
//!
//! The walker consumes [`TypeExpr`] values read-only. Terminal class nodes
//! and type variables are trait objects supplied by the host application's
//! type system, so member types and variable bounds are resolved on demand.
//! That laziness is what makes self-referential shapes like
//! `T extends Comparable<T>` and mutually referential classes expressible.

use std::fmt;
use std::sync::Arc;

use apigraph_schemas::{AnnotationDef, EnumConstantDef};

use crate::error::SourceError;

/// Structural kind of a raw type, as reported by the collaborator.
#[derive(Clone)]
pub enum ClassShape {
    /// A primitive type. Never collected.
    Primitive,
    /// An array type carrying its component type. Collection delegates to
    /// the component and produces no descriptor for the array itself.
    Array(TypeExpr),
    /// An enum type. Collected via the enum registry.
    Enum,
    /// Any other class or interface type.
    Plain,
}

/// A raw type presented by the host application's type system.
///
/// `name()` is the canonical identity used for memoization; everything else
/// feeds descriptor construction. Introspection methods are fallible because
/// the collaborator may fail while resolving members; such failures
/// propagate out of the in-progress collection call.
pub trait RawClass: Send + Sync {
    /// Canonical dotted identity of this type.
    fn name(&self) -> &str;

    /// Structural kind of this type.
    fn shape(&self) -> ClassShape;

    /// Declared type parameter names, in declaration order.
    fn type_parameters(&self) -> Vec<String> {
        Vec::new()
    }

    /// Superclass type, if any.
    fn superclass(&self) -> Option<TypeExpr> {
        None
    }

    /// Implemented interface types, in declaration order.
    fn interfaces(&self) -> Vec<TypeExpr> {
        Vec::new()
    }

    /// Declared fields, in declaration order.
    fn fields(&self) -> Result<Vec<RawField>, SourceError> {
        Ok(Vec::new())
    }

    /// Declared methods, in declaration order. Only methods accepted by the
    /// transaction's important-method predicate are recorded.
    fn methods(&self) -> Result<Vec<RawMethod>, SourceError> {
        Ok(Vec::new())
    }

    /// Enum constants. Only consulted for [`ClassShape::Enum`] types.
    fn enum_constants(&self) -> Result<Vec<EnumConstantDef>, SourceError> {
        Ok(Vec::new())
    }

    /// Annotations declared on the type.
    fn annotations(&self) -> Vec<AnnotationDef> {
        Vec::new()
    }
}

/// A declared type variable (e.g. the `T` of `class Repo<T extends Entity>`).
///
/// Bounds are produced on demand rather than stored eagerly, so a bound may
/// mention the variable itself.
pub trait TypeVariable: Send + Sync {
    /// Declared name of the variable.
    fn name(&self) -> &str;

    /// Declared bounds, in declaration order.
    fn bounds(&self) -> Vec<TypeExpr>;
}

/// A declared field, input to class descriptor construction.
#[derive(Clone)]
pub struct RawField {
    /// Field name.
    pub name: String,
    /// Declared type of the field.
    pub ty: TypeExpr,
    /// Annotations declared on the field.
    pub annotations: Vec<AnnotationDef>,
}

/// A declared method parameter.
#[derive(Clone)]
pub struct RawParameter {
    /// Parameter name.
    pub name: String,
    /// Declared type of the parameter.
    pub ty: TypeExpr,
    /// Annotations declared on the parameter.
    pub annotations: Vec<AnnotationDef>,
}

/// A declared method, input to descriptor construction and route
/// composition.
#[derive(Clone)]
pub struct RawMethod {
    /// Method name.
    pub name: String,
    /// Ordered parameter list.
    pub parameters: Vec<RawParameter>,
    /// Declared return type.
    pub return_type: TypeExpr,
    /// Annotations declared on the method.
    pub annotations: Vec<AnnotationDef>,
}

/// A generic type expression, the unit the walker decomposes.
///
/// Produced by the collaborator, consumed read-only. Shared nodes are
/// reference-counted so one collaborator object can appear in many
/// expressions (and in its own bounds).
#[derive(Clone)]
pub enum TypeExpr {
    /// A raw class or interface reference.
    Class(Arc<dyn RawClass>),
    /// An array of some element type (`Foo[]`, `List<Long>[]`).
    Array(Box<TypeExpr>),
    /// A generic instantiation (`Map<String, Foo>`).
    Parameterized {
        /// The raw type being instantiated.
        raw: Box<TypeExpr>,
        /// Type arguments, in declaration order.
        args: Vec<TypeExpr>,
    },
    /// A wildcard (`?`, `? extends Foo`, `? super Foo`).
    Wildcard {
        /// Lower bounds (`? super X`).
        lower: Vec<TypeExpr>,
        /// Upper bounds (`? extends X`).
        upper: Vec<TypeExpr>,
    },
    /// A reference to a declared type variable.
    Variable(Arc<dyn TypeVariable>),
}

impl TypeExpr {
    /// Returns the canonical display name of this expression.
    ///
    /// Class and variable renderings deliberately omit parameter/bound
    /// expansion, so rendering terminates on cyclic expressions. The
    /// rendered name doubles as the structural recursion-guard key: two
    /// expressions with the same rendering are treated as the same node
    /// within a single expansion.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Class(raw) => f.write_str(raw.name()),
            TypeExpr::Array(elem) => write!(f, "{elem}[]"),
            TypeExpr::Parameterized { raw, args } => {
                write!(f, "{raw}")?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeExpr::Wildcard { lower, upper } => {
                if !lower.is_empty() {
                    f.write_str("? super ")?;
                    return write_bounds(f, lower);
                }
                if !upper.is_empty() {
                    f.write_str("? extends ")?;
                    return write_bounds(f, upper);
                }
                f.write_str("?")
            }
            TypeExpr::Variable(var) => f.write_str(var.name()),
        }
    }
}

impl fmt::Debug for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeExpr({self})")
    }
}

/// Writes a ` & `-joined bound list.
fn write_bounds(f: &mut fmt::Formatter<'_>, bounds: &[TypeExpr]) -> fmt::Result {
    for (i, bound) in bounds.iter().enumerate() {
        if i > 0 {
            f.write_str(" & ")?;
        }
        write!(f, "{bound}")?;
    }
    Ok(())
}
