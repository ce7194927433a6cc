//! The type-graph walker and descriptor construction.
//!
//! This module contains the core collection logic: decomposing a
//! [`TypeExpr`] into its constituent raw identities and building one
//! descriptor per identity. Two distinct safeguards make the traversal
//! terminate on arbitrary type graphs:
//!
//! - The **structural guard** (an ordered set of in-progress expression
//!   keys) absorbs cycles within a single expression's expansion, such as a
//!   type variable bounded by an expression mentioning itself.
//! - The **placeholder slot** (inserted before a class descriptor is built)
//!   cuts mutual-reference cycles between distinct classes: if building `A`
//!   reaches `B` and building `B` reaches `A` again, the second request for
//!   `A` sees the occupied slot and returns without reentering
//!   construction.
//!
//! They solve different problems and are deliberately kept separate.

use std::collections::btree_map::Entry;

use apigraph_schemas::{ClassDef, EnumDef, MemberDef, MethodDef, ParameterDef, TypeName};
use tracing::{debug, warn};

use crate::context::{Slot, match_class, match_important_method, with_state};
use crate::error::CollectError;
use crate::types::{ClassShape, RawClass, RawMethod, TypeExpr};

/// Collects every raw identity reachable from a type expression.
///
/// Decomposition order: wildcard bounds (lower, then upper), type-variable
/// bounds, parameterized raw type then arguments, array element, and
/// finally class delegation. An expression whose rendered key is already
/// being decomposed higher up the stack returns immediately; the key is
/// released when this expression's descent completes, so sibling branches
/// are unaffected.
///
/// # Errors
///
/// Fails with `NoActiveContext` outside a transaction, or with an
/// introspection error propagated from the collaborator.
pub fn collect_type(expr: &TypeExpr) -> Result<(), CollectError> {
    let key = expr.render();
    let entered = with_state(|state| state.guard.insert(key.clone()))?;
    if !entered {
        // Cycle back to an ancestor of the current expansion.
        return Ok(());
    }
    let result = walk(expr);
    // Release the guard on success and error paths alike.
    with_state(|state| {
        state.guard.shift_remove(&key);
    })?;
    result
}

/// Collects a type expression and returns its rendered name.
///
/// Descriptor builders and route composition use this wherever a type name
/// is recorded, so every name appearing in a snapshot belongs to a type
/// that was walked.
pub fn collected_name(expr: &TypeExpr) -> Result<String, CollectError> {
    collect_type(expr)?;
    Ok(expr.render())
}

/// One decomposition step, assuming the guard already covers `expr`.
fn walk(expr: &TypeExpr) -> Result<(), CollectError> {
    match expr {
        // `? super Foo` and `? extends Foo`: collect every bound.
        TypeExpr::Wildcard { lower, upper } => {
            for bound in lower {
                collect_type(bound)?;
            }
            for bound in upper {
                collect_type(bound)?;
            }
            Ok(())
        }
        // `T extends Foo & Bar`: collect every declared bound.
        TypeExpr::Variable(var) => {
            for bound in var.bounds() {
                collect_type(&bound)?;
            }
            Ok(())
        }
        // `A<B, C>` decomposes into A, B, and C.
        TypeExpr::Parameterized { raw, args } => {
            collect_type(raw)?;
            for arg in args {
                collect_type(arg)?;
            }
            Ok(())
        }
        // Find the element of `T[]`, e.g. `List<Long>` from `List<Long>[]`.
        TypeExpr::Array(elem) => collect_type(elem),
        TypeExpr::Class(raw) => collect_class(raw.as_ref()),
    }
}

/// Collects one raw class identity.
fn collect_class(raw: &dyn RawClass) -> Result<(), CollectError> {
    match raw.shape() {
        // Primitive identities produce no descriptor.
        ClassShape::Primitive => return Ok(()),
        // Array identities delegate to the component type.
        ClassShape::Array(component) => return collect_type(&component),
        ClassShape::Enum => return collect_enum(raw),
        ClassShape::Plain => {}
    }

    if !match_class(raw.name())? {
        return Ok(());
    }

    let name = TypeName::new(raw.name());

    // The memoization cut: any existing slot (placeholder or complete)
    // means this identity is already handled. Inserting the placeholder
    // before construction is what breaks mutual-reference cycles.
    let inserted = with_state(|state| match state.classes.entry(name.clone()) {
        Entry::Vacant(entry) => {
            entry.insert(Slot::InProgress);
            true
        }
        Entry::Occupied(_) => false,
    })?;
    if !inserted {
        return Ok(());
    }

    match build_class(raw) {
        Ok(def) => {
            debug!(class = %name, "collected class");
            with_state(|state| {
                state.classes.insert(name, Slot::Ready(def));
            })
        }
        Err(err) => {
            // Drop the placeholder so a later collection attempt within
            // this transaction can retry the identity.
            warn!(class = %name, "class construction failed, releasing slot");
            with_state(|state| {
                state.classes.remove(name.as_str());
            })?;
            Err(err)
        }
    }
}

/// Builds the descriptor for a plain class identity.
///
/// Every referenced type (superclass, interfaces, field types, important
/// method signatures) is collected through [`collected_name`], which is
/// the second reentry point into the walker.
fn build_class(raw: &dyn RawClass) -> Result<ClassDef, CollectError> {
    let superclass = match raw.superclass() {
        Some(ty) => Some(collected_name(&ty)?),
        None => None,
    };

    let mut interfaces = Vec::new();
    for ty in raw.interfaces() {
        interfaces.push(collected_name(&ty)?);
    }

    let mut members = Vec::new();
    for field in raw.fields().map_err(CollectError::introspection)? {
        members.push(MemberDef {
            name: field.name,
            type_name: collected_name(&field.ty)?,
            annotations: field.annotations,
        });
    }

    let mut important_methods = Vec::new();
    for method in raw.methods().map_err(CollectError::introspection)? {
        if match_important_method(&method)? {
            important_methods.push(build_method(method)?);
        }
    }

    Ok(ClassDef {
        name: TypeName::new(raw.name()),
        type_parameters: raw.type_parameters(),
        superclass,
        interfaces,
        members,
        important_methods,
        annotations: raw.annotations(),
    })
}

/// Builds the descriptor for one important method.
fn build_method(method: RawMethod) -> Result<MethodDef, CollectError> {
    let mut parameters = Vec::new();
    for parameter in method.parameters {
        parameters.push(ParameterDef {
            name: parameter.name,
            type_name: collected_name(&parameter.ty)?,
            annotations: parameter.annotations,
        });
    }
    Ok(MethodDef {
        name: method.name,
        parameters,
        return_type: collected_name(&method.return_type)?,
        annotations: method.annotations,
    })
}

/// Collects one enum identity.
///
/// Filter-gated and memoized exactly like classes, but without a
/// placeholder: enum construction records the constant set verbatim and
/// never reenters the walker.
fn collect_enum(raw: &dyn RawClass) -> Result<(), CollectError> {
    if !match_class(raw.name())? {
        return Ok(());
    }
    let name = TypeName::new(raw.name());
    if with_state(|state| state.enums.contains_key(&name))? {
        return Ok(());
    }
    let constants = raw.enum_constants().map_err(CollectError::introspection)?;
    debug!(enumeration = %name, "collected enum");
    let def = EnumDef {
        name: name.clone(),
        constants,
    };
    with_state(|state| {
        state.enums.entry(name).or_insert(def);
    })
}
