//! Type-graph and route collection for apigraph.
//!
//! This crate is the collection engine: it walks generic type expressions
//! presented by the host application's type system, builds one descriptor
//! per raw identity, gathers route descriptors from a discovery layer, and
//! assembles everything into a deterministic, deduplicated
//! [`Snapshot`](apigraph_schemas::Snapshot) suitable for client generation.
//!
//! Key responsibilities:
//! - Decomposing arbitrary type expressions (classes, arrays, generics,
//!   wildcards, type variables) into raw identities
//! - Terminating on cyclic type graphs via a structural recursion guard
//!   plus placeholder-based identity memoization
//! - Enforcing the single-active-transaction discipline with
//!   thread-scoped state and guaranteed teardown
//!
//! ## Usage
//!
//! All collection happens inside one transaction per logical execution:
//!
//! ```ignore
//! use apigraph_collect as collect;
//!
//! let snapshot = collect::run(
//!     Some(Box::new(|name: &str| name.starts_with("java."))),
//!     None,
//!     || {
//!         collect::collect_module(controller.as_ref())?;
//!         let route = collect::route_from_handler(info, bean, &handler)?;
//!         collect::collect_route(route)?;
//!         collect::collect_type(&some_expr)?;
//!         collect::dump()
//!     },
//! )??;
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the schema types from `apigraph_schemas` for
//! convenience. See [`apigraph_schemas`] for schema documentation.

mod collect;
mod context;
mod error;
mod routes;
#[cfg(test)]
mod testutil;
mod types;

// Re-export schema types for convenience.
#[doc(inline)]
pub use apigraph_schemas::{
    AnnotationDef, ClassDef, EnumConstantDef, EnumDef, HeaderMatch, HttpMethod, MemberDef,
    MethodDef, ModuleDef, ParameterDef, RouteDef, RouteKey, Snapshot, TypeName,
};

#[doc(inline)]
pub use crate::collect::{collect_type, collected_name};
#[doc(inline)]
pub use crate::context::{
    ClassExcluder, MethodMatcher, collect_module, dump, match_class, match_important_method, run,
};
#[doc(inline)]
pub use crate::error::{CollectError, SourceError};
#[doc(inline)]
pub use crate::routes::{RouteInfo, collect_route, route_from_handler};
#[doc(inline)]
pub use crate::types::{
    ClassShape, RawClass, RawField, RawMethod, RawParameter, TypeExpr, TypeVariable,
};
