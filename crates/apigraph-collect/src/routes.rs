//! Route collection and composition.
//!
//! Route descriptors are composed by the caller (a framework-specific
//! discovery layer presents each handler as a [`RouteInfo`] plus a
//! [`RawMethod`]) and inserted into a set ordered by the explicit
//! [`RouteKey`] comparator, so snapshot route order never depends on the
//! order the discovery source yields handlers in.

use apigraph_schemas::{HeaderMatch, HttpMethod, ParameterDef, RouteDef, TypeName};
use tracing::debug;

use crate::collect::collected_name;
use crate::context::with_state;
use crate::error::CollectError;
use crate::types::RawMethod;

/// Framework-agnostic route metadata produced by a discovery source.
#[derive(Debug, Clone, Default)]
pub struct RouteInfo {
    /// Accepted HTTP methods. Normalized (sorted, deduplicated) during
    /// composition.
    pub methods: Vec<HttpMethod>,
    /// Ordered path patterns.
    pub patterns: Vec<String>,
    /// Header match expressions.
    pub headers: Vec<HeaderMatch>,
}

/// Composes a route descriptor from a discovered handler method.
///
/// Every parameter type and the return type are collected as a side effect,
/// so inserting the resulting route pulls the handler's full type
/// neighborhood into the transaction.
///
/// # Errors
///
/// Fails with `NoActiveContext` outside a transaction, or with an
/// introspection error propagated from collecting the handler's types.
pub fn route_from_handler(
    info: RouteInfo,
    bean: &str,
    handler: &RawMethod,
) -> Result<RouteDef, CollectError> {
    let mut methods = info.methods;
    methods.sort_unstable();
    methods.dedup();

    let mut parameters = Vec::new();
    for parameter in &handler.parameters {
        parameters.push(ParameterDef {
            name: parameter.name.clone(),
            type_name: collected_name(&parameter.ty)?,
            annotations: parameter.annotations.clone(),
        });
    }
    let return_type = collected_name(&handler.return_type)?;

    Ok(RouteDef {
        name: handler.name.clone(),
        bean: TypeName::new(bean),
        methods,
        patterns: info.patterns,
        headers: info.headers,
        parameters,
        annotations: handler.annotations.clone(),
        return_type,
    })
}

/// Inserts a composed route into the transaction's route set.
///
/// The set is ordered by [`RouteDef::sort_key`]; a route whose full key is
/// already present is the same handler registration and is ignored, so
/// re-running discovery within one transaction is idempotent.
///
/// # Errors
///
/// Fails with `NoActiveContext` outside a transaction.
pub fn collect_route(route: RouteDef) -> Result<(), CollectError> {
    let key = route.sort_key();
    debug!(route = %route.name, pattern = %key.pattern, "collected route");
    with_state(|state| {
        state.routes.entry(key).or_insert(route);
    })
}
