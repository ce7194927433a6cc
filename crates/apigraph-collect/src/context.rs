//! The collection transaction: thread-bound state, predicates, and dump.
//!
//! One transaction owns all mutable collection state: the three identity
//! registries, the route set, the two caller-supplied predicates, and the
//! structural recursion guard. The state block is bound to the current
//! thread for the duration of [`run`] and torn down on every exit path, so
//! a pooled thread reused for a later logical task always starts clean.
//!
//! All accesses to the bound state are short-lived: no borrow is ever held
//! while collaborator code (predicates, `RawClass` methods, the transaction
//! closure itself) runs, which is what lets descriptor construction reenter
//! the walker.

use std::cell::RefCell;
use std::collections::BTreeMap;

use apigraph_schemas::{ClassDef, EnumDef, ModuleDef, RouteDef, RouteKey, Snapshot, TypeName};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::CollectError;
use crate::types::{RawClass, RawMethod};

/// Class-exclusion predicate: `true` means "exclude this identity from
/// collection". Absent predicate retains everything.
pub type ClassExcluder = Box<dyn Fn(&str) -> bool>;

/// Important-method predicate, consulted by class descriptor construction.
/// Absent predicate marks no method important.
pub type MethodMatcher = Box<dyn Fn(&RawMethod) -> bool>;

/// Registry slot for one class identity.
///
/// `InProgress` is inserted before descriptor construction begins and
/// overwritten on completion; it is what breaks mutual-reference cycles
/// between classes. `InProgress` entries never reach a [`Snapshot`].
pub(crate) enum Slot {
    InProgress,
    Ready(ClassDef),
}

/// All mutable state of one collection transaction.
pub(crate) struct State {
    pub(crate) classes: BTreeMap<TypeName, Slot>,
    pub(crate) enums: BTreeMap<TypeName, EnumDef>,
    /// Modules keep registration order in the snapshot.
    pub(crate) modules: IndexMap<TypeName, ModuleDef>,
    pub(crate) routes: BTreeMap<RouteKey, RouteDef>,
    /// Rendered keys of expressions currently being decomposed.
    pub(crate) guard: IndexSet<String>,
    excluder: Option<ClassExcluder>,
    matcher: Option<MethodMatcher>,
}

impl State {
    fn new(excluder: Option<ClassExcluder>, matcher: Option<MethodMatcher>) -> Self {
        Self {
            classes: BTreeMap::new(),
            enums: BTreeMap::new(),
            modules: IndexMap::new(),
            routes: BTreeMap::new(),
            guard: IndexSet::new(),
            excluder,
            matcher,
        }
    }

    fn match_class(&self, name: &str) -> bool {
        // The excluder specifies which identities to drop, so retention is
        // the negation.
        match &self.excluder {
            Some(excluder) => !excluder(name),
            None => true,
        }
    }

    fn match_important_method(&self, method: &RawMethod) -> bool {
        match &self.matcher {
            Some(matcher) => matcher(method),
            None => false,
        }
    }
}

thread_local! {
    static CURRENT: RefCell<Option<State>> = const { RefCell::new(None) };
}

/// Clears the thread binding when dropped, including on unwind.
struct Unbind;

impl Drop for Unbind {
    fn drop(&mut self) {
        CURRENT.with(|cell| cell.borrow_mut().take());
    }
}

/// Runs `f` against the bound state.
///
/// Fails with a `NoActiveContext` error outside a transaction. The borrow
/// lasts only for the duration of `f`; callers must not invoke collaborator
/// code or reenter collection from inside `f`.
pub(crate) fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> Result<R, CollectError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(state) => Ok(f(state)),
            None => Err(CollectError::no_active_context()),
        }
    })
}

/// Executes one collection transaction on the current thread.
///
/// Binds a fresh state block, runs `transaction`, and unbinds on every exit
/// path, including unwinds, so a later transaction on the same thread is
/// never blocked by stale state.
///
/// # Errors
///
/// Fails with an `AlreadyActive` error if a transaction is already bound to
/// this thread. The bound transaction is left untouched; transactions never
/// nest or queue.
pub fn run<R>(
    excluder: Option<ClassExcluder>,
    matcher: Option<MethodMatcher>,
    transaction: impl FnOnce() -> R,
) -> Result<R, CollectError> {
    CURRENT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            return Err(CollectError::already_active());
        }
        *slot = Some(State::new(excluder, matcher));
        Ok(())
    })?;
    let _unbind = Unbind;
    Ok(transaction())
}

/// Returns whether the identity is retained by the transaction's class
/// filter.
///
/// Route discovery uses this to apply the same decision to handler owners
/// that the walker applies to transitively reached types.
pub fn match_class(name: &str) -> Result<bool, CollectError> {
    with_state(|state| state.match_class(name))
}

/// Returns whether the method is accepted by the transaction's
/// important-method predicate.
pub fn match_important_method(method: &RawMethod) -> Result<bool, CollectError> {
    with_state(|state| state.match_important_method(method))
}

/// Records a module registration.
///
/// Modules are the caller's explicit declaration of an API surface, so the
/// class filter is not applied. Memoized by identity; the first
/// registration wins and later ones are ignored.
pub fn collect_module(raw: &dyn RawClass) -> Result<(), CollectError> {
    let name = TypeName::new(raw.name());
    if with_state(|state| state.modules.contains_key(&name))? {
        return Ok(());
    }
    // Collaborator call kept outside the state borrow.
    let def = ModuleDef {
        name: name.clone(),
        annotations: raw.annotations(),
    };
    debug!(module = %name, "collected module");
    with_state(|state| {
        state.modules.entry(name).or_insert(def);
    })
}

/// Copies the transaction's state into an immutable [`Snapshot`].
///
/// Classes and enums are emitted in ascending identity order, routes in
/// ascending sort-key order, modules in registration order. In-progress
/// class slots are filtered out, so a snapshot taken while a collection
/// call is failing part-way never exposes a half-built descriptor.
pub fn dump() -> Result<Snapshot, CollectError> {
    with_state(|state| Snapshot {
        modules: state.modules.values().cloned().collect(),
        routes: state.routes.values().cloned().collect(),
        classes: state
            .classes
            .values()
            .filter_map(|slot| match slot {
                Slot::Ready(def) => Some(def.clone()),
                Slot::InProgress => None,
            })
            .collect(),
        enums: state.enums.values().cloned().collect(),
    })
}
