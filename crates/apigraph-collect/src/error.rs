//! Error types for the apigraph-collect crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Failure payload produced by a collaborator's introspection call.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for collection operations.
///
/// This error captures transaction-discipline violations and collaborator
/// introspection failures. The variants are not exposed publicly; use the
/// `is_xxx()` methods instead.
#[derive(Debug)]
pub struct CollectError {
    kind: CollectErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum CollectErrorKind {
    /// A collection or dump operation was invoked outside a transaction.
    NoActiveContext,
    /// A transaction was begun while one is already bound to this thread.
    AlreadyActive,
    /// The type-system collaborator failed while resolving a member.
    Introspection(SourceError),
}

impl CollectError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: CollectErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `NoActiveContext` error.
    pub(crate) fn no_active_context() -> Self {
        Self::new(CollectErrorKind::NoActiveContext)
    }

    /// Creates an `AlreadyActive` error.
    pub(crate) fn already_active() -> Self {
        Self::new(CollectErrorKind::AlreadyActive)
    }

    /// Wraps a collaborator introspection failure.
    pub(crate) fn introspection(err: SourceError) -> Self {
        Self::new(CollectErrorKind::Introspection(err))
    }

    /// Returns true if an operation was invoked outside a transaction.
    pub fn is_no_active_context(&self) -> bool {
        matches!(self.kind, CollectErrorKind::NoActiveContext)
    }

    /// Returns true if a transaction was begun while one was already bound.
    pub fn is_already_active(&self) -> bool {
        matches!(self.kind, CollectErrorKind::AlreadyActive)
    }

    /// Returns true if this error is a collaborator introspection failure.
    pub fn is_introspection(&self) -> bool {
        matches!(self.kind, CollectErrorKind::Introspection(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for CollectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectErrorKind::NoActiveContext => {
                write!(f, "no collection transaction is active on this thread")
            }
            CollectErrorKind::AlreadyActive => {
                write!(f, "a collection transaction is already active on this thread")
            }
            CollectErrorKind::Introspection(err) => {
                write!(f, "type introspection failed: {err}")
            }
        }
    }
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Summary of what happened.
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            CollectErrorKind::NoActiveContext | CollectErrorKind::AlreadyActive => None,
            CollectErrorKind::Introspection(err) => Some(err.as_ref()),
        }
    }
}
