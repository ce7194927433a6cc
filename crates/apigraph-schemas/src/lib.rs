//! Schema definitions for apigraph snapshots.
//!
//! This crate contains the data structures that define apigraph's output
//! format: the descriptors collected from a running application's type
//! system and route table, and the [`Snapshot`] that bundles them. These
//! types are serialized to JSON and consumed by client generators.
//!
//! The schemas are designed to be:
//! - **Self-describing**: TypeScript bindings are derived from Rust types
//! - **Deterministic**: snapshot ordering is defined by explicit sort keys
//!   and identity strings, never by discovery order
//! - **Complete**: everything a client generator needs is captured
//! - **Shared**: used by both the collection engine and its consumers

mod defs;
#[cfg(test)]
mod testutil;

#[doc(inline)]
pub use defs::*;
