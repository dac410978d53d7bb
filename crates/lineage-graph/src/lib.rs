//! Family-tree graph derivation and reconciliation engine.
//!
//! The forward pipeline turns flat person / family / relationship records
//! into the per-node graph snapshot a visualization widget consumes
//! ([`transform`]). The inverse pipeline diffs an edited snapshot against
//! the pre-edit one ([`diff`]) and persists the change set through any
//! [`lineage_core::store::RecordStore`] backend ([`reconcile`]).
//!
//! Everything except the reconciliation writer is pure, synchronous
//! computation over in-memory structures; the writer awaits one store
//! round-trip per item so failures stay isolated per record.

pub mod adjacency;
pub mod diff;
pub mod error;
pub mod project;
pub mod reconcile;
pub mod snapshot;
pub mod transform;
pub mod validate;

pub use error::{Error, Result};
