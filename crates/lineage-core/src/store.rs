//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `lineage-store-sqlite`).
//! The graph engine (`lineage-graph`) depends on this abstraction, not on any
//! concrete backend. It models a generic document store: create / read /
//! update / delete-by-id plus list-with-filter over three collections.

use std::future::Future;

use crate::{
  family::{Family, NewFamily},
  person::{NewPerson, Person, PersonPatch, RecordStatus},
  relationship::{NewRelationship, Relationship, RelationshipKind},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`RecordStore::list_persons`].
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
  pub status:      Option<RecordStatus>,
  /// If `true`, restrict to persons with the visibility flag set.
  pub public_only: bool,
  /// Free-text filter applied over name fields.
  pub text:        Option<String>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}

/// Parameters for [`RecordStore::list_relationships`].
#[derive(Debug, Clone, Default)]
pub struct RelationshipQuery {
  /// Match relationships with this person as *either* endpoint.
  pub person: Option<String>,
  pub kind:   Option<RelationshipKind>,
  pub status: Option<RecordStatus>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Lineage record store backend.
///
/// Every operation is a single independent round-trip; the engine awaits
/// them sequentially and isolates failures per item. All methods return
/// `Send` futures so the trait can be used in multi-threaded async runtimes.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Create and persist a new person. When `input.id` is `Some`, the store
  /// must use it verbatim and error if it is already taken.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Apply a partial update; only fields present in the patch change.
  /// Returns the updated record.
  fn update_person<'a>(
    &'a self,
    id: &'a str,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + 'a;

  /// Delete a person record by id. Errors if the id does not exist.
  fn delete_person<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// List persons matching `query`.
  fn list_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  // ── Families (legacy supplement source) ───────────────────────────────

  /// Create and persist a family grouping record.
  fn create_family(
    &self,
    input: NewFamily,
  ) -> impl Future<Output = Result<Family, Self::Error>> + Send + '_;

  /// List all families, optionally filtered by status.
  fn list_families(
    &self,
    status: Option<RecordStatus>,
  ) -> impl Future<Output = Result<Vec<Family>, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Create and persist a relationship edge.
  fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> impl Future<Output = Result<Relationship, Self::Error>> + Send + '_;

  /// Delete a relationship record by id. Errors if the id does not exist.
  fn delete_relationship<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// List relationships matching `query`.
  fn list_relationships<'a>(
    &'a self,
    query: &'a RelationshipQuery,
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + 'a;
}
