//! Relationship — a typed edge between two persons.
//!
//! The kind code set is closed: unknown strings are rejected where text
//! enters the system (parse, don't assume). Directionality is explicit: a
//! relationship reads "person A is `kind` of/to person B", and
//! `is_bidirectional` controls whether the symmetric entry is also derived.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::person::RecordStatus;

// ─── Kind codes ──────────────────────────────────────────────────────────────

/// The closed set of relationship type codes. `Married` is a synonym for
/// `Spouse` kept for legacy data.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  EnumString,
  AsRefStr,
  Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationshipKind {
  Parent,
  Child,
  Spouse,
  Married,
  Sibling,
  Grandparent,
  Grandchild,
  AuntUncle,
  NieceNephew,
  Cousin,
  InLaw,
  Guardian,
  Ward,
  AdoptiveParent,
  AdoptedChild,
  StepParent,
  StepChild,
  FosterParent,
  FosterChild,
  Godparent,
  Godchild,
}

impl RelationshipKind {
  /// `spouse` and its legacy synonym `married`.
  pub fn is_spousal(self) -> bool {
    matches!(self, Self::Spouse | Self::Married)
  }

  /// Kinds that behave exactly like `parent` (A is a parent figure of B).
  pub fn is_parent_like(self) -> bool {
    matches!(
      self,
      Self::Parent
        | Self::Guardian
        | Self::AdoptiveParent
        | Self::StepParent
        | Self::FosterParent
    )
  }

  /// Kinds that behave exactly like `child` (A is a child figure of B).
  pub fn is_child_like(self) -> bool {
    matches!(
      self,
      Self::Child
        | Self::Ward
        | Self::AdoptedChild
        | Self::StepChild
        | Self::FosterChild
    )
  }
}

// ─── Relationship ────────────────────────────────────────────────────────────

/// A persisted relationship record: "`person_a` is `kind` of `person_b`".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
  pub id:               String,
  pub person_a:         String,
  pub person_b:         String,
  pub kind:             RelationshipKind,
  pub is_bidirectional: bool,
  pub date:             Option<NaiveDate>,
  pub place:            Option<String>,
  pub note:             Option<String>,
  pub status:           RecordStatus,
  pub created_by:       Option<String>,
  pub created_at:       DateTime<Utc>,
}

impl Relationship {
  /// True if `id` is either endpoint.
  pub fn involves(&self, id: &str) -> bool {
    self.person_a == id || self.person_b == id
  }
}

// ─── NewRelationship ─────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::create_relationship`].
/// The id and `created_at` are set by the store.
#[derive(Debug, Clone)]
pub struct NewRelationship {
  pub person_a:         String,
  pub person_b:         String,
  pub kind:             RelationshipKind,
  pub is_bidirectional: bool,
  pub date:             Option<NaiveDate>,
  pub place:            Option<String>,
  pub note:             Option<String>,
  pub status:           RecordStatus,
  pub created_by:       Option<String>,
}

impl NewRelationship {
  /// An active edge with the conventional bidirectionality for its kind:
  /// spousal edges are symmetric, everything else is directional.
  pub fn edge(
    person_a: impl Into<String>,
    person_b: impl Into<String>,
    kind: RelationshipKind,
  ) -> Self {
    Self {
      person_a:         person_a.into(),
      person_b:         person_b.into(),
      kind,
      is_bidirectional: kind.is_spousal(),
      date:             None,
      place:            None,
      note:             None,
      status:           RecordStatus::Active,
      created_by:       None,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
