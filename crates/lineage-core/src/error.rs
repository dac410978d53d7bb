//! Error types for `lineage-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(String),

  #[error("family not found: {0}")]
  FamilyNotFound(String),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(String),

  #[error("unknown relationship kind code: {0:?}")]
  UnknownRelationshipKind(String),

  #[error("unknown status code: {0:?}")]
  UnknownStatus(String),

  #[error("unknown gender code: {0:?}")]
  UnknownGender(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
