//! Error type for `lineage-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lineage_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A caller-supplied person id collided with an existing record.
  #[error("person id already taken: {0}")]
  IdTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
