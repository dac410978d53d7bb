//! Error types for `lineage-graph`.
//!
//! Expected partial failures (dangling references, unknown codes read from
//! storage, individual write failures) never surface here — they become
//! warnings or error tallies. These variants cover total pipeline failure
//! only.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date range: {start} is after {end}")]
  InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
