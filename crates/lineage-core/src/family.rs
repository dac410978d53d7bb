//! Family — the legacy grouping record, read for backward compatibility.
//!
//! Modern relationship data lives in [`crate::relationship`]; families only
//! *supplement* the derived graph and never overwrite it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::RecordStatus;

/// A union of up to two primary partners plus extra partners and children.
/// The store does not enforce that referenced person ids exist; consumers
/// skip missing references defensively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
  pub id:         String,
  pub husband:    Option<String>,
  pub wife:       Option<String>,
  /// Additional partners beyond the two primary slots.
  pub partners:   Vec<String>,
  pub children:   Vec<String>,
  pub status:     RecordStatus,
  pub created_at: DateTime<Utc>,
}

impl Family {
  /// The full, de-duplicated partner list: husband, wife, then extras,
  /// preserving first-seen order.
  pub fn partner_ids(&self) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let candidates = self
      .husband
      .iter()
      .chain(self.wife.iter())
      .chain(self.partners.iter());
    for id in candidates {
      if !id.is_empty() && !out.iter().any(|p| p == id) {
        out.push(id.clone());
      }
    }
    out
  }
}

/// Input to [`crate::store::RecordStore::create_family`].
#[derive(Debug, Clone, Default)]
pub struct NewFamily {
  pub husband:  Option<String>,
  pub wife:     Option<String>,
  pub partners: Vec<String>,
  pub children: Vec<String>,
  pub status:   RecordStatus,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partner_ids_dedupes_and_orders() {
    let family = Family {
      id:         "f1".into(),
      husband:    Some("h".into()),
      wife:       Some("w".into()),
      partners:   vec!["x".into(), "h".into(), "".into()],
      children:   vec![],
      status:     RecordStatus::Active,
      created_at: Utc::now(),
    };
    assert_eq!(family.partner_ids(), vec!["h", "w", "x"]);
  }
}
