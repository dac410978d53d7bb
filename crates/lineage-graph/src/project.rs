//! Person data projection: person records → the flat field shape the
//! visualization widget expects.
//!
//! The widget wants every key present (empty string over absent), plain
//! calendar-date strings, and a two-valued gender domain.

use chrono::NaiveDate;
use lineage_core::person::{Gender, Person};
use serde::{Deserialize, Serialize};

/// Date format used across the snapshot boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name used when nothing derivable is on the record.
pub const UNKNOWN_NAME: &str = "Unknown";

// ─── Projected shape ─────────────────────────────────────────────────────────

/// The flat projected person fields. All text fields are present-but-empty
/// rather than absent; the consuming format does not tolerate missing keys.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectedPerson {
  pub name:        String,
  pub first_name:  String,
  pub last_name:   String,
  /// `"M"` or `"F"` — see [`coerce_gender`].
  pub gender:      String,
  pub birth_date:  String,
  pub birth_place: String,
  pub death_date:  String,
  pub death_place: String,
  pub deceased:    bool,
  pub occupation:  String,
  pub bio:         String,
  pub contact:     String,
  pub address:     String,
  pub notes:       String,
  pub nickname:    String,
  pub maiden_name: String,
}

impl ProjectedPerson {
  /// How many text fields carry data — used to pick the best of duplicate
  /// snapshot nodes.
  pub fn populated_field_count(&self) -> usize {
    [
      &self.name,
      &self.first_name,
      &self.last_name,
      &self.gender,
      &self.birth_date,
      &self.birth_place,
      &self.death_date,
      &self.death_place,
      &self.occupation,
      &self.bio,
      &self.contact,
      &self.address,
      &self.notes,
      &self.nickname,
      &self.maiden_name,
    ]
    .iter()
    .filter(|f| !f.is_empty())
    .count()
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Derive the display name: the explicit `name` field when present,
/// otherwise the non-empty name parts joined with single spaces, falling
/// back to the literal [`UNKNOWN_NAME`].
pub fn derive_full_name(person: &Person) -> String {
  if let Some(name) = person.name.as_deref()
    && !name.trim().is_empty()
  {
    return name.trim().to_owned();
  }
  let joined = [
    person.title.as_deref(),
    person.first_name.as_deref(),
    person.middle_name.as_deref(),
    person.last_name.as_deref(),
  ]
  .into_iter()
  .flatten()
  .map(str::trim)
  .filter(|part| !part.is_empty())
  .collect::<Vec<_>>()
  .join(" ");

  if joined.is_empty() {
    UNKNOWN_NAME.to_owned()
  } else {
    joined
  }
}

/// Split a full name on whitespace: a single token is entirely a first
/// name; otherwise the first token is the first name and the rest joins
/// into the last name.
pub fn split_name(full: &str) -> (String, String) {
  let mut tokens = full.split_whitespace();
  let first = tokens.next().unwrap_or_default().to_owned();
  let rest = tokens.collect::<Vec<_>>().join(" ");
  (first, rest)
}

/// Coerce the four-valued gender domain into the widget's two codes.
///
/// **This is lossy and one-way.** The visualization format supports only
/// `"M"` and `"F"`, so `Other` and `Unknown` both map to `"M"` as the
/// defined default. No inverse exists: a record round-tripped through the
/// widget comes back as male.
pub fn coerce_gender(gender: Gender) -> &'static str {
  match gender {
    Gender::Female => "F",
    Gender::Male | Gender::Other | Gender::Unknown => "M",
  }
}

fn date_string(date: Option<NaiveDate>) -> String {
  date
    .map(|d| d.format(DATE_FORMAT).to_string())
    .unwrap_or_default()
}

fn text(field: &Option<String>) -> String {
  field.clone().unwrap_or_default()
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Project one person record into the widget's flat shape.
pub fn project_person(person: &Person) -> ProjectedPerson {
  let name = derive_full_name(person);
  let (split_first, split_last) = split_name(&name);

  let first_name = person
    .first_name
    .clone()
    .filter(|f| !f.is_empty())
    .unwrap_or(split_first);
  let last_name = person
    .last_name
    .clone()
    .filter(|l| !l.is_empty())
    .unwrap_or(split_last);

  ProjectedPerson {
    name,
    first_name,
    last_name,
    gender: coerce_gender(person.gender).to_owned(),
    birth_date: date_string(person.birth_date),
    birth_place: text(&person.birth_place),
    death_date: date_string(person.death_date),
    death_place: text(&person.death_place),
    deceased: person.deceased,
    occupation: text(&person.occupation),
    bio: text(&person.bio),
    contact: text(&person.contact),
    address: text(&person.address),
    notes: text(&person.notes),
    nickname: text(&person.nickname),
    maiden_name: text(&person.maiden_name),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
