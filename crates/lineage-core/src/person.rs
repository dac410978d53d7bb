//! Person — the individual record at the centre of the genealogy graph.
//!
//! A person carries identity metadata, name parts, vital dates, and a
//! lifecycle status. The relationship structure between persons lives in
//! [`crate::relationship`] and (for legacy data) [`crate::family`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

// ─── Code sets ───────────────────────────────────────────────────────────────

/// The four-valued gender domain carried by person records.
///
/// Downstream visualization formats support only two codes; the coercion
/// lives in the graph engine, not here.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  EnumString,
  AsRefStr,
  Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  Other,
  #[default]
  Unknown,
}

/// Lifecycle status shared by person, family, and relationship records.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  EnumString,
  AsRefStr,
  Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
  #[default]
  Active,
  Inactive,
  Archived,
  Draft,
}

impl RecordStatus {
  pub fn is_active(self) -> bool { matches!(self, Self::Active) }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person record. Ids are opaque strings assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:            String,
  /// Explicit full name; when absent a display name is derived from parts.
  pub name:          Option<String>,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub maiden_name:   Option<String>,
  pub nickname:      Option<String>,
  pub title:         Option<String>,
  pub gender:        Gender,
  pub birth_date:    Option<NaiveDate>,
  pub birth_place:   Option<String>,
  pub death_date:    Option<NaiveDate>,
  pub death_place:   Option<String>,
  pub deceased:      bool,
  pub bio:           Option<String>,
  pub occupation:    Option<String>,
  pub contact:       Option<String>,
  pub address:       Option<String>,
  pub notes:         Option<String>,
  /// Visibility flag; private persons are excluded from default exports.
  pub is_public:     bool,
  pub display_order: i64,
  pub status:        RecordStatus,
  pub created_by:    Option<String>,
  pub updated_by:    Option<String>,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::create_person`].
///
/// `id` may be supplied by the caller (the reconciliation writer keeps the
/// snapshot node id so queued relationship edges stay valid); when `None`
/// the store mints one. Audit timestamps are always set by the store.
#[derive(Debug, Clone, Default)]
pub struct NewPerson {
  pub id:            Option<String>,
  pub name:          Option<String>,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub maiden_name:   Option<String>,
  pub nickname:      Option<String>,
  pub title:         Option<String>,
  pub gender:        Gender,
  pub birth_date:    Option<NaiveDate>,
  pub birth_place:   Option<String>,
  pub death_date:    Option<NaiveDate>,
  pub death_place:   Option<String>,
  pub deceased:      bool,
  pub bio:           Option<String>,
  pub occupation:    Option<String>,
  pub contact:       Option<String>,
  pub address:       Option<String>,
  pub notes:         Option<String>,
  pub is_public:     bool,
  pub display_order: i64,
  pub status:        RecordStatus,
  pub created_by:    Option<String>,
}

impl NewPerson {
  /// Convenience constructor: a public, active person with only a full name.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      is_public: true,
      ..Self::default()
    }
  }
}

// ─── PersonPatch ─────────────────────────────────────────────────────────────

/// Partial update for a person. Field *presence* (not truthiness) determines
/// whether it is applied: `Some("")` on a text field clears it, `None` leaves
/// it untouched. Dates use a nested option so `Some(None)` clears the date.
#[derive(Debug, Clone, Default)]
pub struct PersonPatch {
  pub name:          Option<String>,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub maiden_name:   Option<String>,
  pub nickname:      Option<String>,
  pub title:         Option<String>,
  pub gender:        Option<Gender>,
  pub birth_date:    Option<Option<NaiveDate>>,
  pub birth_place:   Option<String>,
  pub death_date:    Option<Option<NaiveDate>>,
  pub death_place:   Option<String>,
  pub deceased:      Option<bool>,
  pub bio:           Option<String>,
  pub occupation:    Option<String>,
  pub contact:       Option<String>,
  pub address:       Option<String>,
  pub notes:         Option<String>,
  pub is_public:     Option<bool>,
  pub display_order: Option<i64>,
  pub status:        Option<RecordStatus>,
  pub updated_by:    Option<String>,
}

/// Empty strings clear optional text fields when a patch is applied.
fn set_text(slot: &mut Option<String>, value: &Option<String>) {
  if let Some(v) = value {
    *slot = if v.is_empty() { None } else { Some(v.clone()) };
  }
}

impl PersonPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.first_name.is_none()
      && self.middle_name.is_none()
      && self.last_name.is_none()
      && self.maiden_name.is_none()
      && self.nickname.is_none()
      && self.title.is_none()
      && self.gender.is_none()
      && self.birth_date.is_none()
      && self.birth_place.is_none()
      && self.death_date.is_none()
      && self.death_place.is_none()
      && self.deceased.is_none()
      && self.bio.is_none()
      && self.occupation.is_none()
      && self.contact.is_none()
      && self.address.is_none()
      && self.notes.is_none()
      && self.is_public.is_none()
      && self.display_order.is_none()
      && self.status.is_none()
      && self.updated_by.is_none()
  }

  /// Apply every present field to `person`. `updated_at` is the store's job.
  pub fn apply_to(&self, person: &mut Person) {
    set_text(&mut person.name, &self.name);
    set_text(&mut person.first_name, &self.first_name);
    set_text(&mut person.middle_name, &self.middle_name);
    set_text(&mut person.last_name, &self.last_name);
    set_text(&mut person.maiden_name, &self.maiden_name);
    set_text(&mut person.nickname, &self.nickname);
    set_text(&mut person.title, &self.title);
    if let Some(g) = self.gender {
      person.gender = g;
    }
    if let Some(d) = self.birth_date {
      person.birth_date = d;
    }
    set_text(&mut person.birth_place, &self.birth_place);
    if let Some(d) = self.death_date {
      person.death_date = d;
    }
    set_text(&mut person.death_place, &self.death_place);
    if let Some(v) = self.deceased {
      person.deceased = v;
    }
    set_text(&mut person.bio, &self.bio);
    set_text(&mut person.occupation, &self.occupation);
    set_text(&mut person.contact, &self.contact);
    set_text(&mut person.address, &self.address);
    set_text(&mut person.notes, &self.notes);
    if let Some(v) = self.is_public {
      person.is_public = v;
    }
    if let Some(v) = self.display_order {
      person.display_order = v;
    }
    if let Some(s) = self.status {
      person.status = s;
    }
    if let Some(u) = &self.updated_by {
      person.updated_by = Some(u.clone());
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn person() -> Person {
    Person {
      id:            "p1".into(),
      name:          Some("Ada Lovelace".into()),
      first_name:    Some("Ada".into()),
      middle_name:   None,
      last_name:     Some("Lovelace".into()),
      maiden_name:   None,
      nickname:      None,
      title:         None,
      gender:        Gender::Female,
      birth_date:    NaiveDate::from_ymd_opt(1815, 12, 10),
      birth_place:   Some("London".into()),
      death_date:    None,
      death_place:   None,
      deceased:      true,
      bio:           None,
      occupation:    Some("Mathematician".into()),
      contact:       None,
      address:       None,
      notes:         None,
      is_public:     true,
      display_order: 0,
      status:        RecordStatus::Active,
      created_by:    None,
      updated_by:    None,
      created_at:    Utc::now(),
      updated_at:    Utc::now(),
    }
  }

  #[test]
  fn empty_patch_is_noop() {
    let mut p = person();
    let before = p.clone();
    let patch = PersonPatch::default();
    assert!(patch.is_empty());
    patch.apply_to(&mut p);
    assert_eq!(p.occupation, before.occupation);
    assert_eq!(p.name, before.name);
  }

  #[test]
  fn present_empty_string_clears_field() {
    let mut p = person();
    let patch = PersonPatch {
      occupation: Some(String::new()),
      ..Default::default()
    };
    assert!(!patch.is_empty());
    patch.apply_to(&mut p);
    assert_eq!(p.occupation, None);
    // Untouched fields survive.
    assert_eq!(p.birth_place.as_deref(), Some("London"));
  }

  #[test]
  fn nested_option_clears_date() {
    let mut p = person();
    let patch = PersonPatch {
      birth_date: Some(None),
      ..Default::default()
    };
    patch.apply_to(&mut p);
    assert_eq!(p.birth_date, None);
  }

  #[test]
  fn status_codes_round_trip_strum() {
    assert_eq!(RecordStatus::Active.as_ref(), "active");
    assert_eq!("archived".parse::<RecordStatus>().unwrap(), RecordStatus::Archived);
    assert!("bogus".parse::<RecordStatus>().is_err());
    assert_eq!(Gender::Unknown.as_ref(), "unknown");
    assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
  }
}
