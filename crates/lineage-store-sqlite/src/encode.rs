//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! closed code sets (status, gender, relationship kind) as their strum string
//! forms, and person-id lists as compact JSON arrays.

use chrono::{DateTime, NaiveDate, Utc};
use lineage_core::{
  family::Family,
  person::{Gender, Person, RecordStatus},
  relationship::{Relationship, RelationshipKind},
};

use crate::{Error, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Code sets ───────────────────────────────────────────────────────────────
// Encoding goes through strum's `AsRefStr`; decoding rejects unknown codes
// with the core error for the set.

pub fn decode_status(s: &str) -> Result<RecordStatus> {
  s.parse()
    .map_err(|_| lineage_core::Error::UnknownStatus(s.to_owned()).into())
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  s.parse()
    .map_err(|_| lineage_core::Error::UnknownGender(s.to_owned()).into())
}

pub fn decode_kind(s: &str) -> Result<RelationshipKind> {
  s.parse().map_err(|_| {
    lineage_core::Error::UnknownRelationshipKind(s.to_owned()).into()
  })
}

// ─── Id lists ────────────────────────────────────────────────────────────────

pub fn encode_ids(ids: &[String]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

pub fn decode_ids(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:     String,
  pub name:          Option<String>,
  pub first_name:    Option<String>,
  pub middle_name:   Option<String>,
  pub last_name:     Option<String>,
  pub maiden_name:   Option<String>,
  pub nickname:      Option<String>,
  pub title:         Option<String>,
  pub gender:        String,
  pub birth_date:    Option<String>,
  pub birth_place:   Option<String>,
  pub death_date:    Option<String>,
  pub death_place:   Option<String>,
  pub deceased:      bool,
  pub bio:           Option<String>,
  pub occupation:    Option<String>,
  pub contact:       Option<String>,
  pub address:       Option<String>,
  pub notes:         Option<String>,
  pub is_public:     bool,
  pub display_order: i64,
  pub status:        String,
  pub created_by:    Option<String>,
  pub updated_by:    Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:            self.person_id,
      name:          self.name,
      first_name:    self.first_name,
      middle_name:   self.middle_name,
      last_name:     self.last_name,
      maiden_name:   self.maiden_name,
      nickname:      self.nickname,
      title:         self.title,
      gender:        decode_gender(&self.gender)?,
      birth_date:    self.birth_date.as_deref().map(decode_date).transpose()?,
      birth_place:   self.birth_place,
      death_date:    self.death_date.as_deref().map(decode_date).transpose()?,
      death_place:   self.death_place,
      deceased:      self.deceased,
      bio:           self.bio,
      occupation:    self.occupation,
      contact:       self.contact,
      address:       self.address,
      notes:         self.notes,
      is_public:     self.is_public,
      display_order: self.display_order,
      status:        decode_status(&self.status)?,
      created_by:    self.created_by,
      updated_by:    self.updated_by,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `families` row.
pub struct RawFamily {
  pub family_id:  String,
  pub husband:    Option<String>,
  pub wife:       Option<String>,
  pub partners:   String,
  pub children:   String,
  pub status:     String,
  pub created_at: String,
}

impl RawFamily {
  pub fn into_family(self) -> Result<Family> {
    Ok(Family {
      id:         self.family_id,
      husband:    self.husband,
      wife:       self.wife,
      partners:   decode_ids(&self.partners)?,
      children:   decode_ids(&self.children)?,
      status:     decode_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `relationships` row.
pub struct RawRelationship {
  pub relationship_id:  String,
  pub person_a:         String,
  pub person_b:         String,
  pub kind:             String,
  pub is_bidirectional: bool,
  pub date:             Option<String>,
  pub place:            Option<String>,
  pub note:             Option<String>,
  pub status:           String,
  pub created_by:       Option<String>,
  pub created_at:       String,
}

impl RawRelationship {
  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      id:               self.relationship_id,
      person_a:         self.person_a,
      person_b:         self.person_b,
      kind:             decode_kind(&self.kind)?,
      is_bidirectional: self.is_bidirectional,
      date:             self.date.as_deref().map(decode_date).transpose()?,
      place:            self.place,
      note:             self.note,
      status:           decode_status(&self.status)?,
      created_by:       self.created_by,
      created_at:       decode_dt(&self.created_at)?,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_round_trip() {
    let d = NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
    assert_eq!(encode_date(d), "1815-12-10");
    assert_eq!(decode_date("1815-12-10").unwrap(), d);
    assert!(decode_date("10/12/1815").is_err());
  }

  #[test]
  fn unknown_kind_code_rejected() {
    assert!(decode_kind("parent").is_ok());
    assert!(decode_kind("aunt_uncle").is_ok());
    let err = decode_kind("second_cousin").unwrap_err();
    assert!(err.to_string().contains("second_cousin"));
  }

  #[test]
  fn id_lists_round_trip_json() {
    let ids = vec!["a".to_owned(), "b".to_owned()];
    let json = encode_ids(&ids).unwrap();
    assert_eq!(decode_ids(&json).unwrap(), ids);
    assert_eq!(decode_ids("[]").unwrap(), Vec::<String>::new());
  }
}
