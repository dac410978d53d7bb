//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::warn;
use uuid::Uuid;

use lineage_core::{
  family::{Family, NewFamily},
  person::{NewPerson, Person, PersonPatch, RecordStatus},
  relationship::{NewRelationship, Relationship},
  store::{PersonQuery, RecordStore, RelationshipQuery},
};

use crate::{
  Error, Result,
  encode::{
    RawFamily, RawPerson, RawRelationship, encode_date, encode_dt, encode_ids,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const PERSON_COLUMNS: &str = "person_id, name, first_name, middle_name, \
   last_name, maiden_name, nickname, title, gender, birth_date, birth_place, \
   death_date, death_place, deceased, bio, occupation, contact, address, \
   notes, is_public, display_order, status, created_by, updated_by, \
   created_at, updated_at";

const RELATIONSHIP_COLUMNS: &str = "relationship_id, person_a, person_b, \
   kind, is_bidirectional, date, place, note, status, created_by, created_at";

fn raw_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:     row.get(0)?,
    name:          row.get(1)?,
    first_name:    row.get(2)?,
    middle_name:   row.get(3)?,
    last_name:     row.get(4)?,
    maiden_name:   row.get(5)?,
    nickname:      row.get(6)?,
    title:         row.get(7)?,
    gender:        row.get(8)?,
    birth_date:    row.get(9)?,
    birth_place:   row.get(10)?,
    death_date:    row.get(11)?,
    death_place:   row.get(12)?,
    deceased:      row.get(13)?,
    bio:           row.get(14)?,
    occupation:    row.get(15)?,
    contact:       row.get(16)?,
    address:       row.get(17)?,
    notes:         row.get(18)?,
    is_public:     row.get(19)?,
    display_order: row.get(20)?,
    status:        row.get(21)?,
    created_by:    row.get(22)?,
    updated_by:    row.get(23)?,
    created_at:    row.get(24)?,
    updated_at:    row.get(25)?,
  })
}

fn raw_relationship(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRelationship> {
  Ok(RawRelationship {
    relationship_id:  row.get(0)?,
    person_a:         row.get(1)?,
    person_b:         row.get(2)?,
    kind:             row.get(3)?,
    is_bidirectional: row.get(4)?,
    date:             row.get(5)?,
    place:            row.get(6)?,
    note:             row.get(7)?,
    status:           row.get(8)?,
    created_by:       row.get(9)?,
    created_at:       row.get(10)?,
  })
}

fn mint_id() -> String { Uuid::new_v4().hyphenated().to_string() }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lineage record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn person_id_taken(&self, id: &str) -> Result<bool> {
    let id_str = id.to_owned();
    let taken = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM persons WHERE person_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(taken)
  }

  /// Insert a fully-built [`Person`] into the `persons` table.
  async fn insert_person(&self, person: &Person) -> Result<()> {
    let p = person.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO persons ({PERSON_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24,
                     ?25, ?26)"
          ),
          rusqlite::params![
            p.id,
            p.name,
            p.first_name,
            p.middle_name,
            p.last_name,
            p.maiden_name,
            p.nickname,
            p.title,
            p.gender.as_ref(),
            p.birth_date.map(encode_date),
            p.birth_place,
            p.death_date.map(encode_date),
            p.death_place,
            p.deceased,
            p.bio,
            p.occupation,
            p.contact,
            p.address,
            p.notes,
            p.is_public,
            p.display_order,
            p.status.as_ref(),
            p.created_by,
            p.updated_by,
            encode_dt(p.created_at),
            encode_dt(p.updated_at),
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Persons ────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    if let Some(id) = &input.id {
      if self.person_id_taken(id).await? {
        return Err(Error::IdTaken(id.clone()));
      }
    }

    let now = Utc::now();
    let person = Person {
      id:            input.id.unwrap_or_else(mint_id),
      name:          input.name,
      first_name:    input.first_name,
      middle_name:   input.middle_name,
      last_name:     input.last_name,
      maiden_name:   input.maiden_name,
      nickname:      input.nickname,
      title:         input.title,
      gender:        input.gender,
      birth_date:    input.birth_date,
      birth_place:   input.birth_place,
      death_date:    input.death_date,
      death_place:   input.death_place,
      deceased:      input.deceased,
      bio:           input.bio,
      occupation:    input.occupation,
      contact:       input.contact,
      address:       input.address,
      notes:         input.notes,
      is_public:     input.is_public,
      display_order: input.display_order,
      status:        input.status,
      created_by:    input.created_by,
      updated_by:    None,
      created_at:    now,
      updated_at:    now,
    };

    self.insert_person(&person).await?;
    Ok(person)
  }

  async fn get_person(&self, id: &str) -> Result<Option<Person>> {
    let id_str = id.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"
              ),
              rusqlite::params![id_str],
              raw_person,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn update_person(&self, id: &str, patch: PersonPatch) -> Result<Person> {
    let mut person = self
      .get_person(id)
      .await?
      .ok_or_else(|| lineage_core::Error::PersonNotFound(id.to_owned()))?;

    patch.apply_to(&mut person);
    person.updated_at = Utc::now();

    let p = person.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE persons SET
             name = ?2, first_name = ?3, middle_name = ?4, last_name = ?5,
             maiden_name = ?6, nickname = ?7, title = ?8, gender = ?9,
             birth_date = ?10, birth_place = ?11, death_date = ?12,
             death_place = ?13, deceased = ?14, bio = ?15, occupation = ?16,
             contact = ?17, address = ?18, notes = ?19, is_public = ?20,
             display_order = ?21, status = ?22, updated_by = ?23,
             updated_at = ?24
           WHERE person_id = ?1",
          rusqlite::params![
            p.id,
            p.name,
            p.first_name,
            p.middle_name,
            p.last_name,
            p.maiden_name,
            p.nickname,
            p.title,
            p.gender.as_ref(),
            p.birth_date.map(encode_date),
            p.birth_place,
            p.death_date.map(encode_date),
            p.death_place,
            p.deceased,
            p.bio,
            p.occupation,
            p.contact,
            p.address,
            p.notes,
            p.is_public,
            p.display_order,
            p.status.as_ref(),
            p.updated_by,
            encode_dt(p.updated_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn delete_person(&self, id: &str) -> Result<()> {
    let id_str = id.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(lineage_core::Error::PersonNotFound(id.to_owned()).into());
    }
    Ok(())
  }

  async fn list_persons(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    let status_str = query.status.map(|s| s.as_ref().to_owned());
    let public_only = query.public_only;
    let text_pattern = query.text.as_deref().map(|t| format!("%{t}%"));
    let limit_val = query.limit.map(|n| n as i64).unwrap_or(-1);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE (?1 IS NULL OR status = ?1)
             AND (?2 = 0 OR is_public = 1)
             AND (?3 IS NULL
                  OR name LIKE ?3 OR first_name LIKE ?3 OR last_name LIKE ?3
                  OR maiden_name LIKE ?3 OR nickname LIKE ?3)
           ORDER BY display_order, person_id
           LIMIT ?4 OFFSET ?5"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![
              status_str,
              public_only,
              text_pattern,
              limit_val,
              offset_val,
            ],
            raw_person,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Families ───────────────────────────────────────────────────────────

  async fn create_family(&self, input: NewFamily) -> Result<Family> {
    let family = Family {
      id:         mint_id(),
      husband:    input.husband,
      wife:       input.wife,
      partners:   input.partners,
      children:   input.children,
      status:     input.status,
      created_at: Utc::now(),
    };

    let f = family.clone();
    let partners_json = encode_ids(&f.partners)?;
    let children_json = encode_ids(&f.children)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO families
             (family_id, husband, wife, partners, children, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            f.id,
            f.husband,
            f.wife,
            partners_json,
            children_json,
            f.status.as_ref(),
            encode_dt(f.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(family)
  }

  async fn list_families(
    &self,
    status: Option<RecordStatus>,
  ) -> Result<Vec<Family>> {
    let status_str = status.map(|s| s.as_ref().to_owned());

    let raws: Vec<RawFamily> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT family_id, husband, wife, partners, children, status,
                  created_at
           FROM families
           WHERE (?1 IS NULL OR status = ?1)
           ORDER BY created_at, family_id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![status_str], |row| {
            Ok(RawFamily {
              family_id:  row.get(0)?,
              husband:    row.get(1)?,
              wife:       row.get(2)?,
              partners:   row.get(3)?,
              children:   row.get(4)?,
              status:     row.get(5)?,
              created_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFamily::into_family).collect()
  }

  // ── Relationships ──────────────────────────────────────────────────────

  async fn create_relationship(
    &self,
    input: NewRelationship,
  ) -> Result<Relationship> {
    let relationship = Relationship {
      id:               mint_id(),
      person_a:         input.person_a,
      person_b:         input.person_b,
      kind:             input.kind,
      is_bidirectional: input.is_bidirectional,
      date:             input.date,
      place:            input.place,
      note:             input.note,
      status:           input.status,
      created_by:       input.created_by,
      created_at:       Utc::now(),
    };

    let r = relationship.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO relationships ({RELATIONSHIP_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
          ),
          rusqlite::params![
            r.id,
            r.person_a,
            r.person_b,
            r.kind.as_ref(),
            r.is_bidirectional,
            r.date.map(encode_date),
            r.place,
            r.note,
            r.status.as_ref(),
            r.created_by,
            encode_dt(r.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(relationship)
  }

  async fn delete_relationship(&self, id: &str) -> Result<()> {
    let id_str = id.to_owned();
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM relationships WHERE relationship_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(
        lineage_core::Error::RelationshipNotFound(id.to_owned()).into(),
      );
    }
    Ok(())
  }

  async fn list_relationships(
    &self,
    query: &RelationshipQuery,
  ) -> Result<Vec<Relationship>> {
    let person_str = query.person.clone();
    let kind_str = query.kind.map(|k| k.as_ref().to_owned());
    let status_str = query.status.map(|s| s.as_ref().to_owned());

    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
           WHERE (?1 IS NULL OR person_a = ?1 OR person_b = ?1)
             AND (?2 IS NULL OR kind = ?2)
             AND (?3 IS NULL OR status = ?3)
           ORDER BY created_at, relationship_id"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![person_str, kind_str, status_str],
            raw_relationship,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    // Rows with codes outside the known sets are skipped, not fatal: one
    // bad legacy row must not hide the rest of the graph.
    let mut out = Vec::with_capacity(raws.len());
    for raw in raws {
      match raw.into_relationship() {
        Ok(rel) => out.push(rel),
        Err(e) => warn!("skipping undecodable relationship row: {e}"),
      }
    }
    Ok(out)
  }
}
