//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use lineage_core::{
  family::NewFamily,
  person::{Gender, NewPerson, PersonPatch, RecordStatus},
  relationship::{NewRelationship, RelationshipKind},
  store::{PersonQuery, RecordStore, RelationshipQuery},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;

  let mut input = NewPerson::named("Ada Lovelace");
  input.gender = Gender::Female;
  input.birth_date = NaiveDate::from_ymd_opt(1815, 12, 10);
  input.occupation = Some("Mathematician".into());

  let created = s.create_person(input).await.unwrap();
  assert!(!created.id.is_empty());
  assert_eq!(created.status, RecordStatus::Active);

  let fetched = s.get_person(&created.id).await.unwrap().unwrap();
  assert_eq!(fetched.name.as_deref(), Some("Ada Lovelace"));
  assert_eq!(fetched.gender, Gender::Female);
  assert_eq!(fetched.birth_date, NaiveDate::from_ymd_opt(1815, 12, 10));
  assert_eq!(fetched.occupation.as_deref(), Some("Mathematician"));
}

#[tokio::test]
async fn caller_supplied_id_used_verbatim() {
  let s = store().await;

  let mut input = NewPerson::named("Ada");
  input.id = Some("node-42".into());
  let created = s.create_person(input).await.unwrap();
  assert_eq!(created.id, "node-42");

  let mut dup = NewPerson::named("Impostor");
  dup.id = Some("node-42".into());
  let err = s.create_person(dup).await.unwrap_err();
  assert!(matches!(err, Error::IdTaken(id) if id == "node-42"));
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn update_person_applies_patch_semantics() {
  let s = store().await;

  let mut input = NewPerson::named("Ada Lovelace");
  input.occupation = Some("Countess".into());
  input.birth_date = NaiveDate::from_ymd_opt(1815, 12, 10);
  input.birth_place = Some("London".into());
  let created = s.create_person(input).await.unwrap();

  let patch = PersonPatch {
    occupation: Some(String::new()), // present-but-empty clears
    birth_date: Some(None),          // nested option clears the date
    notes: Some("First programmer".into()),
    updated_by: Some("editor".into()),
    ..Default::default()
  };
  let updated = s.update_person(&created.id, patch).await.unwrap();

  assert_eq!(updated.occupation, None);
  assert_eq!(updated.birth_date, None);
  assert_eq!(updated.notes.as_deref(), Some("First programmer"));
  assert_eq!(updated.updated_by.as_deref(), Some("editor"));
  // Untouched fields survive, and the change is durable.
  let fetched = s.get_person(&created.id).await.unwrap().unwrap();
  assert_eq!(fetched.birth_place.as_deref(), Some("London"));
  assert_eq!(fetched.occupation, None);
  assert!(fetched.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_missing_person_errors() {
  let s = store().await;
  let err = s
    .update_person("ghost", PersonPatch::default())
    .await
    .unwrap_err();
  assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn delete_person_and_missing_delete_errors() {
  let s = store().await;
  let created = s.create_person(NewPerson::named("Brief")).await.unwrap();

  s.delete_person(&created.id).await.unwrap();
  assert!(s.get_person(&created.id).await.unwrap().is_none());
  assert!(s.delete_person(&created.id).await.is_err());
}

#[tokio::test]
async fn list_persons_filters() {
  let s = store().await;

  s.create_person(NewPerson::named("Ada Lovelace"))
    .await
    .unwrap();
  let mut private = NewPerson::named("Hidden Person");
  private.is_public = false;
  s.create_person(private).await.unwrap();
  let mut archived = NewPerson::named("Old Record");
  archived.status = RecordStatus::Archived;
  s.create_person(archived).await.unwrap();

  let all = s.list_persons(&PersonQuery::default()).await.unwrap();
  assert_eq!(all.len(), 3);

  let active = s
    .list_persons(&PersonQuery {
      status: Some(RecordStatus::Active),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(active.len(), 2);

  let public = s
    .list_persons(&PersonQuery { public_only: true, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(public.len(), 2);

  let by_text = s
    .list_persons(&PersonQuery {
      text: Some("lovelace".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_text.len(), 1);
  assert_eq!(by_text[0].name.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn list_persons_paginates() {
  let s = store().await;
  for i in 0..5i64 {
    let mut input = NewPerson::named(format!("Person {i}"));
    input.display_order = i;
    s.create_person(input).await.unwrap();
  }

  let page = s
    .list_persons(&PersonQuery {
      limit: Some(2),
      offset: Some(2),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert_eq!(page[0].name.as_deref(), Some("Person 2"));
  assert_eq!(page[1].name.as_deref(), Some("Person 3"));
}

// ─── Families ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_families() {
  let s = store().await;

  let family = s
    .create_family(NewFamily {
      husband: Some("h1".into()),
      wife: Some("w1".into()),
      partners: vec!["x1".into()],
      children: vec!["c1".into(), "c2".into()],
      ..Default::default()
    })
    .await
    .unwrap();
  s.create_family(NewFamily {
    status: RecordStatus::Archived,
    ..Default::default()
  })
  .await
  .unwrap();

  let all = s.list_families(None).await.unwrap();
  assert_eq!(all.len(), 2);

  let active = s.list_families(Some(RecordStatus::Active)).await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].id, family.id);
  // JSON-encoded id lists round-trip.
  assert_eq!(active[0].partner_ids(), vec!["h1", "w1", "x1"]);
  assert_eq!(active[0].children, vec!["c1", "c2"]);
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_relationships() {
  let s = store().await;

  for (a, b, kind) in [
    ("p1", "c1", RelationshipKind::Parent),
    ("p1", "p2", RelationshipKind::Spouse),
    ("c1", "c2", RelationshipKind::Sibling),
  ] {
    s.create_relationship(NewRelationship::edge(a, b, kind))
      .await
      .unwrap();
  }

  let all = s
    .list_relationships(&RelationshipQuery::default())
    .await
    .unwrap();
  assert_eq!(all.len(), 3);

  // Person filter matches either endpoint.
  let touching_c1 = s
    .list_relationships(&RelationshipQuery {
      person: Some("c1".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(touching_c1.len(), 2);

  let spousal = s
    .list_relationships(&RelationshipQuery {
      kind: Some(RelationshipKind::Spouse),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(spousal.len(), 1);
  assert!(spousal[0].is_bidirectional);
}

#[tokio::test]
async fn relationship_status_filter_and_delete() {
  let s = store().await;

  let kept = s
    .create_relationship(NewRelationship::edge(
      "a",
      "b",
      RelationshipKind::Parent,
    ))
    .await
    .unwrap();
  let mut inactive = NewRelationship::edge("a", "c", RelationshipKind::Parent);
  inactive.status = RecordStatus::Inactive;
  s.create_relationship(inactive).await.unwrap();

  let active = s
    .list_relationships(&RelationshipQuery {
      status: Some(RecordStatus::Active),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].id, kept.id);

  s.delete_relationship(&kept.id).await.unwrap();
  assert!(s.delete_relationship(&kept.id).await.is_err());
}

#[tokio::test]
async fn relationship_metadata_round_trips() {
  let s = store().await;

  let mut input = NewRelationship::edge("a", "b", RelationshipKind::Married);
  input.date = NaiveDate::from_ymd_opt(1950, 6, 1);
  input.place = Some("Dublin".into());
  input.note = Some("second marriage".into());
  input.created_by = Some("importer".into());
  s.create_relationship(input).await.unwrap();

  let all = s
    .list_relationships(&RelationshipQuery::default())
    .await
    .unwrap();
  assert_eq!(all.len(), 1);
  let rel = &all[0];
  assert_eq!(rel.kind, RelationshipKind::Married);
  assert!(rel.kind.is_spousal());
  assert_eq!(rel.date, NaiveDate::from_ymd_opt(1950, 6, 1));
  assert_eq!(rel.place.as_deref(), Some("Dublin"));
  assert_eq!(rel.created_by.as_deref(), Some("importer"));
}
