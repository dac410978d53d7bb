//! Reconciliation writer: persists a snapshot change set through a
//! [`RecordStore`].
//!
//! Every store call is an independent best-effort operation. Failures are
//! tallied, never propagated; callers inspect [`ReconcileOutcome::errors`]
//! and treat a non-zero value as partial success. There is no rollback and
//! no resumability — a crashed pass leaves storage consistent but partially
//! applied, and the next load + diff picks up the remainder.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use lineage_core::{
  person::{Gender, NewPerson, PersonPatch, RecordStatus},
  relationship::{NewRelationship, RelationshipKind},
  store::{PersonQuery, RecordStore, RelationshipQuery},
};
use tracing::{debug, warn};

use crate::{
  diff::SnapshotDiff,
  project::{DATE_FORMAT, ProjectedPerson, derive_full_name},
  snapshot::{
    TreeNode, collapse_real_nodes, is_placeholder_name, normalize_name,
  },
};

// ─── Context & outcome ───────────────────────────────────────────────────────

/// Caller-supplied context for a reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileContext {
  /// Recorded as `created_by` / `updated_by` on touched records.
  pub user_id: Option<String>,
}

/// The tally of one pass. Not a success/failure boolean: a non-zero
/// `errors` with a non-zero `saved` is partial success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
  pub saved:  usize,
  pub errors: usize,
}

// ─── Edge keys ───────────────────────────────────────────────────────────────

/// De-duplication key for a pending or existing edge. Parent edges always
/// use `(parent, child)` order regardless of which side was traversed;
/// spouse endpoints are sorted so both orders collide. `married` records
/// produce the same keys as `spouse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EdgeKey {
  Parent(String, String),
  Spouse(String, String),
}

impl EdgeKey {
  fn parent(parent: &str, child: &str) -> Self {
    Self::Parent(parent.to_owned(), child.to_owned())
  }

  fn spouse(a: &str, b: &str) -> Self {
    if a <= b {
      Self::Spouse(a.to_owned(), b.to_owned())
    } else {
      Self::Spouse(b.to_owned(), a.to_owned())
    }
  }
}

// ─── Snapshot → record conversions ───────────────────────────────────────────

fn opt_text(s: &str) -> Option<String> {
  if s.is_empty() { None } else { Some(s.to_owned()) }
}

/// Inverse of the projection's gender coercion, as far as one exists:
/// only `"M"` and `"F"` come back from the widget.
fn parse_gender(code: &str) -> Gender {
  match code {
    "M" => Gender::Male,
    "F" => Gender::Female,
    _ => Gender::Unknown,
  }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Build the creation input for a node discovered in an edited snapshot.
/// The snapshot node id is kept so queued edges referencing it stay valid.
fn new_person_from_node(node: &TreeNode, user: Option<&str>) -> NewPerson {
  NewPerson {
    id:          Some(node.id.clone()),
    name:        opt_text(&node.data.name),
    first_name:  opt_text(&node.data.first_name),
    last_name:   opt_text(&node.data.last_name),
    maiden_name: opt_text(&node.data.maiden_name),
    nickname:    opt_text(&node.data.nickname),
    gender:      parse_gender(&node.data.gender),
    birth_date:  parse_date(&node.data.birth_date),
    birth_place: opt_text(&node.data.birth_place),
    death_date:  parse_date(&node.data.death_date),
    death_place: opt_text(&node.data.death_place),
    deceased:    node.data.deceased,
    occupation:  opt_text(&node.data.occupation),
    bio:         opt_text(&node.data.bio),
    contact:     opt_text(&node.data.contact),
    address:     opt_text(&node.data.address),
    notes:       opt_text(&node.data.notes),
    is_public:   true,
    created_by:  user.map(str::to_owned),
    ..NewPerson::default()
  }
}

/// Field-level patch between the edited and original data. Only differing
/// fields are present — a field that differs is applied even when its new
/// value is empty (that clears it); a field that is merely absent from the
/// edit never blanks anything.
fn patch_between(
  current: &ProjectedPerson,
  original: &ProjectedPerson,
  user: Option<&str>,
) -> PersonPatch {
  let mut patch = PersonPatch::default();
  let changed =
    |a: &String, b: &String| if a != b { Some(a.clone()) } else { None };

  patch.name = changed(&current.name, &original.name);
  patch.first_name = changed(&current.first_name, &original.first_name);
  patch.last_name = changed(&current.last_name, &original.last_name);
  patch.maiden_name = changed(&current.maiden_name, &original.maiden_name);
  patch.nickname = changed(&current.nickname, &original.nickname);
  if current.gender != original.gender {
    patch.gender = Some(parse_gender(&current.gender));
  }
  if current.birth_date != original.birth_date {
    patch.birth_date = Some(parse_date(&current.birth_date));
  }
  patch.birth_place = changed(&current.birth_place, &original.birth_place);
  if current.death_date != original.death_date {
    patch.death_date = Some(parse_date(&current.death_date));
  }
  patch.death_place = changed(&current.death_place, &original.death_place);
  if current.deceased != original.deceased {
    patch.deceased = Some(current.deceased);
  }
  patch.occupation = changed(&current.occupation, &original.occupation);
  patch.bio = changed(&current.bio, &original.bio);
  patch.contact = changed(&current.contact, &original.contact);
  patch.address = changed(&current.address, &original.address);
  patch.notes = changed(&current.notes, &original.notes);

  if !patch.is_empty() {
    patch.updated_by = user.map(str::to_owned);
  }
  patch
}

fn queue_edge(
  existing: &HashSet<EdgeKey>,
  pending_keys: &mut HashSet<EdgeKey>,
  pending: &mut Vec<NewRelationship>,
  key: EdgeKey,
  edge: NewRelationship,
) {
  if existing.contains(&key) || pending_keys.contains(&key) {
    return;
  }
  pending_keys.insert(key);
  pending.push(edge);
}

// ─── Reconciliation ──────────────────────────────────────────────────────────

/// Apply `diff` to the store: create new persons, patch updated ones,
/// cascade-delete removed ones, then extract and persist new relationship
/// edges (including inferred spouse edges) from the filtered current
/// snapshot.
pub async fn reconcile<S: RecordStore>(
  store: &S,
  diff: &SnapshotDiff,
  current: &[TreeNode],
  original: &[TreeNode],
  ctx: &ReconcileContext,
) -> ReconcileOutcome {
  let mut outcome = ReconcileOutcome::default();
  let user = ctx.user_id.as_deref();

  let original_by_id: HashMap<&str, &TreeNode> =
    original.iter().map(|n| (n.id.as_str(), n)).collect();

  // Case-insensitive name set of existing active persons, guarding against
  // the widget re-adding a node the user intended to merge.
  let mut known_names: HashSet<String> = HashSet::new();
  let active_only = PersonQuery {
    status: Some(RecordStatus::Active),
    ..Default::default()
  };
  match store.list_persons(&active_only).await {
    Ok(persons) => {
      known_names = persons
        .iter()
        .map(|p| normalize_name(&derive_full_name(p)))
        .collect();
    }
    Err(e) => {
      warn!("listing existing persons failed: {e}");
      outcome.errors += 1;
    }
  }

  // ── New persons ───────────────────────────────────────────────────────
  for node in &diff.new_nodes {
    if is_placeholder_name(&node.data.name) {
      continue;
    }
    let key = normalize_name(&node.data.name);
    if known_names.contains(&key) {
      debug!(name = %node.data.name, "skipping creation, name already exists");
      continue;
    }
    match store.create_person(new_person_from_node(node, user)).await {
      Ok(_) => {
        outcome.saved += 1;
        known_names.insert(key);
      }
      Err(e) => {
        warn!("creating person {} failed: {e}", node.id);
        outcome.errors += 1;
      }
    }
  }

  // ── Updated persons ───────────────────────────────────────────────────
  for node in &diff.updated_nodes {
    let Some(orig) = original_by_id.get(node.id.as_str()) else {
      continue;
    };
    let patch = patch_between(&node.data, &orig.data, user);
    if patch.is_empty() {
      continue;
    }
    match store.update_person(&node.id, patch).await {
      Ok(_) => outcome.saved += 1,
      Err(e) => {
        warn!("updating person {} failed: {e}", node.id);
        outcome.errors += 1;
      }
    }
  }

  // ── Deletions, cascading to relationship edges ────────────────────────
  for id in &diff.deleted_ids {
    let touching = RelationshipQuery {
      person: Some(id.clone()),
      status: Some(RecordStatus::Active),
      ..Default::default()
    };
    match store.list_relationships(&touching).await {
      Ok(rels) => {
        for rel in rels {
          match store.delete_relationship(&rel.id).await {
            Ok(()) => outcome.saved += 1,
            Err(e) => {
              warn!("deleting relationship {} failed: {e}", rel.id);
              outcome.errors += 1;
            }
          }
        }
      }
      Err(e) => {
        warn!("listing relationships for {id} failed: {e}");
        outcome.errors += 1;
      }
    }
    match store.delete_person(id).await {
      Ok(()) => outcome.saved += 1,
      Err(e) => {
        warn!("deleting person {id} failed: {e}");
        outcome.errors += 1;
      }
    }
  }

  // ── New relationship edges ────────────────────────────────────────────
  // Operates over the filtered, de-duplicated current snapshot only.
  let real = collapse_real_nodes(current);
  let real_ids: HashSet<&str> = real.iter().map(|n| n.id.as_str()).collect();

  // Existing-edge index covering every direction/type permutation:
  // child-direction records index under the same (parent, child) key, and
  // married records under the same sorted spouse key.
  let mut existing: HashSet<EdgeKey> = HashSet::new();
  let all_active = RelationshipQuery {
    status: Some(RecordStatus::Active),
    ..Default::default()
  };
  match store.list_relationships(&all_active).await {
    Ok(rels) => {
      for rel in &rels {
        if rel.kind.is_parent_like() {
          existing.insert(EdgeKey::parent(&rel.person_a, &rel.person_b));
        } else if rel.kind.is_child_like() {
          existing.insert(EdgeKey::parent(&rel.person_b, &rel.person_a));
        } else if rel.kind.is_spousal() {
          existing.insert(EdgeKey::spouse(&rel.person_a, &rel.person_b));
        }
      }
    }
    Err(e) => {
      warn!("listing existing relationships failed: {e}");
      outcome.errors += 1;
    }
  }

  let mut pending_keys: HashSet<EdgeKey> = HashSet::new();
  let mut pending: Vec<NewRelationship> = Vec::new();

  for node in &real {
    let orig = original_by_id.get(node.id.as_str());
    let orig_parents: &[String] =
      orig.map(|n| n.rels.parents.as_slice()).unwrap_or(&[]);
    let orig_children: &[String] =
      orig.map(|n| n.rels.children.as_slice()).unwrap_or(&[]);

    for parent in &node.rels.parents {
      if !real_ids.contains(parent.as_str())
        || orig_parents.iter().any(|p| p == parent)
      {
        continue;
      }
      let mut edge =
        NewRelationship::edge(parent, &node.id, RelationshipKind::Parent);
      edge.created_by = user.map(str::to_owned);
      queue_edge(
        &existing,
        &mut pending_keys,
        &mut pending,
        EdgeKey::parent(parent, &node.id),
        edge,
      );
    }

    for child in &node.rels.children {
      if !real_ids.contains(child.as_str())
        || orig_children.iter().any(|c| c == child)
      {
        continue;
      }
      let mut edge =
        NewRelationship::edge(&node.id, child, RelationshipKind::Parent);
      edge.created_by = user.map(str::to_owned);
      queue_edge(
        &existing,
        &mut pending_keys,
        &mut pending,
        EdgeKey::parent(&node.id, child),
        edge,
      );
    }
  }

  // ── Spouse inference ──────────────────────────────────────────────────
  // Two real persons jointly recorded as parents of the same child are
  // proposed as spouses unless some edge (existing, pending, or in the
  // original snapshot) already links them.
  for node in &real {
    let parents: Vec<&str> = node
      .rels
      .parents
      .iter()
      .filter(|p| real_ids.contains(p.as_str()))
      .map(String::as_str)
      .collect();
    if parents.len() < 2 {
      continue;
    }
    for (i, a) in parents.iter().enumerate() {
      for b in parents.iter().skip(i + 1) {
        let key = EdgeKey::spouse(a, b);
        if existing.contains(&key) || pending_keys.contains(&key) {
          continue;
        }
        let originally_spouses = original_by_id
          .get(*a)
          .is_some_and(|n| n.rels.spouses.iter().any(|s| s == b))
          || original_by_id
            .get(*b)
            .is_some_and(|n| n.rels.spouses.iter().any(|s| s == a));
        if originally_spouses {
          continue;
        }
        debug!(parent_a = %a, parent_b = %b, child = %node.id, "inferring spouse edge");
        let mut edge = NewRelationship::edge(*a, *b, RelationshipKind::Spouse);
        edge.created_by = user.map(str::to_owned);
        pending_keys.insert(key);
        pending.push(edge);
      }
    }
  }

  // ── Flush pending edges ───────────────────────────────────────────────
  for edge in pending {
    match store.create_relationship(edge).await {
      Ok(_) => outcome.saved += 1,
      Err(e) => {
        warn!("creating relationship failed: {e}");
        outcome.errors += 1;
      }
    }
  }

  outcome
}

// ─── Tests ───────────────────────────────────────────────────────────────────
