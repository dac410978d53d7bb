//! Adjacency index: per-person relationship buckets derived from records.
//!
//! Built fresh on every load as a pure function over immutable inputs — no
//! shared builder state. Relationships are the authoritative source;
//! families only supplement what relationships did not already capture.

use std::collections::BTreeMap;

use lineage_core::{
  family::Family,
  person::Person,
  relationship::{Relationship, RelationshipKind},
};
use tracing::warn;

// ─── Entry ───────────────────────────────────────────────────────────────────

/// One person's derived relationship buckets. Each list is de-duplicated and
/// keeps first-seen order. Only `parents`, `spouses`, and `children` are
/// exported to the visualization; the rest exist for completeness and
/// validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyEntry {
  pub parents:        Vec<String>,
  pub spouses:        Vec<String>,
  pub children:       Vec<String>,
  pub siblings:       Vec<String>,
  pub grandparents:   Vec<String>,
  pub grandchildren:  Vec<String>,
  pub aunts_uncles:   Vec<String>,
  pub nieces_nephews: Vec<String>,
  pub cousins:        Vec<String>,
  pub in_laws:        Vec<String>,
}

/// The derived, in-memory index: person id → adjacency entry.
pub type AdjacencyIndex = BTreeMap<String, AdjacencyEntry>;

/// The ten canonical buckets an edge can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
  Parents,
  Spouses,
  Children,
  Siblings,
  Grandparents,
  Grandchildren,
  AuntsUncles,
  NiecesNephews,
  Cousins,
  InLaws,
}

impl AdjacencyEntry {
  pub fn bucket(&self, bucket: Bucket) -> &Vec<String> {
    match bucket {
      Bucket::Parents => &self.parents,
      Bucket::Spouses => &self.spouses,
      Bucket::Children => &self.children,
      Bucket::Siblings => &self.siblings,
      Bucket::Grandparents => &self.grandparents,
      Bucket::Grandchildren => &self.grandchildren,
      Bucket::AuntsUncles => &self.aunts_uncles,
      Bucket::NiecesNephews => &self.nieces_nephews,
      Bucket::Cousins => &self.cousins,
      Bucket::InLaws => &self.in_laws,
    }
  }

  fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<String> {
    match bucket {
      Bucket::Parents => &mut self.parents,
      Bucket::Spouses => &mut self.spouses,
      Bucket::Children => &mut self.children,
      Bucket::Siblings => &mut self.siblings,
      Bucket::Grandparents => &mut self.grandparents,
      Bucket::Grandchildren => &mut self.grandchildren,
      Bucket::AuntsUncles => &mut self.aunts_uncles,
      Bucket::NiecesNephews => &mut self.nieces_nephews,
      Bucket::Cousins => &mut self.cousins,
      Bucket::InLaws => &mut self.in_laws,
    }
  }
}

/// Idempotent insertion: re-applying the same edge never duplicates an id.
/// Unknown persons are ignored — the caller pre-keys the index.
fn push_unique(index: &mut AdjacencyIndex, person: &str, bucket: Bucket, other: &str) {
  let Some(entry) = index.get_mut(person) else {
    return;
  };
  let list = entry.bucket_mut(bucket);
  if !list.iter().any(|id| id == other) {
    list.push(other.to_owned());
  }
}

// ─── Relationship type resolver ──────────────────────────────────────────────

/// Write the adjacency mutations for one edge: "`a` is `kind` of `b`".
///
/// `bidirectional` only matters for the symmetric single-bucket kinds
/// (spouse, sibling, cousin, in-law, god-relations); the directional pairs
/// always write both sides of their fixed mapping.
pub fn classify(
  index: &mut AdjacencyIndex,
  a: &str,
  b: &str,
  kind: RelationshipKind,
  bidirectional: bool,
) {
  use RelationshipKind as K;
  match kind {
    // Parent-equivalents: guardian/adoptive/step/foster behave identically.
    K::Parent
    | K::Guardian
    | K::AdoptiveParent
    | K::StepParent
    | K::FosterParent => {
      push_unique(index, b, Bucket::Parents, a);
      push_unique(index, a, Bucket::Children, b);
    }
    K::Child | K::Ward | K::AdoptedChild | K::StepChild | K::FosterChild => {
      push_unique(index, a, Bucket::Parents, b);
      push_unique(index, b, Bucket::Children, a);
    }
    K::Spouse | K::Married => {
      push_unique(index, a, Bucket::Spouses, b);
      if bidirectional {
        push_unique(index, b, Bucket::Spouses, a);
      }
    }
    K::Sibling => {
      push_unique(index, a, Bucket::Siblings, b);
      if bidirectional {
        push_unique(index, b, Bucket::Siblings, a);
      }
    }
    K::Grandparent => {
      push_unique(index, b, Bucket::Grandparents, a);
      push_unique(index, a, Bucket::Grandchildren, b);
    }
    K::Grandchild => {
      push_unique(index, a, Bucket::Grandparents, b);
      push_unique(index, b, Bucket::Grandchildren, a);
    }
    K::AuntUncle => {
      push_unique(index, b, Bucket::AuntsUncles, a);
      push_unique(index, a, Bucket::NiecesNephews, b);
    }
    K::NieceNephew => {
      push_unique(index, a, Bucket::AuntsUncles, b);
      push_unique(index, b, Bucket::NiecesNephews, a);
    }
    K::Cousin => {
      push_unique(index, a, Bucket::Cousins, b);
      if bidirectional {
        push_unique(index, b, Bucket::Cousins, a);
      }
    }
    // Godparent/godchild fold into the extended-family catch-all bucket,
    // matching the behaviour of existing exported datasets.
    K::InLaw | K::Godparent | K::Godchild => {
      push_unique(index, a, Bucket::InLaws, b);
      if bidirectional {
        push_unique(index, b, Bucket::InLaws, a);
      }
    }
  }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Result of [`build_index`]: the index plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct IndexBuild {
  pub index:    AdjacencyIndex,
  pub warnings: Vec<String>,
}

/// Build one adjacency entry per person.
///
/// Phase 1 processes every active relationship (authoritative). Phase 2
/// supplements from active legacy families without overwriting or
/// duplicating anything phase 1 produced. Dangling references are logged
/// and skipped — never fatal.
pub fn build_index(
  persons: &[Person],
  families: &[Family],
  relationships: &[Relationship],
) -> IndexBuild {
  let mut index: AdjacencyIndex = persons
    .iter()
    .map(|p| (p.id.clone(), AdjacencyEntry::default()))
    .collect();
  let mut warnings = Vec::new();

  // Phase 1: explicit relationship records.
  for rel in relationships.iter().filter(|r| r.status.is_active()) {
    let known_a = index.contains_key(&rel.person_a);
    let known_b = index.contains_key(&rel.person_b);
    if !known_a || !known_b {
      let missing = if known_a { &rel.person_b } else { &rel.person_a };
      let msg = format!(
        "relationship {} references unknown person {}",
        rel.id, missing
      );
      warn!("{msg}");
      warnings.push(msg);
      continue;
    }
    classify(
      &mut index,
      &rel.person_a,
      &rel.person_b,
      rel.kind,
      rel.is_bidirectional,
    );
  }

  // Phase 2: legacy family groupings. Missing person ids are skipped
  // silently — families carry no referential guarantees.
  for family in families.iter().filter(|f| f.status.is_active()) {
    let partners: Vec<String> = family
      .partner_ids()
      .into_iter()
      .filter(|id| index.contains_key(id))
      .collect();

    for (i, a) in partners.iter().enumerate() {
      for b in partners.iter().skip(i + 1) {
        let a_has_b = index[a].spouses.iter().any(|s| s == b);
        let b_has_a = index[b].spouses.iter().any(|s| s == a);
        if !a_has_b && !b_has_a {
          push_unique(&mut index, a, Bucket::Spouses, b);
          push_unique(&mut index, b, Bucket::Spouses, a);
        }
      }
    }

    let children: Vec<&String> = family
      .children
      .iter()
      .filter(|id| index.contains_key(*id))
      .collect();
    for child in children {
      for partner in &partners {
        let already = index[child].parents.iter().any(|p| p == partner);
        if !already {
          push_unique(&mut index, child, Bucket::Parents, partner);
          push_unique(&mut index, partner, Bucket::Children, child);
        }
      }
    }
  }

  IndexBuild { index, warnings }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use lineage_core::person::{Gender, RecordStatus};

  use super::*;

  fn person(id: &str) -> Person {
    Person {
      id:            id.into(),
      name:          Some(id.to_uppercase()),
      first_name:    None,
      middle_name:   None,
      last_name:     None,
      maiden_name:   None,
      nickname:      None,
      title:         None,
      gender:        Gender::Unknown,
      birth_date:    None,
      birth_place:   None,
      death_date:    None,
      death_place:   None,
      deceased:      false,
      bio:           None,
      occupation:    None,
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

  fn rel(id: &str, a: &str, b: &str, kind: RelationshipKind, bi: bool) -> Relationship {
    Relationship {
      id:               id.into(),
      person_a:         a.into(),
      person_b:         b.into(),
      kind,
      is_bidirectional: bi,
      date:             None,
      place:            None,
      note:             None,
      status:           RecordStatus::Active,
      created_by:       None,
      created_at:       Utc::now(),
    }
  }

  fn family(id: &str, partners: &[&str], children: &[&str]) -> Family {
    Family {
      id:         id.into(),
      husband:    partners.first().map(|s| s.to_string()),
      wife:       partners.get(1).map(|s| s.to_string()),
      partners:   partners.iter().skip(2).map(|s| s.to_string()).collect(),
      children:   children.iter().map(|s| s.to_string()).collect(),
      status:     RecordStatus::Active,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn parent_edge_writes_both_sides() {
    let persons = [person("a"), person("b")];
    let rels = [rel("r1", "a", "b", RelationshipKind::Parent, false)];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.index["b"].parents, vec!["a"]);
    assert_eq!(built.index["a"].children, vec!["b"]);
    assert!(built.warnings.is_empty());
  }

  #[test]
  fn classification_is_idempotent() {
    let persons = [person("a"), person("b")];
    let rels = [
      rel("r1", "a", "b", RelationshipKind::Parent, false),
      rel("r2", "a", "b", RelationshipKind::Parent, false),
    ];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.index["b"].parents, vec!["a"]);
    assert_eq!(built.index["a"].children, vec!["b"]);
  }

  #[test]
  fn spouse_respects_bidirectional_flag() {
    let persons = [person("a"), person("b"), person("c")];
    let rels = [
      rel("r1", "a", "b", RelationshipKind::Spouse, true),
      rel("r2", "a", "c", RelationshipKind::Married, false),
    ];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.index["a"].spouses, vec!["b", "c"]);
    assert_eq!(built.index["b"].spouses, vec!["a"]);
    assert!(built.index["c"].spouses.is_empty());
  }

  #[test]
  fn step_and_foster_variants_act_as_parent_child() {
    let persons = [person("p"), person("c"), person("w")];
    let rels = [
      rel("r1", "p", "c", RelationshipKind::StepParent, false),
      rel("r2", "w", "p", RelationshipKind::FosterChild, false),
    ];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.index["c"].parents, vec!["p"]);
    assert_eq!(built.index["p"].children, vec!["c"]);
    // foster_child: w is a child figure of p.
    assert_eq!(built.index["w"].parents, vec!["p"]);
    assert!(built.index["p"].children.contains(&"w".to_string()));
  }

  #[test]
  fn god_relations_fold_into_in_laws() {
    let persons = [person("g"), person("k")];
    let rels = [rel("r1", "g", "k", RelationshipKind::Godparent, true)];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.index["g"].in_laws, vec!["k"]);
    assert_eq!(built.index["k"].in_laws, vec!["g"]);
  }

  #[test]
  fn grandparent_pair_is_symmetric() {
    let persons = [person("g"), person("k")];
    let rels = [rel("r1", "g", "k", RelationshipKind::Grandparent, false)];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.index["k"].grandparents, vec!["g"]);
    assert_eq!(built.index["g"].grandchildren, vec!["k"]);
  }

  #[test]
  fn dangling_relationship_warns_and_continues() {
    let persons = [person("a"), person("b")];
    let rels = [
      rel("r1", "a", "ghost", RelationshipKind::Parent, false),
      rel("r2", "a", "b", RelationshipKind::Sibling, true),
    ];
    let built = build_index(&persons, &[], &rels);

    assert_eq!(built.warnings.len(), 1);
    assert!(built.warnings[0].contains("ghost"));
    assert_eq!(built.index["a"].siblings, vec!["b"]);
  }

  #[test]
  fn inactive_records_are_ignored() {
    let persons = [person("a"), person("b")];
    let mut r = rel("r1", "a", "b", RelationshipKind::Spouse, true);
    r.status = RecordStatus::Archived;
    let mut f = family("f1", &["a", "b"], &[]);
    f.status = RecordStatus::Draft;

    let built = build_index(&persons, &[f], &[r]);
    assert!(built.index["a"].spouses.is_empty());
    assert!(built.index["b"].spouses.is_empty());
  }

  #[test]
  fn family_supplements_spouses_and_parents() {
    let persons = [person("h"), person("w"), person("c")];
    let fams = [family("f1", &["h", "w"], &["c"])];
    let built = build_index(&persons, &fams, &[]);

    assert_eq!(built.index["h"].spouses, vec!["w"]);
    assert_eq!(built.index["w"].spouses, vec!["h"]);
    assert_eq!(built.index["c"].parents, vec!["h", "w"]);
    assert_eq!(built.index["h"].children, vec!["c"]);
    assert_eq!(built.index["w"].children, vec!["c"]);
  }

  #[test]
  fn family_never_overwrites_relationship_data() {
    // Explicit one-way spouse edge from the relationships collection; the
    // family asserting the same pair must not add a second entry.
    let persons = [person("h"), person("w")];
    let rels = [rel("r1", "h", "w", RelationshipKind::Spouse, false)];
    let fams = [family("f1", &["h", "w"], &[])];
    let built = build_index(&persons, &fams, &rels);

    assert_eq!(built.index["h"].spouses, vec!["w"]);
    // The directional edge already captured the pair; the family supplement
    // leaves it exactly as recorded.
    assert!(built.index["w"].spouses.is_empty());
  }

  #[test]
  fn family_with_missing_members_skips_silently() {
    let persons = [person("h"), person("c")];
    let fams = [family("f1", &["h", "ghost"], &["c", "phantom"])];
    let built = build_index(&persons, &fams, &[]);

    assert!(built.index["h"].spouses.is_empty());
    assert_eq!(built.index["c"].parents, vec!["h"]);
    assert!(built.warnings.is_empty());
  }
}
