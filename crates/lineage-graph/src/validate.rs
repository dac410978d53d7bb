//! Advisory integrity checks over snapshots and adjacency indexes.
//!
//! Reports are informational only — nothing here blocks a write path.

use std::collections::{BTreeSet, HashSet};

use crate::{adjacency::AdjacencyIndex, snapshot::TreeNode};

/// The outcome of [`validate_snapshot`].
#[derive(Debug, Clone)]
pub struct ValidationReport {
  pub is_valid: bool,
  pub errors:   Vec<String>,
}

/// Check that every relationship id referenced by a snapshot resolves to a
/// node in the same snapshot. Dangling ids are collected as human-readable
/// issue strings.
pub fn validate_snapshot(nodes: &[TreeNode]) -> ValidationReport {
  let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
  let mut errors = Vec::new();

  for node in nodes {
    let buckets = [
      ("parent", &node.rels.parents),
      ("spouse", &node.rels.spouses),
      ("child", &node.rels.children),
    ];
    for (label, list) in buckets {
      for referenced in list {
        if !ids.contains(referenced.as_str()) {
          errors.push(format!(
            "node {} references missing {label} {referenced}",
            node.id
          ));
        }
      }
    }
  }

  ValidationReport { is_valid: errors.is_empty(), errors }
}

/// Detect cycles in the parents graph (a person appearing among its own
/// ancestors). Returns one warning string per affected person; the index is
/// a general graph and a malformed relationship set can produce this.
/// Advisory only — builds never reject cyclic data.
pub fn detect_parent_cycles(index: &AdjacencyIndex) -> Vec<String> {
  let mut warnings = Vec::new();
  let mut on_path: BTreeSet<&str> = BTreeSet::new();
  let mut done: BTreeSet<&str> = BTreeSet::new();

  fn visit<'a>(
    index: &'a AdjacencyIndex,
    id: &'a str,
    on_path: &mut BTreeSet<&'a str>,
    done: &mut BTreeSet<&'a str>,
    warnings: &mut Vec<String>,
  ) {
    if done.contains(id) {
      return;
    }
    if !on_path.insert(id) {
      warnings.push(format!("parent cycle detected involving {id}"));
      return;
    }
    if let Some(entry) = index.get(id) {
      for parent in &entry.parents {
        visit(index, parent, on_path, done, warnings);
      }
    }
    on_path.remove(id);
    done.insert(id);
  }

  for id in index.keys() {
    visit(index, id, &mut on_path, &mut done, &mut warnings);
  }

  warnings
}

// ─── Tests ───────────────────────────────────────────────────────────────────
