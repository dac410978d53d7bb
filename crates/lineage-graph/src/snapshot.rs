//! Graph snapshot types — the visualization-facing representation of the
//! tree at a point in time — plus placeholder detection and
//! duplicate-collapse over widget-produced snapshots.

use serde::{Deserialize, Serialize};

use crate::project::ProjectedPerson;

// ─── Node types ──────────────────────────────────────────────────────────────

/// The three buckets the visualization format understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRels {
  pub parents:  Vec<String>,
  pub spouses:  Vec<String>,
  pub children: Vec<String>,
}

/// One node of a graph snapshot: id + flat projected fields + the three
/// exported relationship lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeNode {
  pub id:   String,
  pub data: ProjectedPerson,
  pub rels: NodeRels,
}

impl TreeNode {
  pub fn new(id: impl Into<String>, data: ProjectedPerson) -> Self {
    Self {
      id: id.into(),
      data,
      rels: NodeRels::default(),
    }
  }
}

// ─── Placeholder detection ───────────────────────────────────────────────────

/// Generic names the widget assigns to auto-generated stub nodes for unset
/// relative slots. Matched case-insensitively after trimming.
const PLACEHOLDER_NAMES: &[&str] =
  &["father", "mother", "spouse", "son", "daughter", "unknown person"];

/// Trim + lowercase, the comparison form used for placeholder checks and
/// duplicate-collapse keys.
pub fn normalize_name(name: &str) -> String {
  name.trim().to_lowercase()
}

/// True for the widget's auto-generated stub names, empty names, and
/// anything containing "unnamed". The literal `Unknown` produced by name
/// fallback is *not* a placeholder — only "unknown person" is.
pub fn is_placeholder_name(name: &str) -> bool {
  let normalized = normalize_name(name);
  normalized.is_empty()
    || normalized.contains("unnamed")
    || PLACEHOLDER_NAMES.contains(&normalized.as_str())
}

// ─── Duplicate collapse ──────────────────────────────────────────────────────

/// Keep only real (non-placeholder) nodes; when several share the same
/// normalized name, keep the one with the most populated data fields.
pub fn collapse_real_nodes(nodes: &[TreeNode]) -> Vec<TreeNode> {
  let mut out: Vec<TreeNode> = Vec::new();
  let mut by_name: std::collections::HashMap<String, usize> =
    std::collections::HashMap::new();

  for node in nodes {
    if is_placeholder_name(&node.data.name) {
      continue;
    }
    let key = normalize_name(&node.data.name);
    match by_name.get(&key) {
      Some(&i) => {
        if node.data.populated_field_count()
          > out[i].data.populated_field_count()
        {
          out[i] = node.clone();
        }
      }
      None => {
        by_name.insert(key, out.len());
        out.push(node.clone());
      }
    }
  }

  out
}

// ─── Tests ───────────────────────────────────────────────────────────────────
