//! Snapshot diff: edited snapshot vs. pre-edit snapshot → change set.
//!
//! Classifies every node as new, updated, or deleted, after filtering out
//! the placeholder stubs the widget injects for unset relatives. A node
//! never lands in more than one bucket, and unchanged nodes land in none.

use std::collections::HashMap;

use crate::snapshot::{TreeNode, collapse_real_nodes, is_placeholder_name};

/// The classified difference between two snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDiff {
  /// Present in current only. Carries the current node.
  pub new_nodes:     Vec<TreeNode>,
  /// Present in both with differing data. Carries the current node.
  pub updated_nodes: Vec<TreeNode>,
  /// Present in original only, and originally a real (non-stub) node.
  pub deleted_ids:   Vec<String>,
}

impl SnapshotDiff {
  pub fn is_empty(&self) -> bool {
    self.new_nodes.is_empty()
      && self.updated_nodes.is_empty()
      && self.deleted_ids.is_empty()
  }
}

/// Compute the change set between `original` (pre-edit) and `current`
/// (post-edit) snapshots.
pub fn diff_snapshots(original: &[TreeNode], current: &[TreeNode]) -> SnapshotDiff {
  let current_real = collapse_real_nodes(current);

  let original_by_id: HashMap<&str, &TreeNode> =
    original.iter().map(|n| (n.id.as_str(), n)).collect();
  let current_ids: HashMap<&str, ()> =
    current_real.iter().map(|n| (n.id.as_str(), ())).collect();

  let mut diff = SnapshotDiff::default();

  for node in &current_real {
    match original_by_id.get(node.id.as_str()) {
      None => {
        // Defense in depth beyond the pre-filter.
        if !is_placeholder_name(&node.data.name) {
          diff.new_nodes.push(node.clone());
        }
      }
      Some(orig) => {
        if orig.data != node.data {
          diff.updated_nodes.push(node.clone());
        }
      }
    }
  }

  for node in original {
    if !current_ids.contains_key(node.id.as_str())
      // Never delete a node that was only ever a stub.
      && !is_placeholder_name(&node.data.name)
    {
      diff.deleted_ids.push(node.id.clone());
    }
  }

  diff
}

// ─── Tests ───────────────────────────────────────────────────────────────────
