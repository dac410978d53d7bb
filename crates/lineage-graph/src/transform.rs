//! The forward pipeline: records → filtered, projected graph snapshot.
//!
//! The adjacency index is built over the *unfiltered* person set so
//! relationships may reference persons later excluded from display; the
//! exported relationship lists are then pruned against the filtered set.

use std::{
  collections::BTreeSet,
  time::{Duration, Instant},
};

use chrono::NaiveDate;
use lineage_core::{family::Family, person::Person, relationship::Relationship};

use crate::{
  Error, Result,
  adjacency::build_index,
  project::project_person,
  snapshot::{NodeRels, TreeNode},
};

// ─── Options & metadata ──────────────────────────────────────────────────────

/// Options for [`transform`].
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
  /// When `false` (the default), only public, active persons are exported.
  pub include_private: bool,
  /// Optional inclusive birth-date window; persons without a birth date
  /// always pass.
  pub date_range:      Option<(NaiveDate, NaiveDate)>,
}

/// Per-call metadata returned alongside the nodes.
#[derive(Debug, Clone, Default)]
pub struct TransformMeta {
  pub persons:       usize,
  pub families:      usize,
  pub relationships: usize,
  pub elapsed:       Duration,
  /// Non-fatal warnings accumulated during the run.
  pub warnings:      Vec<String>,
  /// Set when the whole pipeline failed. An empty node list together with a
  /// non-`None` error means failure, not "no data".
  pub error:         Option<String>,
}

/// The result of one transformation pass.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
  pub nodes: Vec<TreeNode>,
  pub meta:  TransformMeta,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

fn person_visible(person: &Person, options: &TransformOptions) -> bool {
  if !options.include_private && !(person.is_public && person.status.is_active())
  {
    return false;
  }
  match (options.date_range, person.birth_date) {
    (Some((start, end)), Some(birth)) => start <= birth && birth <= end,
    _ => true,
  }
}

fn try_transform(
  persons: &[Person],
  families: &[Family],
  relationships: &[Relationship],
  options: &TransformOptions,
) -> Result<(Vec<TreeNode>, Vec<String>)> {
  if let Some((start, end)) = options.date_range
    && start > end
  {
    return Err(Error::InvalidDateRange { start, end });
  }

  // Index over the full person set; display filtering happens afterwards.
  let built = build_index(persons, families, relationships);

  let visible: Vec<&Person> = persons
    .iter()
    .filter(|p| person_visible(p, options))
    .collect();
  let visible_ids: BTreeSet<&str> =
    visible.iter().map(|p| p.id.as_str()).collect();

  let keep = |ids: &[String]| -> Vec<String> {
    ids
      .iter()
      .filter(|id| visible_ids.contains(id.as_str()))
      .cloned()
      .collect()
  };

  let nodes = visible
    .iter()
    .map(|person| {
      let entry = built.index.get(&person.id).cloned().unwrap_or_default();
      TreeNode {
        id:   person.id.clone(),
        data: project_person(person),
        rels: NodeRels {
          parents:  keep(&entry.parents),
          spouses:  keep(&entry.spouses),
          children: keep(&entry.children),
        },
      }
    })
    .collect();

  Ok((nodes, built.warnings))
}

/// Run the full forward pipeline. Never returns an error: total pipeline
/// failure is captured into an empty-node snapshot with
/// [`TransformMeta::error`] set, which callers must treat as a failure.
pub fn transform(
  persons: &[Person],
  families: &[Family],
  relationships: &[Relationship],
  options: &TransformOptions,
) -> GraphSnapshot {
  let started = Instant::now();
  let mut meta = TransformMeta {
    persons: persons.len(),
    families: families.len(),
    relationships: relationships.len(),
    ..Default::default()
  };

  let nodes = match try_transform(persons, families, relationships, options) {
    Ok((nodes, warnings)) => {
      meta.warnings = warnings;
      nodes
    }
    Err(e) => {
      tracing::error!("transform failed: {e}");
      meta.error = Some(e.to_string());
      Vec::new()
    }
  };

  meta.elapsed = started.elapsed();
  GraphSnapshot { nodes, meta }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
