// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed frequency tables and the run-wide aggregate state folded across pages
// role: aggregation/state
// inputs: Normalized actor names, severities, classification buckets from projection and event extraction
// outputs: Running tallies, defect index, per-page log lines
// invariants:
// - Tables only grow; a merge never loses counts
// - Classification tables stay disjoint because exactly one CaseKind is observed per issue
// - ratio() guards the zero denominator
// errors: None; aggregation is infallible by construction
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::cli::EffectiveConfig;
use crate::model::CaseKind;

/// Severity weights for the defect index.
const DI_WEIGHTS: &[(&str, f64)] = &[
  ("Blocker", 10.0),
  ("Critical", 3.0),
  ("Major", 1.0),
  ("Normal", 0.1),
];

/// Severities eligible for defect-index counting. Anything else is ignored.
pub fn di_eligible(severity: &str) -> bool {
  DI_WEIGHTS.iter().any(|(name, _)| *name == severity)
}

/// A frequency table (key → count) with explicit merge and ratio operations.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Tally(BTreeMap<String, u64>);

impl Tally {
  pub fn add(&mut self, key: impl Into<String>) {
    *self.0.entry(key.into()).or_insert(0) += 1;
  }

  /// Fold another table in. Counts are summed per key; nothing is dropped.
  pub fn merge(&mut self, other: &Tally) {
    for (key, count) in &other.0 {
      *self.0.entry(key.clone()).or_insert(0) += count;
    }
  }

  pub fn total(&self) -> u64 {
    self.0.values().sum()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, key: &str) -> u64 {
    self.0.get(key).copied().unwrap_or(0)
  }

  /// Share of this table's total against a denominator; zero-guarded.
  pub fn ratio(&self, denominator: u64) -> f64 {
    if denominator == 0 {
      return 0.0;
    }
    self.total() as f64 / denominator as f64
  }

  /// Entries sorted by descending count (ties by key, stable for display).
  pub fn sorted_desc(&self) -> Vec<(String, u64)> {
    let mut rows: Vec<(String, u64)> = self.0.iter().map(|(k, v)| (k.clone(), *v)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
    self.0.iter()
  }
}

/// Running totals across all pages. One instance per page is merged into the
/// run-wide instance, so final values equal the sum of per-page contributions.
#[derive(Clone, Debug, Default)]
pub struct Aggregates {
  pub issue_total: u64,
  /// Comment authors by volume: one entry per comment, not deduplicated.
  pub comment_authors: Vec<String>,
  pub verified: Tally,
  pub qa_verified: Tally,
  pub label_adds: Tally,
  pub severity: Tally,
  pub valid_case: Tally,
  pub added_case: Tally,
  pub missing_case: Tally,
  pub other_case: Tally,
}

impl Aggregates {
  pub fn merge(&mut self, page: &Aggregates) {
    self.issue_total += page.issue_total;
    self.comment_authors.extend(page.comment_authors.iter().cloned());
    self.verified.merge(&page.verified);
    self.qa_verified.merge(&page.qa_verified);
    self.label_adds.merge(&page.label_adds);
    self.severity.merge(&page.severity);
    self.valid_case.merge(&page.valid_case);
    self.added_case.merge(&page.added_case);
    self.missing_case.merge(&page.missing_case);
    self.other_case.merge(&page.other_case);
  }

  /// Record a classified test-case reference into exactly one bucket.
  pub fn observe_case(&mut self, kind: CaseKind, reference: &str) {
    match kind {
      CaseKind::Valid => self.valid_case.add(reference),
      CaseKind::Added => self.added_case.add(reference),
      CaseKind::Missing => self.missing_case.add(reference),
      CaseKind::Other => self.other_case.add(reference),
    }
  }

  /// Severity-weighted defect index over the eligible severities.
  pub fn defect_index(&self) -> f64 {
    DI_WEIGHTS
      .iter()
      .map(|(name, weight)| self.severity.get(name) as f64 * weight)
      .sum()
  }

  /// Log the running totals after a page has been folded in. Lines are
  /// gated on the features that feed them.
  pub fn log_running(&self, cfg: &EffectiveConfig) {
    info!("[01] total issues: {}", self.issue_total);

    if cfg.active_check {
      info!("[02] total comment histories: {}", self.comment_authors.len());
    }

    if cfg.verify_check {
      info!("[03] total verified histories: {}", self.verified.total());
      info!("[04] total QA verified count: {}", self.qa_verified.total());
    }

    if let Some(label) = &cfg.label_check {
      info!("[05] target label: {label}");
      info!("[06] total label count: {}", self.label_adds.total());
    }

    if cfg.di_count {
      info!("[07] severity distribution: {:?}", self.severity.sorted_desc());
      info!("[08] total DI value: {:.1}", self.defect_index());
    }

    if cfg.testcase_check {
      for (name, table) in [
        ("valid", &self.valid_case),
        ("added", &self.added_case),
        ("missing", &self.missing_case),
        ("other", &self.other_case),
      ] {
        info!(
          "[09] {name} testcase count: {}, ratio: {:.1}%",
          table.total(),
          table.ratio(self.issue_total) * 100.0
        );
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tally_add_and_total() {
    let mut t = Tally::default();
    t.add("San.Zhang");
    t.add("San.Zhang");
    t.add("Si.Li");
    assert_eq!(t.total(), 3);
    assert_eq!(t.get("San.Zhang"), 2);
    assert_eq!(t.get("Nobody"), 0);
  }

  #[test]
  fn tally_merge_sums_per_key() {
    let mut a = Tally::default();
    a.add("x");
    let mut b = Tally::default();
    b.add("x");
    b.add("y");
    a.merge(&b);
    assert_eq!(a.get("x"), 2);
    assert_eq!(a.get("y"), 1);
    assert_eq!(a.total(), 3);
  }

  #[test]
  fn tally_ratio_guards_zero_denominator() {
    let mut t = Tally::default();
    t.add("x");
    assert_eq!(t.ratio(0), 0.0);
    assert!((t.ratio(4) - 0.25).abs() < f64::EPSILON);
  }

  #[test]
  fn sorted_desc_orders_by_count_then_key() {
    let mut t = Tally::default();
    t.add("b");
    t.add("a");
    t.add("a");
    t.add("c");
    let rows = t.sorted_desc();
    assert_eq!(rows[0], ("a".to_string(), 2));
    assert_eq!(rows[1], ("b".to_string(), 1));
    assert_eq!(rows[2], ("c".to_string(), 1));
  }

  #[test]
  fn defect_index_weights_severities() {
    let mut agg = Aggregates::default();
    agg.severity.add("Blocker");
    agg.severity.add("Blocker");
    for _ in 0..5 {
      agg.severity.add("Major");
    }
    assert!((agg.defect_index() - 25.0).abs() < f64::EPSILON);
  }

  #[test]
  fn defect_index_ignores_ineligible_severities() {
    let mut agg = Aggregates::default();
    agg.severity.add("Normal");
    agg.severity.add("Trivial"); // never tallied by the projector, but harmless here
    assert!((agg.defect_index() - 0.1).abs() < f64::EPSILON);
    assert!(di_eligible("Blocker"));
    assert!(!di_eligible("Trivial"));
  }

  #[test]
  fn case_buckets_stay_disjoint() {
    use crate::model::CaseKind;

    let mut agg = Aggregates::default();
    agg.observe_case(CaseKind::Valid, "TV-F3081F0001");
    agg.observe_case(CaseKind::Missing, "");
    let counted = agg.valid_case.total()
      + agg.added_case.total()
      + agg.missing_case.total()
      + agg.other_case.total();
    assert_eq!(counted, 2);
    assert_eq!(agg.valid_case.total(), 1);
    assert_eq!(agg.missing_case.total(), 1);
  }

  #[test]
  fn merge_matches_sum_of_pages() {
    let mut page1 = Aggregates::default();
    page1.issue_total = 2;
    page1.verified.add("San.Zhang");
    let mut page2 = Aggregates::default();
    page2.issue_total = 1;
    page2.verified.add("San.Zhang");
    page2.verified.add("Si.Li");

    let mut run = Aggregates::default();
    run.merge(&page1);
    run.merge(&page2);
    assert_eq!(run.issue_total, 3);
    assert_eq!(run.verified.get("San.Zhang"), 2);
    assert_eq!(run.verified.total(), 3);
  }
}
