// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalized record types shared by projection, event extraction, aggregation and the export sink
// role: model/types
// outputs: Serializable structs; one IssueRecord per source issue, one ChangeEvent per changelog entry
// invariants: IssueRecord is constructed fresh per issue and never mutated after its page is folded in
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One normalized row per source issue. Optional fields are populated only
/// when the corresponding feature flag requested them.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IssueRecord {
  pub key: String,
  pub priority: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub product: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub project_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub component: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manager: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<NaiveDateTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated: Option<NaiveDateTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub severity: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub epic: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub testcase: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub labels: Vec<String>,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub comments: Vec<CommentEntry>,
  /// Full change history, retained verbatim when expansion is on.
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub history: Vec<ChangeEvent>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub finish_date: Option<NaiveDate>,
  /// Whole days between today and the finish date. Negative means the
  /// finish date lies in the future.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cost_days: Option<i64>,
}

/// One captured comment: when, who (normalized), what.
#[derive(Clone, Debug, Serialize)]
pub struct CommentEntry {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<NaiveDateTime>,
  pub author: String,
  pub body: String,
}

/// One historical change entry, consumed transiently by the event extractor
/// and optionally retained on the record.
#[derive(Clone, Debug, Serialize)]
pub struct ChangeEvent {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created: Option<NaiveDateTime>,
  pub author: String,
  pub field: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to: Option<String>,
}

/// Disjoint test-case classification buckets. Exactly one applies per issue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CaseKind {
  /// Reference carries the recognized test-suite prefix.
  Valid,
  /// Reference mentions an ad-hoc case instead of a suite entry.
  Added,
  /// Field absent or empty.
  Missing,
  /// Present but matching neither pattern.
  Other,
}
