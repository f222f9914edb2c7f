// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Project one raw Jira issue into a normalized IssueRecord according to the enabled feature flags
// role: processing/projection
// inputs: Raw issue JSON; EffectiveConfig; today's date for cost derivation
// outputs: Fresh IssueRecord per issue; test-case classification; export retention decision
// invariants:
// - A record is built from scratch per issue; no state leaks between iterations
// - Missing fields become None/empty, never an abort
// - classify_case assigns exactly one bucket, valid-prefix check first
// errors: None; projection tolerates partial data by design
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;

use crate::cli::EffectiveConfig;
use crate::ext::serde_json::JsonFetch;
use crate::model::{CaseKind, CommentEntry, IssueRecord};
use crate::util::{normalize_name, parse_jira_timestamp};

/// Source paths for every field the projector can extract. Jira hides most
/// of the interesting ones behind instance-specific custom field ids.
mod paths {
  pub const PRIORITY: &str = "fields.priority.name";
  pub const PRODUCT: &str = "fields.customfield_10107.0.value";
  pub const PROJECT_ID: &str = "fields.customfield_10407.0.value";
  pub const COMPONENT: &str = "fields.components.0.name";
  pub const STATUS: &str = "fields.status.name";
  pub const ASSIGNEE: &str = "fields.assignee.name";
  pub const MANAGER: &str = "fields.customfield_10700.name";
  pub const CREATED: &str = "fields.created";
  pub const UPDATED: &str = "fields.updated";
  pub const SEVERITY: &str = "fields.customfield_10109.value";
  pub const EPIC: &str = "fields.customfield_10102";
  pub const TESTCASE: &str = "fields.customfield_11604";
  pub const LABELS: &str = "fields.labels";
  pub const COMMENTS: &str = "fields.comment.comments";
}

/// Test-case references carrying this prefix belong to the managed suite.
pub const VALID_CASE_PREFIX: &str = "TV-";

/// Exported rows never include keys with this prefix.
const EXPORT_EXCLUDE_KEY_PREFIX: &str = "SWPL-";

/// Exported rows never include these priorities.
const EXPORT_LOW_PRIORITIES: &[&str] = &["P2", "P3", "P4"];

/// Field names requested from the search endpoint. Keeping the set minimal
/// keeps page payloads small; export mode pulls the full spreadsheet set.
pub fn requested_fields(cfg: &EffectiveConfig) -> Vec<String> {
  let mut fields: Vec<&str> = vec!["priority"];

  if cfg.active_check || cfg.verify_check {
    fields.push("comment");
  }
  if cfg.label_check.is_some() {
    fields.push("labels");
  }
  if cfg.di_count {
    fields.push("customfield_10109");
  }
  if cfg.testcase_check {
    fields.push("customfield_11604");
  }
  if cfg.epic_check {
    fields.push("customfield_10102");
  }
  if cfg.export {
    fields.extend([
      "customfield_10107",
      "customfield_10407",
      "components",
      "status",
      "assignee",
      "customfield_10700",
      "created",
      "updated",
    ]);
  }

  fields.into_iter().map(String::from).collect()
}

fn text_at(issue: &serde_json::Value, path: &str) -> Option<String> {
  issue.fetch(path).to::<String>().filter(|s| !s.is_empty())
}

/// Build a fresh record from one raw issue. Only the fields enabled by the
/// configuration are populated; everything else stays at its default.
pub fn project_issue(cfg: &EffectiveConfig, issue: &serde_json::Value) -> IssueRecord {
  let mut rec = IssueRecord {
    key: issue.fetch("key").to_or_default::<String>(),
    priority: text_at(issue, paths::PRIORITY).unwrap_or_default(),
    ..Default::default()
  };

  if cfg.active_check {
    rec.comments = project_comments(issue);
  }
  if cfg.label_check.is_some() {
    rec.labels = issue.fetch(paths::LABELS).to_or_default::<Vec<String>>();
  }
  if cfg.epic_check {
    rec.epic = text_at(issue, paths::EPIC);
  }
  if cfg.di_count {
    rec.severity = text_at(issue, paths::SEVERITY);
  }
  if cfg.testcase_check {
    rec.testcase = text_at(issue, paths::TESTCASE);
  }
  if cfg.export {
    rec.product = text_at(issue, paths::PRODUCT);
    rec.project_id = text_at(issue, paths::PROJECT_ID);
    rec.component = text_at(issue, paths::COMPONENT);
    rec.status = text_at(issue, paths::STATUS);
    rec.assignee = text_at(issue, paths::ASSIGNEE).map(|n| normalize_name(&n));
    rec.manager = text_at(issue, paths::MANAGER).map(|n| normalize_name(&n));
    rec.created = text_at(issue, paths::CREATED).and_then(|s| parse_jira_timestamp(&s));
    rec.updated = text_at(issue, paths::UPDATED).and_then(|s| parse_jira_timestamp(&s));
  }

  rec
}

fn project_comments(issue: &serde_json::Value) -> Vec<CommentEntry> {
  let Some(items) = issue.fetch(paths::COMMENTS).value().and_then(|v| v.as_array()) else {
    return Vec::new();
  };

  items
    .iter()
    .map(|c| CommentEntry {
      created: c.fetch("created").to::<String>().and_then(|s| parse_jira_timestamp(&s)),
      author: normalize_name(&c.fetch("author.name").to_or_default::<String>()),
      body: c.fetch("body").to_or_default::<String>(),
    })
    .collect()
}

/// Classify a test-case reference into exactly one bucket. The valid-prefix
/// check deliberately precedes the substring checks; a reference carrying
/// both the prefix and "case" counts as valid.
pub fn classify_case(reference: Option<&str>) -> CaseKind {
  match reference {
    None => CaseKind::Missing,
    Some(r) if r.is_empty() => CaseKind::Missing,
    Some(r) if r.contains(VALID_CASE_PREFIX) => CaseKind::Valid,
    Some(r) if r.contains("case") || r.contains("Case") => CaseKind::Added,
    Some(_) => CaseKind::Other,
  }
}

/// Whole days between today (time truncated) and the finish date. Negative
/// values mean the finish date is still ahead.
pub fn cost_days(today: NaiveDate, finish: NaiveDate) -> i64 {
  (today - finish).num_days()
}

/// Export retention: drop excluded key prefixes, low priorities, and
/// anything without a strictly positive cost.
pub fn export_retain(rec: &IssueRecord) -> bool {
  if rec.key.starts_with(EXPORT_EXCLUDE_KEY_PREFIX) {
    return false;
  }
  if EXPORT_LOW_PRIORITIES.contains(&rec.priority.as_str()) {
    return false;
  }
  matches!(rec.cost_days, Some(cost) if cost > 0)
}
