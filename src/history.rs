// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Walk one issue's changelog to detect verification, label-addition and finish-date events
// role: processing/events
// inputs: Raw issue JSON with changelog.histories; EffectiveConfig; optional date window; page aggregates
// outputs: Tallies on the aggregates; finish date and retained history on the record
// invariants:
// - Entries are consumed in the order the service returns them (oldest first)
// - Unparseable finish dates are skipped, never fatal
// - Window checks are inclusive on both boundaries
// errors: None; malformed entries degrade to no-ops
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;

use tracing::debug;

use crate::aggregate::Aggregates;
use crate::cli::EffectiveConfig;
use crate::dates::DateWindow;
use crate::ext::serde_json::JsonFetch;
use crate::model::{ChangeEvent, IssueRecord};
use crate::roster;
use crate::util::{normalize_name, parse_jira_date, parse_jira_timestamp};

/// Changelog field name the planning plugin writes the finish date under.
const FINISH_DATE_FIELD: &str = "Finish date (WBSGantt)";

/// Status value that marks an issue as verified.
const VERIFIED_STATUS: &str = "Verified";

/// Tokens present in `new` but absent from `old`.
pub fn label_diff(old: &str, new: &str) -> HashSet<String> {
  let old_set: HashSet<&str> = old.split_whitespace().collect();
  new
    .split_whitespace()
    .filter(|t| !old_set.contains(t))
    .map(String::from)
    .collect()
}

/// Process every changelog entry of one issue: update the verified / QA
/// verified / label tallies, resolve the finish date, and retain the raw
/// events on the record.
pub fn extract_events(
  cfg: &EffectiveConfig,
  issue: &serde_json::Value,
  rec: &mut IssueRecord,
  agg: &mut Aggregates,
) {
  let Some(entries) = issue.fetch("changelog.histories").value().and_then(|v| v.as_array()) else {
    return;
  };

  for entry in entries {
    let created = entry.fetch("created").to::<String>().and_then(|s| parse_jira_timestamp(&s));
    let author = normalize_name(&entry.fetch("author.name").to_or_default::<String>());
    // Jira groups simultaneous changes into items[]; the first carries the
    // field this tool cares about.
    let field = entry.fetch("items.0.field").to_or_default::<String>();
    let from = entry.fetch("items.0.fromString").to::<String>();
    let to = entry.fetch("items.0.toString").to::<String>();

    if cfg.verify_check && field == "status" && to.as_deref() == Some(VERIFIED_STATUS) {
      debug!("verified by {author} at {created:?}");
      agg.verified.add(author.clone());

      if let Some(window) = &cfg.date_range {
        if roster::is_qa_member(&author) && in_window(window, created) {
          agg.qa_verified.add(author.clone());
        }
      }
    }

    if let (Some(target), Some(window)) = (&cfg.label_check, &cfg.date_range) {
      if field == "labels" {
        let added = label_diff(from.as_deref().unwrap_or(""), to.as_deref().unwrap_or(""));
        if added.contains(target.as_str()) && roster::is_qa_member(&author) && in_window(window, created) {
          debug!("label {target} added by {author} at {created:?}");
          agg.label_adds.add(author.clone());
        }
      }
    }

    if field == FINISH_DATE_FIELD {
      // The raw `to` value is a bare date; anything unparseable leaves the
      // finish date unset.
      if let Some(day) = entry.fetch("items.0.to").to::<String>().and_then(|s| parse_jira_date(&s)) {
        rec.finish_date = Some(day);
      }
    }

    rec.history.push(ChangeEvent {
      created,
      author,
      field,
      from,
      to,
    });
  }
}

fn in_window(window: &DateWindow, ts: Option<chrono::NaiveDateTime>) -> bool {
  ts.is_some_and(|t| window.contains(t.date()))
}
