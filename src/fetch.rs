// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive the paginated search: fetch pages, project issues, extract events, fold aggregates
// role: processing/orchestrator
// inputs: EffectiveConfig, JiraApi seam, composed JQL, today's date for cost derivation
// outputs: Retained records and run-wide aggregates; running totals logged per page
// invariants:
// - Pages advance by PAGE_SIZE from offset 0 and stop on the first empty page
// - Each page is fully folded before the next request; only aggregates and retained records persist
// - A page-level service error aborts the run
// errors: Propagated from the API seam; nothing page-local is retried
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{Aggregates, di_eligible};
use crate::cli::EffectiveConfig;
use crate::ext::serde_json::JsonFetch;
use crate::history;
use crate::jira::JiraApi;
use crate::model::IssueRecord;
use crate::project;

/// Fixed page size for the search endpoint.
pub const PAGE_SIZE: usize = 1000;

#[derive(Debug)]
pub struct RunOutcome {
  pub records: Vec<IssueRecord>,
  pub totals: Aggregates,
}

/// Issue page requests until exhausted, folding every page into the running
/// aggregates before the next request goes out.
pub fn run_search(
  cfg: &EffectiveConfig,
  api: &dyn JiraApi,
  jql: &str,
  today: NaiveDate,
) -> Result<RunOutcome> {
  info!("JQL: {jql}");

  let fields = project::requested_fields(cfg);
  let mut totals = Aggregates::default();
  let mut records: Vec<IssueRecord> = Vec::new();
  let mut start_at = 0usize;
  let mut segment = 0u32;

  loop {
    let page = api.search(jql, start_at, PAGE_SIZE, &fields, cfg.expand)?;
    let issues = match page.fetch("issues").value().and_then(|v| v.as_array()) {
      Some(list) if !list.is_empty() => list.clone(),
      _ => break,
    };

    segment += 1;
    info!("[{segment:02}] page issues: {}", issues.len());

    let mut page_agg = Aggregates {
      issue_total: issues.len() as u64,
      ..Default::default()
    };

    for issue in &issues {
      // Fresh record per issue; nothing carries over from the previous one.
      let mut rec = project::project_issue(cfg, issue);

      if cfg.expand {
        history::extract_events(cfg, issue, &mut rec, &mut page_agg);
      }

      rec.cost_days = rec.finish_date.map(|finish| project::cost_days(today, finish));

      observe_record(cfg, &rec, &mut page_agg);

      if !cfg.export || project::export_retain(&rec) {
        records.push(rec);
      }
    }

    totals.merge(&page_agg);
    totals.log_running(cfg);

    start_at += PAGE_SIZE;
  }

  Ok(RunOutcome { records, totals })
}

/// Fold the projection-derived tallies of one record into the page
/// aggregates. Event-derived tallies were already applied by the extractor.
fn observe_record(cfg: &EffectiveConfig, rec: &IssueRecord, agg: &mut Aggregates) {
  if cfg.active_check {
    for comment in &rec.comments {
      agg.comment_authors.push(comment.author.clone());
    }
  }

  if cfg.di_count {
    if let Some(severity) = &rec.severity {
      if di_eligible(severity) {
        agg.severity.add(severity.clone());
      }
    }
  }

  if cfg.testcase_check {
    let kind = project::classify_case(rec.testcase.as_deref());
    agg.observe_case(kind, rec.testcase.as_deref().unwrap_or(""));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cli::{Cli, normalize};
  use clap::Parser;
  use std::cell::RefCell;

  fn cfg_from(args: &[&str]) -> EffectiveConfig {
    let mut argv = vec!["jira-project-report"];
    argv.extend(args);
    normalize(Cli::parse_from(argv)).unwrap()
  }

  /// Canned-page API that records how many requests it served.
  struct PagedApi {
    pages: Vec<serde_json::Value>,
    calls: RefCell<usize>,
  }

  impl PagedApi {
    fn new(pages: Vec<serde_json::Value>) -> Self {
      Self {
        pages,
        calls: RefCell::new(0),
      }
    }
  }

  impl JiraApi for PagedApi {
    fn search(
      &self,
      _jql: &str,
      start_at: usize,
      max_results: usize,
      _fields: &[String],
      _expand: bool,
    ) -> Result<serde_json::Value> {
      *self.calls.borrow_mut() += 1;
      let index = start_at / max_results;
      Ok(
        self
          .pages
          .get(index)
          .cloned()
          .unwrap_or_else(|| serde_json::json!({ "issues": [] })),
      )
    }
  }

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 2, 15).unwrap()
  }

  fn issue(key: &str) -> serde_json::Value {
    serde_json::json!({ "key": key, "fields": { "priority": { "name": "P0" } } })
  }

  #[test]
  fn pagination_stops_on_first_empty_page() {
    let api = PagedApi::new(vec![
      serde_json::json!({ "issues": [ issue("TV-1"), issue("TV-2") ] }),
      serde_json::json!({ "issues": [ issue("TV-3") ] }),
      serde_json::json!({ "issues": [] }),
    ]);

    let cfg = cfg_from(&[]);
    let outcome = run_search(&cfg, &api, "ORDER BY created DESC", today()).unwrap();

    assert_eq!(outcome.totals.issue_total, 3);
    assert_eq!(outcome.records.len(), 3);
    // Two non-empty pages plus the terminating empty one.
    assert_eq!(*api.calls.borrow(), 3);
  }

  #[test]
  fn single_open_p0_issue_scenario() {
    let api = PagedApi::new(vec![
      serde_json::json!({ "issues": [ issue("TV-9") ] }),
      serde_json::json!({ "issues": [] }),
    ]);

    let cfg = cfg_from(&["--status", "Open", "--priority", "P0"]);
    let jql = cfg.raw_jql.clone().unwrap_or_else(|| cfg.criteria.compose());
    assert!(jql.contains("status in (Open)"));
    assert!(jql.contains("priority in (Highest)"));

    let outcome = run_search(&cfg, &api, &jql, today()).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.totals.issue_total, 1);
    assert_eq!(outcome.records[0].key, "TV-9");
  }

  #[test]
  fn service_error_aborts_the_run() {
    struct FailingApi;
    impl JiraApi for FailingApi {
      fn search(&self, _: &str, _: usize, _: usize, _: &[String], _: bool) -> Result<serde_json::Value> {
        anyhow::bail!("503 from upstream")
      }
    }

    let cfg = cfg_from(&[]);
    let err = run_search(&cfg, &FailingApi, "ORDER BY created DESC", today()).unwrap_err();
    assert!(format!("{err:#}").contains("503"));
  }

  #[test]
  fn severity_and_case_tallies_fold_across_pages() {
    let sev_issue = |key: &str, sev: &str, case: Option<&str>| {
      serde_json::json!({
        "key": key,
        "fields": {
          "priority": { "name": "P1" },
          "customfield_10109": { "value": sev },
          "customfield_11604": case,
        }
      })
    };

    let api = PagedApi::new(vec![
      serde_json::json!({ "issues": [
        sev_issue("TV-1", "Blocker", Some("TV-F3081F0001")),
        sev_issue("TV-2", "Trivial", Some("new case")),
      ] }),
      serde_json::json!({ "issues": [
        sev_issue("TV-3", "Major", None),
      ] }),
      serde_json::json!({ "issues": [] }),
    ]);

    let cfg = cfg_from(&["--di-count", "--testcase-check"]);
    let outcome = run_search(&cfg, &api, "ORDER BY created DESC", today()).unwrap();

    // Trivial is not an eligible severity.
    assert_eq!(outcome.totals.severity.total(), 2);
    assert!((outcome.totals.defect_index() - 11.0).abs() < f64::EPSILON);

    // Disjoint classification across pages: one per bucket here.
    assert_eq!(outcome.totals.valid_case.total(), 1);
    assert_eq!(outcome.totals.added_case.total(), 1);
    assert_eq!(outcome.totals.missing_case.total(), 1);
    assert_eq!(outcome.totals.other_case.total(), 0);
  }

  #[test]
  fn export_mode_retains_only_passing_records() {
    let with_finish = serde_json::json!({
      "key": "TV-5",
      "fields": { "priority": { "name": "P0" }, "created": "2023-01-01T08:00:00.000+0800" },
      "changelog": { "histories": [ {
        "created": "2023-01-10T10:00:00.000+0800",
        "author": { "name": "si.li" },
        "items": [ { "field": "Finish date (WBSGantt)", "fromString": null, "toString": "2023-02-05", "to": "2023-02-05" } ]
      } ] }
    });
    let without_finish = serde_json::json!({
      "key": "TV-6",
      "fields": { "priority": { "name": "P0" } }
    });

    let api = PagedApi::new(vec![
      serde_json::json!({ "issues": [ with_finish, without_finish ] }),
      serde_json::json!({ "issues": [] }),
    ]);

    let cfg = cfg_from(&["-o"]);
    let outcome = run_search(&cfg, &api, "ORDER BY created DESC", today()).unwrap();

    assert_eq!(outcome.totals.issue_total, 2);
    assert_eq!(outcome.records.len(), 1);
    let rec = &outcome.records[0];
    assert_eq!(rec.key, "TV-5");
    assert_eq!(rec.finish_date.unwrap().to_string(), "2023-02-05");
    assert_eq!(rec.cost_days, Some(10));
  }
}
