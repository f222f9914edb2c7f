use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::dates::DateWindow;
use crate::jql::SearchCriteria;

#[derive(Parser, Debug)]
#[command(
    name = "jira-project-report",
    version,
    about = "Search Jira by project and report aggregate health",
    long_about = None
)]
pub struct Cli {
  /// Jira server base URL (or env JIRA_SERVER)
  #[arg(long)]
  pub server: Option<String>,

  /// Jira login user (or env JIRA_USER)
  #[arg(long)]
  pub user: Option<String>,

  /// Jira login password (or env JIRA_PASSWORD)
  #[arg(long)]
  pub password: Option<String>,

  /// Filter by project id, e.g. X32A0-T972 (repeatable)
  #[arg(long = "project-id", num_args = 1..)]
  pub project_id: Option<Vec<String>>,

  /// Filter by status, e.g. OPEN Resolved
  #[arg(long, num_args = 1..)]
  pub status: Option<Vec<String>>,

  /// Filter by reporter, e.g. san.zhang
  #[arg(long, num_args = 1..)]
  pub reporter: Option<Vec<String>>,

  /// Filter by component, e.g. HDMI "Dolby Vision"
  #[arg(long, num_args = 1..)]
  pub component: Option<Vec<String>>,

  /// Filter by resolution, e.g. Resolved "Won't fix"
  #[arg(long, num_args = 1..)]
  pub resolution: Option<Vec<String>>,

  /// Filter by priority; P0..P4 map to Jira's Highest..Lowest
  #[arg(long, num_args = 1..)]
  pub priority: Option<Vec<String>>,

  /// Filter by severity, e.g. Blocker Critical
  #[arg(long, num_args = 1..)]
  pub severity: Option<Vec<String>>,

  /// Filter by label, e.g. must-fix-0113
  #[arg(long, num_args = 1..)]
  pub label: Option<Vec<String>>,

  /// Restrict the search to one calendar month, e.g. 2022-11
  #[arg(long)]
  pub month: Option<String>,

  /// Restrict the search to a month range, e.g. 2022-11 2023-02
  #[arg(long, num_args = 2)]
  pub duration: Option<Vec<String>>,

  /// Date window applied to changelog events, e.g. 2022-11 2023-02
  #[arg(long = "date-range", num_args = 2)]
  pub date_range: Option<Vec<String>>,

  /// Classify test-case references (valid / added / missing / other)
  #[arg(long = "testcase-check")]
  pub testcase_check: bool,

  /// Tally comment authorship as an activity measure
  #[arg(long = "active-check")]
  pub active_check: bool,

  /// Tally roster members adding this label within the date window
  #[arg(long = "label-check", value_name = "LABEL")]
  pub label_check: Option<String>,

  /// Tally actors who moved issues to Verified
  #[arg(long = "verify-check")]
  pub verify_check: bool,

  /// Capture the epic reference per issue
  #[arg(long = "epic-check")]
  pub epic_check: bool,

  /// Tally severities and compute the defect index
  #[arg(long = "di-count")]
  pub di_count: bool,

  /// Raw JQL override; bypasses filter composition entirely
  #[arg(long = "raw-jql", value_name = "JQL")]
  pub raw_jql: Option<String>,

  /// Request full change history (changelog) per issue
  #[arg(long, short = 'e')]
  pub expand: bool,

  /// Export shaped records to a CSV spreadsheet
  #[arg(long, short = 'o')]
  pub output: bool,

  /// Export file path (default: Output_Result_<timestamp>.csv in the cwd)
  #[arg(long)]
  pub out: Option<PathBuf>,

  /// Cost-days threshold above which exported rows are flagged
  #[arg(long = "cost-threshold", default_value_t = 30)]
  pub cost_threshold: i64,

  /// Print debug-level progress
  #[arg(long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

/// Immutable run configuration handed to every component. Nothing reads
/// flag state from ambient scope.
#[derive(Debug)]
pub struct EffectiveConfig {
  pub server: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub criteria: SearchCriteria,
  pub date_range: Option<DateWindow>,
  pub raw_jql: Option<String>,
  pub expand: bool,
  pub testcase_check: bool,
  pub active_check: bool,
  pub verify_check: bool,
  pub epic_check: bool,
  pub di_count: bool,
  pub label_check: Option<String>,
  pub export: bool,
  pub export_path: Option<PathBuf>,
  pub cost_threshold: i64,
  pub verbose: bool,
}

fn env_nonempty(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate the created-date selection: at most one of --month / --duration.
  let created = match (&cli.month, &cli.duration) {
    (Some(_), Some(_)) => {
      bail!("Ambiguous time selection: choose only one of --month | --duration")
    }
    (Some(ym), None) => Some(DateWindow::month(ym)?),
    (None, Some(pair)) => Some(DateWindow::from_tokens(pair)?),
    (None, None) => None,
  };

  let date_range = match &cli.date_range {
    Some(pair) => Some(DateWindow::from_tokens(pair)?),
    None => None,
  };

  let criteria = SearchCriteria {
    project_ids: cli.project_id,
    statuses: cli.status,
    reporters: cli.reporter,
    components: cli.component,
    resolutions: cli.resolution,
    priorities: cli.priority,
    severities: cli.severity,
    labels: cli.label,
    created,
  };

  // Verified/label tracking and cost derivation all read the changelog, so
  // requesting any of them implies expansion.
  let expand = cli.expand || cli.verify_check || cli.label_check.is_some() || cli.output;

  Ok(EffectiveConfig {
    server: cli.server.or_else(|| env_nonempty("JIRA_SERVER")),
    username: cli.user.or_else(|| env_nonempty("JIRA_USER")),
    password: cli.password.or_else(|| env_nonempty("JIRA_PASSWORD")),
    criteria,
    date_range,
    raw_jql: cli.raw_jql,
    expand,
    testcase_check: cli.testcase_check,
    active_check: cli.active_check,
    verify_check: cli.verify_check,
    epic_check: cli.epic_check,
    di_count: cli.di_count,
    label_check: cli.label_check,
    export: cli.output,
    export_path: cli.out,
    cost_threshold: cli.cost_threshold,
    verbose: cli.verbose,
  })
}
