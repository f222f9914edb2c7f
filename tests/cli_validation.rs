use assert_cmd::Command;
use predicates::prelude::*;
mod common;

#[test]
fn rejects_malformed_month() {
  let mut cmd = Command::cargo_bin("jira-project-report").unwrap();
  cmd.args(["--month", "2023-13"]);
  cmd.env(common::PAGES_ENV, common::pages_json(vec![]));
  cmd
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid date spec"));
}

#[test]
fn rejects_month_combined_with_duration() {
  let mut cmd = Command::cargo_bin("jira-project-report").unwrap();
  cmd.args(["--month", "2023-01", "--duration", "2023-01", "2023-02"]);
  cmd.env(common::PAGES_ENV, common::pages_json(vec![]));
  let out = cmd.output().unwrap();
  assert!(!out.status.success());
  let err = String::from_utf8_lossy(&out.stderr);
  assert!(err.contains("--month") && err.contains("--duration"));
}

#[test]
fn rejects_reversed_date_range() {
  let mut cmd = Command::cargo_bin("jira-project-report").unwrap();
  cmd.args(["--date-range", "2023-03", "2023-01"]);
  cmd.env(common::PAGES_ENV, common::pages_json(vec![]));
  let out = cmd.output().unwrap();
  assert!(!out.status.success());
}

#[test]
fn http_path_requires_credentials() {
  // No canned pages, no server, no env credentials: the real client refuses.
  let mut cmd = Command::cargo_bin("jira-project-report").unwrap();
  cmd.env_remove("JIRA_SERVER");
  cmd.env_remove("JIRA_USER");
  cmd.env_remove("JIRA_PASSWORD");
  cmd.env_remove(common::PAGES_ENV);
  let out = cmd.output().unwrap();
  assert!(!out.status.success());
  let err = String::from_utf8_lossy(&out.stderr);
  assert!(err.contains("server"));
}

#[test]
fn gen_man_emits_roff() {
  let mut cmd = Command::cargo_bin("jira-project-report").unwrap();
  cmd.arg("--gen-man");
  let out = cmd.output().unwrap();
  assert!(out.status.success());
  let page = String::from_utf8_lossy(&out.stdout);
  assert!(page.contains(".TH"));
}
