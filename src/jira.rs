// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Jira search endpoint access behind a trait seam (real HTTP client and env-backed test double)
// role: service/jira-api
// inputs: Base URL and credentials from EffectiveConfig; env JPR_TEST_PAGES_JSON for the test double
// outputs: Raw search-page JSON values
// side_effects: Network calls to the Jira REST API
// invariants:
// - One agent with a fixed timeout per run
// - Service and transport errors are fatal to the caller; no retry here
// errors: Surfaced with the failing offset and HTTP detail via anyhow context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{Context, Result, bail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::debug;

use crate::cli::EffectiveConfig;

/// Env var holding a JSON array of canned search pages; when present, the
/// test double replaces the HTTP client entirely.
pub const TEST_PAGES_ENV: &str = "JPR_TEST_PAGES_JSON";

/// Seam over the search endpoint so the pipeline can run against canned
/// pages in tests.
pub trait JiraApi {
  /// One page of `/rest/api/2/search` for the given JQL and offset.
  fn search(
    &self,
    jql: &str,
    start_at: usize,
    max_results: usize,
    fields: &[String],
    expand_changelog: bool,
  ) -> Result<serde_json::Value>;
}

/// Pick the env-backed double when canned pages are configured, otherwise a
/// real client (which requires server and credentials).
pub fn select_api(cfg: &EffectiveConfig) -> Result<Box<dyn JiraApi>> {
  if std::env::var(TEST_PAGES_ENV).is_ok() {
    return Ok(Box::new(EnvJiraApi));
  }
  Ok(Box::new(HttpJiraApi::new(cfg)?))
}

pub struct HttpJiraApi {
  agent: ureq::Agent,
  base_url: String,
  auth_header: String,
}

impl HttpJiraApi {
  pub fn new(cfg: &EffectiveConfig) -> Result<Self> {
    let Some(server) = &cfg.server else {
      bail!("no Jira server configured; pass --server or set JIRA_SERVER");
    };
    let (Some(user), Some(password)) = (&cfg.username, &cfg.password) else {
      bail!("missing credentials; pass --user/--password or set JIRA_USER/JIRA_PASSWORD");
    };

    let agent = ureq::AgentBuilder::new()
      .timeout(Duration::from_secs(300))
      .build();
    let auth_header = format!("Basic {}", B64.encode(format!("{user}:{password}")));

    Ok(Self {
      agent,
      base_url: server.trim_end_matches('/').to_string(),
      auth_header,
    })
  }
}

impl JiraApi for HttpJiraApi {
  fn search(
    &self,
    jql: &str,
    start_at: usize,
    max_results: usize,
    fields: &[String],
    expand_changelog: bool,
  ) -> Result<serde_json::Value> {
    let url = format!("{}/rest/api/2/search", self.base_url);
    let mut body = serde_json::json!({
      "jql": jql,
      "startAt": start_at,
      "maxResults": max_results,
      "fields": fields,
    });
    if expand_changelog {
      body["expand"] = serde_json::json!(["changelog"]);
    }

    debug!("POST {url} startAt={start_at}");

    let response = self
      .agent
      .post(&url)
      .set("Accept", "application/json")
      .set("Content-Type", "application/json")
      .set("Authorization", &self.auth_header)
      .send_json(body)
      .with_context(|| format!("search request failed at offset {start_at}"))?;

    response
      .into_json::<serde_json::Value>()
      .with_context(|| format!("search response at offset {start_at} is not JSON"))
  }
}

/// Test double reading canned pages from the environment. Offsets past the
/// canned set behave like an exhausted search.
pub struct EnvJiraApi;

impl JiraApi for EnvJiraApi {
  fn search(
    &self,
    _jql: &str,
    start_at: usize,
    max_results: usize,
    _fields: &[String],
    _expand_changelog: bool,
  ) -> Result<serde_json::Value> {
    let raw = std::env::var(TEST_PAGES_ENV).context("canned pages env var vanished")?;
    let pages: Vec<serde_json::Value> = serde_json::from_str(&raw).context("canned pages are not a JSON array")?;

    let index = start_at / max_results.max(1);
    Ok(
      pages
        .get(index)
        .cloned()
        .unwrap_or_else(|| serde_json::json!({ "issues": [] })),
    )
  }
}
