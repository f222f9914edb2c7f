//! Canned-page builders shared by the binary tests. Pages are passed to the
//! binary through the `JPR_TEST_PAGES_JSON` environment variable.

#[allow(dead_code)]
pub const PAGES_ENV: &str = "JPR_TEST_PAGES_JSON";

#[allow(dead_code)]
pub fn page(issues: Vec<serde_json::Value>) -> serde_json::Value {
  serde_json::json!({ "issues": issues })
}

#[allow(dead_code)]
pub fn pages_json(pages: Vec<serde_json::Value>) -> String {
  serde_json::Value::Array(pages).to_string()
}

#[allow(dead_code)]
pub fn basic_issue(key: &str, priority: &str) -> serde_json::Value {
  serde_json::json!({
    "key": key,
    "fields": {
      "priority": { "name": priority },
      "status": { "name": "Open" },
      "created": "2023-01-05T09:30:00.000+0800",
    }
  })
}

/// Issue carrying a finish-date changelog entry, suitable for export runs.
#[allow(dead_code)]
pub fn finished_issue(key: &str, priority: &str, finish: &str) -> serde_json::Value {
  serde_json::json!({
    "key": key,
    "fields": {
      "priority": { "name": priority },
      "status": { "name": "Resolved" },
      "created": "2023-01-05T09:30:00.000+0800",
      "updated": "2023-02-01T10:00:00.000+0800",
      "customfield_10107": [ { "value": "Android P" } ],
      "assignee": { "name": "san.zhang" },
    },
    "changelog": { "histories": [ {
      "created": "2023-01-20T10:00:00.000+0800",
      "author": { "name": "si.li" },
      "items": [ {
        "field": "Finish date (WBSGantt)",
        "fromString": null,
        "toString": finish,
        "to": finish,
      } ]
    } ] }
  })
}
