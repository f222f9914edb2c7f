use crate::dates::DateWindow;

/// Ordering applied to every composed query.
const SORT_RULE: &str = "ORDER BY created DESC";

/// Shorthand priorities accepted on the command line, mapped to the names
/// Jira itself uses. Unrecognized tokens pass through untouched so callers
/// can also hand over the Jira names directly.
const PRIORITY_ALIASES: &[(&str, &str)] = &[
  ("P0", "Highest"),
  ("P1", "High"),
  ("P2", "Medium"),
  ("P3", "Low"),
  ("P4", "Lowest"),
];

/// The optional, independently specified search constraints. Every populated
/// field is a non-empty token list; absent fields stay out of the composed
/// query entirely.
#[derive(Clone, Debug, Default)]
pub struct SearchCriteria {
  pub project_ids: Option<Vec<String>>,
  pub statuses: Option<Vec<String>>,
  pub reporters: Option<Vec<String>>,
  pub components: Option<Vec<String>>,
  pub resolutions: Option<Vec<String>>,
  pub priorities: Option<Vec<String>>,
  pub severities: Option<Vec<String>>,
  pub labels: Option<Vec<String>>,
  pub created: Option<DateWindow>,
}

impl SearchCriteria {
  /// Compose the JQL filter string. Clauses are collected and joined, so an
  /// absent criterion can never leave a dangling `AND` behind.
  pub fn compose(&self) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(values) = &self.project_ids {
      clauses.push(in_clause("\"project id\"", values));
    }
    if let Some(values) = &self.statuses {
      clauses.push(in_clause("status", values));
    }
    if let Some(values) = &self.reporters {
      clauses.push(in_clause("reporter", values));
    }
    if let Some(values) = &self.components {
      clauses.push(in_clause("component", values));
    }
    if let Some(values) = &self.resolutions {
      clauses.push(in_clause("resolution", values));
    }
    if let Some(values) = &self.priorities {
      let mapped: Vec<String> = values.iter().map(|p| map_priority(p)).collect();
      clauses.push(in_clause("priority", &mapped));
    }
    if let Some(values) = &self.severities {
      clauses.push(in_clause("severity", values));
    }
    if let Some(values) = &self.labels {
      clauses.push(in_clause("labels", values));
    }
    if let Some(window) = &self.created {
      clauses.push(format!(
        "created >= {} AND created <= {}",
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d")
      ));
    }

    if clauses.is_empty() {
      SORT_RULE.to_string()
    } else {
      format!("{} {}", clauses.join(" AND "), SORT_RULE)
    }
  }
}

fn in_clause(field: &str, values: &[String]) -> String {
  format!("{} in ({})", field, values.join(","))
}

fn map_priority(token: &str) -> String {
  PRIORITY_ALIASES
    .iter()
    .find(|(alias, _)| *alias == token)
    .map(|(_, name)| name.to_string())
    .unwrap_or_else(|| token.to_string())
}
