// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small helpers shared across the pipeline: Jira timestamp parsing, actor-name normalization, export file naming, man page rendering
// role: utilities/helpers
// inputs: Jira timestamp strings; actor identifiers; DateTime; clap CommandFactory
// outputs: NaiveDateTime/NaiveDate values, normalized names, timestamped file names, man page text
// invariants:
// - parse helpers never panic; malformed input yields None
// - normalize_name is idempotent
// errors: render_man_page bubbles IO errors; parse helpers are Option-returning by design
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use clap::CommandFactory;

/// Parse a Jira timestamp such as `2023-02-13T11:50:52.889+0800` into a naive
/// local datetime. Fractional seconds and the offset suffix are dropped; Jira
/// reports everything in the server's zone and the tool compares like with like.
pub fn parse_jira_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let (date_part, rest) = raw.split_once('T')?;
  let time_part = rest.split(['.', '+', '-', 'Z']).next()?;
  NaiveDateTime::parse_from_str(&format!("{date_part} {time_part}"), "%Y-%m-%d %H:%M:%S").ok()
}

/// Parse a bare `YYYY-MM-DD` value, as found in changelog finish-date entries.
pub fn parse_jira_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Normalize an actor identifier for display and roster lookup.
///
/// `first.last` becomes `First.Last`. Values carrying a hyphen are version
/// strings, not names (`Android P-9.0`), and are truncated at the hyphen.
pub fn normalize_name(name: &str) -> String {
  if let Some((front, _)) = name.split_once('-') {
    return front.to_string();
  }

  if name.contains('.') {
    let mut parts = name.split('.');
    let front = capitalize(parts.next().unwrap_or(""));
    let back = capitalize(parts.last().unwrap_or(""));
    return format!("{front}.{back}");
  }

  name.to_string()
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

/// Default export file name, stamped with the run's start time.
pub fn default_export_name(now: DateTime<Local>) -> String {
  format!("Output_Result_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
