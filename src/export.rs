// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Write retained issue records to a CSV worksheet with a fixed column layout
// role: io/sink
// inputs: Retained records, destination path (explicit or timestamp-derived), cost threshold
// outputs: CSV file on disk; a warning per row at or above the cost threshold
// invariants:
// - Header row is always written, even for an empty record set
// - Rows appear in retention order with a 1-based index column
// - Absent optional fields render as empty cells
// errors: I/O and CSV failures propagate with the destination path attached
// tie_breakers: contracts > correctness > io > performance
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::cli::EffectiveConfig;
use crate::model::IssueRecord;
use crate::util;

const HEADER: [&str; 13] = [
  "Index",
  "Product Line",
  "Project ID",
  "Issue Key",
  "Component",
  "Status",
  "Priority",
  "Assignee",
  "Manager",
  "Created",
  "Updated",
  "Finish date",
  "Cost Time",
];

/// Resolve the destination path: explicit `--out` wins, otherwise a
/// timestamped name in the working directory.
pub fn destination(cfg: &EffectiveConfig) -> PathBuf {
  cfg
    .export_path
    .clone()
    .unwrap_or_else(|| PathBuf::from(util::default_export_name(chrono::Local::now())))
}

pub fn write_csv(cfg: &EffectiveConfig, records: &[IssueRecord], path: &Path) -> Result<()> {
  let mut writer = csv::Writer::from_path(path)
    .with_context(|| format!("cannot create export file {}", path.display()))?;

  writer.write_record(HEADER)?;

  for (index, rec) in records.iter().enumerate() {
    let cost = rec.cost_days.unwrap_or(0);
    if cost >= cfg.cost_threshold {
      warn!("{}: cost {cost} days exceeds threshold {}", rec.key, cfg.cost_threshold);
    }

    writer.write_record([
      (index + 1).to_string(),
      rec.product.clone().unwrap_or_default(),
      rec.project_id.clone().unwrap_or_default(),
      rec.key.clone(),
      rec.component.clone().unwrap_or_default(),
      rec.status.clone().unwrap_or_default(),
      rec.priority.clone(),
      rec.assignee.clone().unwrap_or_default(),
      rec.manager.clone().unwrap_or_default(),
      date_cell(rec.created.map(|t| t.date())),
      date_cell(rec.updated.map(|t| t.date())),
      date_cell(rec.finish_date),
      rec.cost_days.map(|d| d.to_string()).unwrap_or_default(),
    ])?;
  }

  writer
    .flush()
    .with_context(|| format!("cannot flush export file {}", path.display()))?;

  info!("saved {} rows to {}", records.len(), path.display());
  Ok(())
}

fn date_cell(date: Option<NaiveDate>) -> String {
  date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}
