use console::style;

use crate::aggregate::Tally;
use crate::roster::is_qa_member;

/// Most entries a chart will print; everything past this is summarized.
const MAX_ROWS: usize = 36;

/// Widest bar, in glyphs, for the largest count on the chart.
const BAR_WIDTH: u64 = 40;

/// Print a horizontal bar chart of a tally to stdout, largest first.
/// Roster members are marked with a leading `*`.
pub fn print_tally(title: &str, tally: &Tally) {
  println!();
  println!("{}", style(title).bold());

  if tally.is_empty() {
    println!("  (no entries)");
    return;
  }

  let rows = tally.sorted_desc();
  let shown = &rows[..rows.len().min(MAX_ROWS)];
  let total = tally.total();
  let max = shown.first().map(|(_, count)| *count).unwrap_or(1).max(1);
  let label_width = shown
    .iter()
    .map(|(name, _)| name.chars().count())
    .max()
    .unwrap_or(0);

  for (name, count) in shown {
    let mark = if is_qa_member(name) { "*" } else { " " };
    let bar_len = (count * BAR_WIDTH).div_ceil(max) as usize;
    let bar = "▇".repeat(bar_len.max(1));
    let pct = *count as f64 * 100.0 / total as f64;
    let label = format!("{mark}{name:<label_width$}");
    if is_qa_member(name) {
      println!("  {} {} {count} ({pct:.1}%)", style(label).green(), bar);
    } else {
      println!("  {label} {bar} {count} ({pct:.1}%)");
    }
  }

  if rows.len() > shown.len() {
    let hidden: u64 = rows[shown.len()..].iter().map(|(_, count)| count).sum();
    println!("  ... {} more ({hidden})", rows.len() - shown.len());
  }

  println!("  total: {total}");
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn caps_visible_rows() {
    let mut tally = Tally::default();
    for i in 0..50 {
      tally.add(format!("author{i:02}"));
    }
    let rows = tally.sorted_desc();
    assert_eq!(rows.len(), 50);
    assert_eq!(rows.len().min(MAX_ROWS), 36);
  }

  #[test]
  fn prints_without_panicking_on_empty_and_populated() {
    print_tally("verified", &Tally::default());

    let mut tally = Tally::default();
    tally.add("San.Zhang");
    tally.add("San.Zhang");
    tally.add("Outsider");
    print_tally("verified", &tally);
  }
}
