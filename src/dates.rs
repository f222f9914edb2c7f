use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` pair of calendar dates, built from `YYYY-MM` tokens.
///
/// A single token covers the whole month; a pair covers day 1 of the first
/// month through the last day of the second. Construction order guarantees
/// `start <= end` is checked up front rather than discovered mid-run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateWindow {
  /// Window for one calendar month, e.g. `"2022-11"`.
  pub fn month(ym: &str) -> Result<Self> {
    let (y, m) = parse_year_month(ym)?;
    let start = NaiveDate::from_ymd_opt(y, m, 1).expect("validated year-month");
    let end = NaiveDate::from_ymd_opt(y, m, last_day_of_month(y, m)).expect("validated year-month");

    Ok(Self { start, end })
  }

  /// Window spanning two months, e.g. `"2022-11"` through `"2023-02"`.
  pub fn range(start_ym: &str, end_ym: &str) -> Result<Self> {
    let start = Self::month(start_ym)?.start;
    let end = Self::month(end_ym)?.end;

    if start > end {
      bail!("invalid date spec: start {start_ym} is after end {end_ym}");
    }

    Ok(Self { start, end })
  }

  /// Parse one or two space-separated `YYYY-MM` tokens.
  pub fn from_tokens(tokens: &[String]) -> Result<Self> {
    match tokens {
      [ym] => Self::month(ym),
      [s, e] => Self::range(s, e),
      _ => bail!(
        "invalid date spec: expected one or two YYYY-MM tokens, got {}",
        tokens.len()
      ),
    }
  }

  /// Boundaries are inclusive on both ends.
  pub fn contains(&self, day: NaiveDate) -> bool {
    self.start <= day && day <= self.end
  }
}

fn parse_year_month(token: &str) -> Result<(i32, u32)> {
  let Some((ys, ms)) = token.trim().trim_end_matches(',').split_once('-') else {
    bail!("invalid date spec {token:?}: expected YYYY-MM");
  };

  let y: i32 = ys
    .parse()
    .with_context(|| format!("invalid date spec {token:?}: bad year"))?;
  let m: u32 = ms
    .parse()
    .with_context(|| format!("invalid date spec {token:?}: bad month"))?;

  if !(1..=12).contains(&m) {
    bail!("invalid date spec {token:?}: month out of range");
  }

  Ok((y, m))
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
  // First of next month, minus one day. Leap years fall out of the calendar.
  let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
  NaiveDate::from_ymd_opt(ny, nm, 1)
    .and_then(|d| d.pred_opt())
    .map(|d| chrono::Datelike::day(&d))
    .expect("month in 1..=12")
}
