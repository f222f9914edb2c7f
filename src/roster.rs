use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Product-QA roster used to restrict the verified and label tallies.
/// Entries are in normalized form (see `util::normalize_name`), so lookups
/// must normalize first.
static QA_ROSTER: Lazy<HashSet<&'static str>> = Lazy::new(|| {
  [
    // SZ
    "San.Zhang",
    "Si.Li",
    "Wu.Wang",
    "Liu.Zhao",
    "Qi.Sun",
    "Ba.Zhou",
    "Jiu.Wu",
    "Shi.Zheng",
    // BJ
    "Yi.Chen",
    "Er.Lin",
    "Lan.Huang",
    "Hong.Gao",
    "Mei.Xu",
    "Xue.Song",
    // SH
    "Tracy.Chen",
    "Hai.Liu",
    "Yue.Xu",
    "Qian.Liu",
  ]
  .into_iter()
  .collect()
});

/// Membership test against the fixed roster. `name` must already be in
/// normalized form.
pub fn is_qa_member(name: &str) -> bool {
  QA_ROSTER.contains(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn roster_membership_is_exact() {
    assert!(is_qa_member("San.Zhang"));
    assert!(!is_qa_member("san.zhang"));
    assert!(!is_qa_member("Nobody.Here"));
  }
}
