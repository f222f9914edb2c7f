// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Ergonomic nested JSON fetching via dotted paths (object keys and array indices) with typed extraction
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper for typed extraction with defaults
// invariants: No panics; missing paths yield None; to_or_default returns T::default on failure
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  /// Attempt to deserialize the fetched value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Deserialize as `T`, returning `T::default()` on failure.
  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// The fetched value itself, when present.
  pub fn value(&self) -> Option<&'a serde_json::Value> {
    self.inner
  }
}

/// Extension to fetch nested values via dotted paths like `"fields.assignee.name"`.
///
/// A numeric segment indexes into an array, so `"fields.components.0.name"`
/// reaches the first component's name. Jira stores several custom fields as
/// single-element arrays, which makes index segments part of normal paths here.
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      let next = match cur {
        serde_json::Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => cur.get(key),
      };

      match next {
        Some(v) => cur = v,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fetch_top_level_and_nested() {
    let v: serde_json::Value = serde_json::json!({
      "key": "TV-64205",
      "fields": { "assignee": { "name": "san.zhang" } },
      "nums": [1,2,3]
    });

    assert_eq!(v.fetch("key").to::<String>().as_deref(), Some("TV-64205"));
    assert_eq!(v.fetch("fields.assignee.name").to::<String>().as_deref(), Some("san.zhang"));
    assert_eq!(v.fetch("missing").to::<String>(), None);
    assert!(v.fetch("").to::<serde_json::Value>().is_some());
  }

  #[test]
  fn fetch_array_index_segments() {
    let v: serde_json::Value = serde_json::json!({
      "fields": {
        "components": [ { "name": "HDMI" }, { "name": "Dolby Vision" } ],
        "customfield_10107": [ { "value": "TV reference" } ]
      }
    });

    assert_eq!(v.fetch("fields.components.0.name").to::<String>().as_deref(), Some("HDMI"));
    assert_eq!(
      v.fetch("fields.customfield_10107.0.value").to::<String>().as_deref(),
      Some("TV reference")
    );
    assert_eq!(v.fetch("fields.components.7.name").to::<String>(), None);
  }

  #[test]
  fn fetch_to_or_default() {
    let v: serde_json::Value = serde_json::json!({});
    let s: String = v.fetch("nope").to_or_default();
    assert_eq!(s, "");
  }
}
