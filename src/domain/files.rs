//! Virtual file collections and the boundary normalizer.
//!
//! A project's files exist in two equivalent shapes:
//! - keyed: `path -> {code, hidden}`, which the editor addresses files by
//! - listed: `[{path, code, hidden}]`, which is what gets persisted
//!
//! Incoming payloads may use either shape, so they are decoded into
//! [`FilesPayload`] first and only then converted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Entry file opened when nothing better is available
pub const DEFAULT_ENTRY_PATH: &str = "/src/App.js";

/// Bundler entry point
pub const INDEX_ENTRY_PATH: &str = "/src/index.js";

/// Paths that can never be deleted
pub const PROTECTED_PATHS: [&str; 2] = [DEFAULT_ENTRY_PATH, INDEX_ENTRY_PATH];

/// Top-level folder every user file lives under
pub const SOURCE_ROOT: &str = "src";

/// Content of a single file, addressed by its path in a [`FileCollection`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecord {
  pub code: String,
  pub hidden: bool,
}

impl FileRecord {
  pub fn new(code: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      hidden: false,
    }
  }

  pub fn hidden(code: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      hidden: true,
    }
  }
}

/// Listed-form element, the persisted shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
  pub path: String,
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub hidden: bool,
}

/// Keyed form. Ordered by path so "first file" is deterministic.
pub type FileCollection = BTreeMap<String, FileRecord>;

/// Directory markers are ordinary entries whose path ends with a separator
pub fn is_directory_marker(path: &str) -> bool {
  path.ends_with('/')
}

pub fn is_protected(path: &str) -> bool {
  PROTECTED_PATHS.contains(&path)
}

/// First path that is neither hidden nor a directory marker
pub fn first_visible_file(files: &FileCollection) -> Option<&str> {
  files
    .iter()
    .find(|(path, record)| !record.hidden && !is_directory_marker(path))
    .map(|(path, _)| path.as_str())
}

pub fn to_listed(files: &FileCollection) -> Vec<FileEntry> {
  files
    .iter()
    .map(|(path, record)| FileEntry {
      path: path.clone(),
      code: record.code.clone(),
      hidden: record.hidden,
    })
    .collect()
}

/// Listed form as a JSON array, ready to send as a `files` field
pub fn listed_to_value(entries: &[FileEntry]) -> Value {
  Value::Array(
    entries
      .iter()
      .map(|e| serde_json::json!({ "path": e.path, "code": e.code, "hidden": e.hidden }))
      .collect(),
  )
}

/// Later entries win when a path repeats.
pub fn from_listed(entries: impl IntoIterator<Item = FileEntry>) -> FileCollection {
  entries
    .into_iter()
    .map(|entry| {
      (
        entry.path,
        FileRecord {
          code: entry.code,
          hidden: entry.hidden,
        },
      )
    })
    .collect()
}

/// A `files` field as it arrived over the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum FilesPayload {
  Listed(Vec<FileEntry>),
  Keyed(FileCollection),
  Unrecognized,
}

impl FilesPayload {
  /// Decode an arbitrary JSON value. Never fails: shapes that are neither a
  /// list nor a mapping become [`FilesPayload::Unrecognized`].
  pub fn from_value(value: &Value) -> Self {
    match value {
      Value::Array(items) => Self::Listed(dedup_listed(
        items.iter().filter_map(listed_entry).collect(),
      )),
      Value::Object(map) => Self::Keyed(
        map
          .iter()
          .map(|(path, meta)| (path.clone(), keyed_record(meta)))
          .collect(),
      ),
      _ => Self::Unrecognized,
    }
  }

  pub fn is_recognized(&self) -> bool {
    !matches!(self, Self::Unrecognized)
  }

  /// Canonical storage form. Unrecognized input yields an empty list.
  pub fn into_listed(self) -> Vec<FileEntry> {
    match self {
      Self::Listed(entries) => entries,
      Self::Keyed(files) => to_listed(&files),
      Self::Unrecognized => Vec::new(),
    }
  }

  pub fn into_keyed(self) -> FileCollection {
    match self {
      Self::Listed(entries) => from_listed(entries),
      Self::Keyed(files) => files,
      Self::Unrecognized => FileCollection::new(),
    }
  }
}

impl From<Vec<FileEntry>> for FilesPayload {
  fn from(entries: Vec<FileEntry>) -> Self {
    Self::Listed(dedup_listed(entries))
  }
}

impl From<FileCollection> for FilesPayload {
  fn from(files: FileCollection) -> Self {
    Self::Keyed(files)
  }
}

fn listed_entry(item: &Value) -> Option<FileEntry> {
  let obj = item.as_object()?;
  let Some(path) = obj.get("path").and_then(Value::as_str) else {
    tracing::warn!("Dropping file entry without a string path");
    return None;
  };
  Some(FileEntry {
    path: path.to_string(),
    code: obj
      .get("code")
      .and_then(Value::as_str)
      .unwrap_or_default()
      .to_string(),
    hidden: obj.get("hidden").and_then(Value::as_bool).unwrap_or(false),
  })
}

fn keyed_record(meta: &Value) -> FileRecord {
  match meta {
    Value::String(code) => FileRecord::new(code.clone()),
    Value::Object(obj) => FileRecord {
      code: obj
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string(),
      hidden: obj.get("hidden").and_then(Value::as_bool).unwrap_or(false),
    },
    _ => FileRecord::default(),
  }
}

/// Keep first-occurrence order, let the last duplicate supply the content.
fn dedup_listed(entries: Vec<FileEntry>) -> Vec<FileEntry> {
  let mut out: Vec<FileEntry> = Vec::with_capacity(entries.len());
  let mut index: HashMap<String, usize> = HashMap::with_capacity(entries.len());
  for entry in entries {
    match index.get(&entry.path) {
      Some(&at) => out[at] = entry,
      None => {
        index.insert(entry.path.clone(), out.len());
        out.push(entry);
      }
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::collections::BTreeSet;

  fn triples(entries: &[FileEntry]) -> BTreeSet<(String, String, bool)> {
    entries
      .iter()
      .map(|e| (e.path.clone(), e.code.clone(), e.hidden))
      .collect()
  }

  #[test]
  fn test_keyed_string_value_is_code_shorthand() {
    let payload = FilesPayload::from_value(&json!({ "/a": "abc" }));
    assert_eq!(
      payload.into_listed(),
      vec![FileEntry {
        path: "/a".into(),
        code: "abc".into(),
        hidden: false,
      }]
    );
  }

  #[test]
  fn test_keyed_object_value_keeps_fields() {
    let payload = FilesPayload::from_value(&json!({
      "/src/index.js": { "code": "render()", "hidden": true },
      "/src/empty.js": null,
    }));
    let files = payload.into_keyed();
    assert_eq!(files["/src/index.js"], FileRecord::hidden("render()"));
    assert_eq!(files["/src/empty.js"], FileRecord::default());
  }

  #[test]
  fn test_unrecognized_shapes_become_empty() {
    for value in [json!(null), json!(42), json!("x"), json!(true)] {
      let payload = FilesPayload::from_value(&value);
      assert!(!payload.is_recognized(), "{value} should be unrecognized");
      assert!(payload.into_listed().is_empty());
    }
  }

  #[test]
  fn test_listed_passes_through_with_defaults() {
    let payload = FilesPayload::from_value(&json!([
      { "path": "/src/App.js", "code": "app" },
      { "path": "/src/index.js", "code": "idx", "hidden": true },
      { "code": "orphan" },
      "not an entry",
    ]));
    let listed = payload.into_listed();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].path, "/src/App.js");
    assert!(!listed[0].hidden);
    assert!(listed[1].hidden);
  }

  #[test]
  fn test_listed_duplicates_last_wins() {
    let payload = FilesPayload::from_value(&json!([
      { "path": "/a", "code": "one" },
      { "path": "/b", "code": "two" },
      { "path": "/a", "code": "three" },
    ]));
    let listed = payload.into_listed();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].path, "/a");
    assert_eq!(listed[0].code, "three");
  }

  #[test]
  fn test_large_listed_payload_dedups_in_order() {
    let mut items: Vec<Value> = (0..60_000)
      .map(|i| json!({ "path": format!("/p{i}"), "code": "x" }))
      .collect();
    items.push(json!({ "path": "/p0", "code": "last" }));

    let started = std::time::Instant::now();
    let listed = FilesPayload::from_value(&Value::Array(items)).into_listed();
    assert!(started.elapsed() < std::time::Duration::from_secs(5));

    assert_eq!(listed.len(), 60_000);
    assert_eq!(listed[0].path, "/p0");
    assert_eq!(listed[0].code, "last");
    assert_eq!(listed[59_999].path, "/p59999");
  }

  #[test]
  fn test_round_trip_is_idempotent() {
    let listed = vec![
      FileEntry {
        path: "/src/z.js".into(),
        code: "z".into(),
        hidden: false,
      },
      FileEntry {
        path: "/src/index.js".into(),
        code: "i".into(),
        hidden: true,
      },
      FileEntry {
        path: "/src/lib/".into(),
        code: String::new(),
        hidden: false,
      },
    ];
    let again = to_listed(&from_listed(listed.clone()));
    assert_eq!(triples(&again), triples(&listed));
    assert_eq!(to_listed(&from_listed(again.clone())), again);
  }

  #[test]
  fn test_listed_value_decodes_back() {
    let listed = vec![FileEntry {
      path: "/src/App.js".into(),
      code: "app".into(),
      hidden: true,
    }];
    assert_eq!(
      FilesPayload::from_value(&listed_to_value(&listed)),
      FilesPayload::Listed(listed)
    );
  }

  #[test]
  fn test_first_visible_skips_hidden_and_directories() {
    let mut files = FileCollection::new();
    files.insert("/src/".into(), FileRecord::default());
    files.insert("/src/a.js".into(), FileRecord::hidden("a"));
    files.insert("/src/b.js".into(), FileRecord::new("b"));
    assert_eq!(first_visible_file(&files), Some("/src/b.js"));

    files.remove("/src/b.js");
    assert_eq!(first_visible_file(&files), None);
  }
}
