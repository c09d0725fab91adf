//! Whole-file JSON document persistence for follow-relay.
//!
//! A [`JsonStore`] addresses a single named document (`<dir>/<name>.json`).
//! Documents are always read in full and rewritten in full; there is no
//! merging, appending or schema versioning.

#![forbid(unsafe_code)]

pub mod error;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

pub use error::{PersistError, Result};

/// Indentation used for every persisted document.
const INDENT: &[u8] = b"    ";

/// A single JSON document stored in a state directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    name: String,
}

impl JsonStore {
    /// Create a store for the document `name` inside `dir`.
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(format!("{name}.json")),
            name: name.to_string(),
        }
    }

    /// The document name (file stem).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file currently exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the document.
    ///
    /// Returns [`PersistError::NotFound`] when the file is absent.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PersistError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value = serde_json::from_str(&content).map_err(|e| PersistError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        debug!(document = %self.name, "loaded document");
        Ok(value)
    }

    /// Load the document, creating it from `T::default()` if it does not exist.
    ///
    /// A freshly created default is written to disk before returning, so the
    /// document always exists after this call succeeds.
    pub fn load_or_init<T>(&self) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        match self.load() {
            Ok(value) => Ok(value),
            Err(PersistError::NotFound { .. }) => {
                let value = T::default();
                self.save(&value)?;
                info!(document = %self.name, path = %self.path.display(), "created default document");
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }

    /// Serialize `value` and overwrite the document.
    ///
    /// The file is written as UTF-8 with four-space indentation. Content goes
    /// to a sibling temp file first and is then renamed over the target.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        let bytes = to_pretty_json(value)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| PersistError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(document = %self.name, bytes = bytes.len(), "saved document");
        Ok(())
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        items: Vec<String>,
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path(), "missing");
        let err = store.load::<Doc>().unwrap_err();
        assert!(err.is_not_found());
        assert!(!store.exists());
    }

    #[test]
    fn test_load_or_init_persists_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path(), "fresh");

        let doc: Doc = store.load_or_init().expect("init");
        assert_eq!(doc, Doc::default());
        assert!(store.exists());
        assert_eq!(store.path(), dir.path().join("fresh.json"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path(), "doc");
        let doc = Doc {
            items: vec!["重要通知".to_string(), "urgent".to_string()],
        };

        store.save(&doc).expect("save");
        let loaded: Doc = store.load().expect("load");
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_save_uses_four_space_indent_and_raw_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path(), "doc");
        store
            .save(&Doc {
                items: vec!["关键词".to_string()],
            })
            .expect("save");

        let text = fs::read_to_string(store.path()).expect("read");
        assert_eq!(text, "{\n    \"items\": [\n        \"关键词\"\n    ]\n}");
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path(), "doc");
        store
            .save(&Doc {
                items: vec!["a".to_string(), "b".to_string()],
            })
            .expect("save");
        store.save(&Doc::default()).expect("save again");

        let loaded: Doc = store.load().expect("load");
        assert!(loaded.items.is_empty());
        assert!(!dir.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_document_is_reported_not_replaced() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path(), "doc");
        fs::write(store.path(), "{ not json").expect("write");

        let err = store.load_or_init::<Doc>().unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { .. }));
        let text = fs::read_to_string(store.path()).expect("read");
        assert_eq!(text, "{ not json");
    }

    #[test]
    fn test_save_creates_state_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("state").join("follow");
        let store = JsonStore::new(&nested, "doc");
        store.save(&Doc::default()).expect("save");
        assert!(store.exists());
    }
}
