//! Persisted category list.
//!
//! The ordered list of arXiv category tags drives paper selection: index 0 is
//! tried first. The list lives in a small JSON file so the scheduled notifier
//! and the slash-command receiver see the same state across processes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Categories used until a list has been written.
pub const DEFAULT_CATEGORIES: &[&str] = &["cs.AI", "cs.LG", "cs.CL"];

#[derive(Debug, Serialize, Deserialize)]
struct CategoryFile {
    tags: Vec<String>,
}

/// Reads and replaces the ordered category list on disk.
pub struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current category list, highest priority first.
    ///
    /// A missing file yields the default list; the file itself appears on the
    /// first successful `set`.
    pub fn get(&self) -> Result<Vec<String>, StoreError> {
        if !self.path.exists() {
            return Ok(DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: CategoryFile =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.tags)
    }

    /// Replace the whole list, persisting it before returning.
    ///
    /// The new list goes to a temporary sibling first and is renamed into
    /// place, so a reader sees either the old list or the new one. A rejected
    /// list leaves the stored one untouched.
    pub fn set(&self, tags: Vec<String>) -> Result<(), StoreError> {
        if tags.is_empty() {
            return Err(StoreError::EmptyList);
        }
        if tags.iter().any(|t| t.trim().is_empty()) {
            return Err(StoreError::BlankTag);
        }

        let file = CategoryFile { tags };
        let json = serde_json::to_string_pretty(&file).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e.into(),
        })?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Split a slash-command argument string into category tags.
///
/// Tags may be separated by commas, whitespace or both; empty fragments are
/// dropped. Returns an empty list for blank input.
pub fn parse_tag_list(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CategoryStore {
        CategoryStore::new(dir.path().join("config.json"))
    }

    // ==================== Store Tests ====================

    #[test]
    fn test_get_returns_defaults_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.get().unwrap(), vec!["cs.AI", "cs.LG", "cs.CL"]);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .set(vec!["cs.CV".to_string(), "cs.RO".to_string()])
            .unwrap();

        assert_eq!(store.get().unwrap(), vec!["cs.CV", "cs.RO"]);
    }

    #[test]
    fn test_set_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let tags: Vec<String> = ["cs.CL", "cs.AI", "cs.LG"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        store.set(tags.clone()).unwrap();

        assert_eq!(store.get().unwrap(), tags);
    }

    #[test]
    fn test_set_visible_to_fresh_store_instance() {
        // Another process opening the same file sees the replaced list.
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        CategoryStore::new(&path)
            .set(vec!["hep-th".to_string()])
            .unwrap();

        assert_eq!(CategoryStore::new(&path).get().unwrap(), vec!["hep-th"]);
    }

    #[test]
    fn test_set_rejects_empty_list_and_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(vec!["cs.AI".to_string()]).unwrap();

        let err = store.set(Vec::new()).unwrap_err();

        assert!(matches!(err, StoreError::EmptyList));
        assert_eq!(store.get().unwrap(), vec!["cs.AI"]);
    }

    #[test]
    fn test_set_rejects_blank_tag() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let err = store
            .set(vec!["cs.AI".to_string(), "   ".to_string()])
            .unwrap_err();

        assert!(matches!(err, StoreError::BlankTag));
    }

    #[test]
    fn test_set_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set(vec!["cs.AI".to_string()]).unwrap();

        assert!(!dir.path().join("config.tmp").exists());
    }

    #[test]
    fn test_file_format_is_tags_object() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(vec!["cs.AI".to_string()]).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["tags"][0], "cs.AI");
    }

    #[test]
    fn test_get_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.get(), Err(StoreError::Parse { .. })));
    }

    // ==================== Tag Parsing Tests ====================

    #[test]
    fn test_parse_comma_separated() {
        assert_eq!(parse_tag_list("cs.AI, cs.CL, cs.CV"), vec!["cs.AI", "cs.CL", "cs.CV"]);
    }

    #[test]
    fn test_parse_whitespace_separated() {
        assert_eq!(parse_tag_list("cs.AI cs.CL"), vec!["cs.AI", "cs.CL"]);
    }

    #[test]
    fn test_parse_mixed_separators_and_empties() {
        assert_eq!(
            parse_tag_list(" cs.AI,, cs.CL  cs.CV ,"),
            vec!["cs.AI", "cs.CL", "cs.CV"]
        );
    }

    #[test]
    fn test_parse_blank_input() {
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list("  , ,  ").is_empty());
    }
}
