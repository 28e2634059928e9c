//! Results produced by an organization run.

use crate::file_category::Category;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One file that was moved.
#[derive(Debug, Clone, Serialize)]
pub struct MoveRecord {
    /// The file's name in the root folder.
    pub file_name: String,
    /// Where the file ended up.
    pub destination: PathBuf,
    pub category: Category,
    /// True when the name was already taken and a numeric suffix was added.
    pub renamed: bool,
}

/// One file that could not be moved. The file is left where it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub error: String,
}

/// Summary of a single run over a root folder.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Regular files found in the root, including excluded and failed ones.
    pub total_files: usize,
    /// Files moved, per category. Categories with no moves are absent.
    pub category_counts: BTreeMap<Category, usize>,
    pub moves: Vec<MoveRecord>,
    /// Files left in place by the filter configuration.
    pub excluded: Vec<String>,
    pub failures: Vec<FileFailure>,
}

impl ScanResult {
    pub(crate) fn new(root: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            root,
            started_at: now,
            finished_at: now,
            total_files: 0,
            category_counts: BTreeMap::new(),
            moves: Vec::new(),
            excluded: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn record_move(&mut self, record: MoveRecord) {
        *self.category_counts.entry(record.category).or_insert(0) += 1;
        self.moves.push(record);
    }

    pub(crate) fn record_failure(&mut self, file_name: impl Into<String>, error: impl ToString) {
        self.failures.push(FileFailure {
            file_name: file_name.into(),
            error: error.to_string(),
        });
    }

    /// Number of files moved in this run.
    pub fn moved_files(&self) -> usize {
        self.moves.len()
    }

    /// Files that were found but not moved, whether excluded or failed.
    pub fn skipped_files(&self) -> usize {
        self.excluded.len() + self.failures.len()
    }

    /// Number of files moved into `category`.
    pub fn count(&self, category: Category) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What a run would do, without doing it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Preview {
    /// Sorted file names, per category.
    pub categories: BTreeMap<Category, Vec<String>>,
    pub excluded: Vec<String>,
    /// Folder entries that could not be read; a run reports each as a failure.
    pub unreadable: usize,
}

impl Preview {
    pub fn total_files(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Reported before each file is processed.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based index of the current file.
    pub current: usize,
    pub total: usize,
    pub file_name: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_move_updates_counts() {
        let mut result = ScanResult::new(PathBuf::from("/tmp/root"));
        for name in ["a.jpg", "b.png"] {
            result.record_move(MoveRecord {
                file_name: name.to_string(),
                destination: PathBuf::from("/tmp/root/Images").join(name),
                category: Category::Images,
                renamed: false,
            });
        }
        result.record_failure("c.txt", "permission denied");

        assert_eq!(result.moved_files(), 2);
        assert_eq!(result.count(Category::Images), 2);
        assert_eq!(result.count(Category::Documents), 0);
        assert_eq!(result.skipped_files(), 1);
        assert!(!result.is_clean());
        assert_eq!(
            result.failures[0],
            FileFailure {
                file_name: "c.txt".to_string(),
                error: "permission denied".to_string(),
            }
        );
    }

    #[test]
    fn test_scan_result_serializes_category_keys() {
        let mut result = ScanResult::new(PathBuf::from("/tmp/root"));
        result.record_move(MoveRecord {
            file_name: "run.exe".to_string(),
            destination: PathBuf::from("/tmp/root/Executables/run.exe"),
            category: Category::Executables,
            renamed: true,
        });

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["category_counts"]["Executables"], 1);
        assert_eq!(json["moves"][0]["category"], "Executables");
        assert_eq!(json["moves"][0]["renamed"], true);
    }

    #[test]
    fn test_preview_totals() {
        let mut preview = Preview::default();
        assert!(preview.is_empty());
        preview
            .categories
            .insert(Category::Audio, vec!["a.mp3".to_string(), "b.wav".to_string()]);
        preview
            .categories
            .insert(Category::Others, vec!["mystery".to_string()]);
        assert_eq!(preview.total_files(), 3);
    }
}
