use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::WorkerError;

/// How many files the folder listing returns by default.
pub const DEFAULT_RECENT_LIMIT: usize = 30;

/// A source text file found in the monitored folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
    /// Not every platform or filesystem records creation time.
    pub created: Option<DateTime<Utc>>,
}

pub struct DirectoryScanner {
    folder: PathBuf,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(folder: P) -> Self {
        Self {
            folder: folder.as_ref().to_path_buf(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Up to `max_count` `.txt` files at the top level of the folder, newest
    /// modified first. Entries whose metadata cannot be read are skipped.
    pub fn recent_text_files(&self, max_count: usize) -> Result<Vec<SourceFile>, WorkerError> {
        if !self.folder.is_dir() {
            return Err(WorkerError::MissingFolder(self.folder.clone()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(WorkerError::ScanFailed {
                        path: self.folder.clone(),
                        source: e,
                    });
                }
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_text_file(path) {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                debug!("Skipping {}: metadata unavailable", path.display());
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };

            files.push(SourceFile {
                path: path.to_path_buf(),
                modified: DateTime::<Utc>::from(modified),
                created: metadata.created().ok().map(DateTime::<Utc>::from),
            });
        }

        files.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
        files.truncate(max_count);

        info!(
            "Found {} text files in {}",
            files.len(),
            self.folder.display()
        );
        Ok(files)
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_with_mtime(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, name).unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
        path
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = DirectoryScanner::new(temp_dir.path());
        assert!(scanner.recent_text_files(10).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = DirectoryScanner::new(temp_dir.path().join("nope"));
        assert!(matches!(
            scanner.recent_text_files(10),
            Err(WorkerError::MissingFolder(_))
        ));
    }

    #[test]
    fn test_scan_only_text_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        std::fs::write(temp_dir.path().join("b.TXT"), "b").unwrap();
        std::fs::write(temp_dir.path().join("c.md"), "c").unwrap();
        std::fs::write(temp_dir.path().join("d.pdf"), "d").unwrap();

        let files = DirectoryScanner::new(temp_dir.path())
            .recent_text_files(10)
            .unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_scan_ignores_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let sub_dir = temp_dir.path().join("nested");
        std::fs::create_dir(&sub_dir).unwrap();
        std::fs::write(sub_dir.join("inner.txt"), "inner").unwrap();
        std::fs::create_dir(temp_dir.path().join("folder.txt")).unwrap();
        std::fs::write(temp_dir.path().join("top.txt"), "top").unwrap();

        let files = DirectoryScanner::new(temp_dir.path())
            .recent_text_files(10)
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("top.txt"));
    }

    #[test]
    fn test_scan_orders_newest_first_and_truncates() {
        let temp_dir = TempDir::new().unwrap();
        write_with_mtime(temp_dir.path(), "old.txt", 300);
        write_with_mtime(temp_dir.path(), "new.txt", 10);
        write_with_mtime(temp_dir.path(), "mid.txt", 100);

        let scanner = DirectoryScanner::new(temp_dir.path());
        let files = scanner.recent_text_files(10).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["new.txt", "mid.txt", "old.txt"]);

        let limited = scanner.recent_text_files(2).unwrap();
        assert_eq!(limited.len(), 2);
        assert!(limited[0].path.ends_with("new.txt"));
    }
}
