use std::path::{Path, PathBuf};

use super::artifact::processed_path;
use crate::config::OutputFormat;

/// Answers whether a source file has an artifact for a given format.
///
/// Every query checks the destination folder afresh; other jobs and other
/// processes may change it between calls.
#[derive(Debug, Clone)]
pub struct ProcessedIndex {
    root: PathBuf,
}

impl ProcessedIndex {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn is_processed(&self, source: &Path, format: OutputFormat) -> bool {
        processed_path(&self.root, source, format).is_file()
    }

    /// Where the artifact for `source` lives, if it exists right now.
    pub fn artifact_for(&self, source: &Path, format: OutputFormat) -> Option<PathBuf> {
        let path = processed_path(&self.root, source, format);
        path.is_file().then_some(path)
    }
}

impl From<&super::ArtifactStorage> for ProcessedIndex {
    fn from(storage: &super::ArtifactStorage) -> Self {
        Self::new(storage.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_processed_tracks_folder_contents() {
        let temp_dir = TempDir::new().unwrap();
        let index = ProcessedIndex::new(temp_dir.path());
        let source = Path::new("/in/talk.txt");

        assert!(!index.is_processed(source, OutputFormat::PlainText));
        assert!(!index.is_processed(source, OutputFormat::PlainText));

        std::fs::write(temp_dir.path().join("talk.txt"), "done").unwrap();
        assert!(index.is_processed(source, OutputFormat::PlainText));
        assert!(index.is_processed(source, OutputFormat::PlainText));
        assert!(!index.is_processed(source, OutputFormat::Markdown));

        std::fs::remove_file(temp_dir.path().join("talk.txt")).unwrap();
        assert!(!index.is_processed(source, OutputFormat::PlainText));
    }

    #[test]
    fn test_directory_with_artifact_name_is_not_processed() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("talk.md")).unwrap();
        let index = ProcessedIndex::new(temp_dir.path());
        assert!(!index.is_processed(Path::new("talk.txt"), OutputFormat::Markdown));
        assert!(index
            .artifact_for(Path::new("talk.txt"), OutputFormat::Markdown)
            .is_none());
    }

    #[test]
    fn test_same_base_name_shares_status() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "x").unwrap();
        let index = ProcessedIndex::new(temp_dir.path());
        assert!(index.is_processed(Path::new("/a/notes.txt"), OutputFormat::PlainText));
        assert!(index.is_processed(Path::new("/b/notes.txt"), OutputFormat::PlainText));
    }
}
