use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::error::StorageError;

/// Maps a source file to its artifact path: the source's base name (without
/// extension) plus the format extension, inside `root`.
///
/// Pure: two sources sharing a base name map to the same artifact.
pub fn processed_path(root: &Path, source: &Path, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    root.join(format!("{}{}", stem, format.extension()))
}

/// Writes and reads artifacts under a fixed destination root.
#[derive(Debug, Clone)]
pub struct ArtifactStorage {
    root: PathBuf,
}

impl ArtifactStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, source: &Path, format: OutputFormat) -> PathBuf {
        processed_path(&self.root, source, format)
    }

    /// Durably writes `text` as the artifact for `source`.
    ///
    /// Content goes to a temporary file in the destination folder, is synced,
    /// then renamed over the final name, so readers never see a partial
    /// artifact. Concurrent writers to the same name: last rename wins.
    pub fn write(
        &self,
        source: &Path,
        format: OutputFormat,
        text: &str,
    ) -> Result<PathBuf, StorageError> {
        if source.file_stem().is_none() {
            return Err(StorageError::InvalidSource(source.to_path_buf()));
        }
        self.ensure_root()?;

        let final_path = self.path_for(source, format);
        let temp_path = self.root.join(format!(
            ".{}.{}.tmp",
            final_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            uuid::Uuid::new_v4().simple()
        ));

        let write_temp = || -> std::io::Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()
        };

        if let Err(e) = write_temp() {
            let _ = std::fs::remove_file(&temp_path);
            return Err(StorageError::WriteFile {
                path: final_path,
                source: e,
            });
        }

        if let Err(e) = std::fs::rename(&temp_path, &final_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(StorageError::WriteFile {
                path: final_path,
                source: e,
            });
        }

        Ok(final_path)
    }

    /// Reads a previously written artifact. Missing and empty artifacts are
    /// reported as distinct errors.
    pub fn read(&self, source: &Path, format: OutputFormat) -> Result<String, StorageError> {
        let path = self.path_for(source, format);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::ArtifactMissing(path));
            }
            Err(e) => return Err(StorageError::ReadFile { path, source: e }),
        };
        if content.is_empty() {
            return Err(StorageError::ArtifactEmpty(path));
        }
        Ok(content)
    }

    fn ensure_root(&self) -> Result<(), StorageError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| StorageError::CreateDirectory {
                path: self.root.clone(),
                source: e,
            })?;
        }
        Ok(())
    }
}
