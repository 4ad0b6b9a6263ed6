use std::fs::{self, Permissions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::AppError;

// @module: File and directory utilities

/// Extension of word-processing documents
pub const DOCX_SUFFIX: &str = ".docx";

/// Suffix that replaces `.docx` in backup file names
pub const BACKUP_SUFFIX: &str = ".backup.docx";

/// File operations utility
pub struct FileManager;

impl FileManager {
    /// Whether `path` is an existing regular file (symlinks are followed)
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Create a directory and its parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), AppError> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Derive the backup path by replacing the trailing `.docx` with `.backup.docx`
    pub fn backup_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, AppError> {
        let path = path.as_ref();
        let as_str = path.to_string_lossy();

        match as_str.strip_suffix(DOCX_SUFFIX) {
            Some(stem) if !stem.is_empty() => Ok(PathBuf::from(format!("{}{}", stem, BACKUP_SUFFIX))),
            _ => Err(AppError::File(format!(
                "Cannot derive backup name, path does not end in {}: {:?}",
                DOCX_SUFFIX, path
            ))),
        }
    }

    /// Read a whole file into memory
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, AppError> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(AppError::File(format!("File does not exist: {:?}", path)));
        }

        fs::read(path).map_err(|e| AppError::File(format!("Failed to read file {:?}: {}", path, e)))
    }

    /// The file a write to `path` must land in.
    ///
    /// An existing path is canonicalized so that a symlink keeps pointing at
    /// the replaced file instead of being replaced itself.
    pub fn resolve_target<P: AsRef<Path>>(path: P) -> Result<PathBuf, AppError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(path.to_path_buf());
        }

        fs::canonicalize(path).map_err(|e| AppError::File(format!("Failed to resolve {:?}: {}", path, e)))
    }

    /// Write bytes through a temporary file in the target directory, then rename it into place.
    ///
    /// The target is either fully replaced or left as it was. An existing
    /// target keeps its permissions.
    pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<(), AppError> {
        let target = Self::resolve_target(path)?;
        let permissions = Self::permissions_of(&target)?;
        Self::persist_bytes(&target, content, permissions)
    }

    /// Like [`FileManager::write_bytes_atomic`], but the written file takes the
    /// permissions of `reference`.
    pub fn write_bytes_atomic_like<P: AsRef<Path>, R: AsRef<Path>>(
        path: P,
        content: &[u8],
        reference: R,
    ) -> Result<(), AppError> {
        let target = Self::resolve_target(path)?;
        let permissions = Self::permissions_of(reference.as_ref())?;
        Self::persist_bytes(&target, content, permissions)
    }

    // @returns: Permissions of an existing file, None for a missing one
    fn permissions_of(path: &Path) -> Result<Option<Permissions>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let metadata = fs::metadata(path)
            .map_err(|e| AppError::File(format!("Failed to read metadata of {:?}: {}", path, e)))?;
        Ok(Some(metadata.permissions()))
    }

    // @creates: Temporary sibling of `target`, renamed over it once complete
    fn persist_bytes(target: &Path, content: &[u8], permissions: Option<Permissions>) -> Result<(), AppError> {
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)
            .map_err(|e| AppError::File(format!("Failed to create temporary file in {:?}: {}", parent, e)))?;
        temp.write_all(content)
            .map_err(|e| AppError::File(format!("Failed to write temporary file for {:?}: {}", target, e)))?;
        if let Some(permissions) = permissions {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|e| AppError::File(format!("Failed to set permissions for {:?}: {}", target, e)))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| AppError::File(format!("Failed to flush temporary file for {:?}: {}", target, e)))?;
        temp.persist(target)
            .map_err(|e| AppError::File(format!("Failed to move temporary file to {:?}: {}", target, e.error)))?;

        Ok(())
    }
}
