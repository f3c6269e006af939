//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the destination file name to form the temporary file.
pub const TEMP_SUFFIX: &str = ".temp";

/// Returns the temporary file used while replacing `path`.
///
/// The temporary file lives in the same directory as the destination so
/// that the final rename never crosses a file system boundary.
///
/// # Errors
///
/// Returns `InvalidPath` if `path` has no file name.
pub fn temp_path_for(path: &Path) -> StorageResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| StorageError::InvalidPath {
        path: path.to_path_buf(),
    })?;
    let mut temp_name = OsString::from(name);
    temp_name.push(TEMP_SUFFIX);
    Ok(path.with_file_name(temp_name))
}

/// A file-based storage backend.
///
/// The whole collection lives in one file. Every `replace`:
///
/// 1. Writes the bytes to `<file>.temp` next to the destination
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file onto the destination
/// 4. Fsyncs the parent directory so the rename itself is durable
///
/// A crash at any point leaves the destination holding either the old or
/// the new content. Partial writes are only ever visible in the temporary
/// file. A failure in steps 1 to 3 leaves the destination untouched; a
/// failure in step 4 is reported as `DirectorySync` with the new content
/// already in place.
///
/// # Example
///
/// ```no_run
/// use algoedb_storage::{FileBackend, StorageBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("data.json")).unwrap();
/// backend.replace(b"[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    temp_path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the file at `path`.
    ///
    /// The file is not created until the first `replace`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` has no file name component.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let temp_path = temp_path_for(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            temp_path,
        })
    }

    /// Creates a backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the path is invalid.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the destination file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the path to the temporary file.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    fn write_temp(&self, data: &[u8]) -> io::Result<()> {
        let mut file = File::create(&self.temp_path)?;
        file.write_all(data)?;
        file.sync_all()
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

}

/// Syncs `dir` so a rename inside it is durable.
#[cfg(unix)]
fn sync_directory(dir: &Path) -> StorageResult<()> {
    File::open(dir)
        .and_then(|handle| handle.sync_all())
        .map_err(|source| StorageError::DirectorySync {
            path: dir.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> StorageResult<()> {
    // NTFS journals metadata; directory handles cannot be fsynced
    Ok(())
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        if let Err(source) = self.write_temp(data) {
            // Best effort: the destination is untouched either way
            let _ = fs::remove_file(&self.temp_path);
            return Err(StorageError::TempWrite {
                path: self.temp_path.clone(),
                source,
            });
        }

        if let Err(source) = fs::rename(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(StorageError::Rename {
                from: self.temp_path.clone(),
                to: self.path.clone(),
                source,
            });
        }

        sync_directory(self.parent_dir())?;

        debug!(path = %self.path.display(), bytes = data.len(), "replaced storage file");
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
