//! Named file storage for saved registries.
//!
//! The store maps a bare name such as `goblins` to
//! `<store_dir>/goblins.<extension>`. Names are restricted to word
//! characters so they can never escape the store directory.

use std::fs;
use std::path::{Path, PathBuf};

use dicebag_foundation::{Error, ErrorContext, Result};
use dicebag_storage::Registry;
use tracing::{debug, info};

use crate::serialize::{load_from_file, save_to_file};

/// A directory of saved registries.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    extension: String,
}

impl FileStore {
    /// Creates a store rooted at `root`, using files with `extension`.
    ///
    /// The directory is created lazily on first write or listing.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file extension (without the dot).
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns true if `name` is acceptable as a file name: word
    /// characters only. The empty name is valid and means "no file".
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        name.chars().all(|c| c.is_alphanumeric() || c == '_')
    }

    /// Checks a name that must identify a real file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the name is empty or has non-word characters.
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || !Self::is_valid_name(name) {
            return Err(Error::invalid_argument(format!("invalid file name: '{name}'")));
        }
        Ok(())
    }

    /// Returns the path a name is stored at.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{}", self.extension))
    }

    /// Returns true if a file with this name exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        Self::is_valid_name(name) && !name.is_empty() && self.path_for(name).is_file()
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            Error::io(format!("failed to create store directory: {e}")).with_context(
                ErrorContext::new().with_path(self.root.display().to_string()),
            )
        })
    }

    /// Writes a registry under `name`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad name, `IoFailure` if writing fails.
    pub fn save(&self, name: &str, registry: &Registry) -> Result<()> {
        Self::validate_name(name)?;
        self.ensure_root()?;
        save_to_file(registry, self.path_for(name))?;
        info!(name, objects = registry.len(), "saved");
        Ok(())
    }

    /// Reads the registry stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such file, `IoFailure` if reading
    /// fails, or any decoding error from the persisted bytes.
    pub fn load(&self, name: &str) -> Result<Registry> {
        Self::validate_name(name)?;
        if !self.exists(name) {
            return Err(Error::not_found(format!("file {name}")));
        }
        let registry = load_from_file(self.path_for(name))?;
        info!(name, objects = registry.len(), "loaded");
        Ok(registry)
    }

    /// Deletes the file stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such file, `IoFailure` if removal fails.
    pub fn delete(&self, name: &str) -> Result<()> {
        Self::validate_name(name)?;
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(Error::not_found(format!("file {name}")));
        }
        fs::remove_file(&path).map_err(|e| {
            Error::io(format!("failed to delete file: {e}"))
                .with_context(ErrorContext::new().with_path(path.display().to_string()))
        })?;
        debug!(name, "deleted");
        Ok(())
    }

    /// Renames a stored file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for bad names, `NotFound` if `old` doesn't
    /// exist, `DuplicateName` if `new` already exists, or `IoFailure`.
    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        Self::validate_name(old)?;
        Self::validate_name(new)?;
        let from = self.path_for(old);
        if !from.is_file() {
            return Err(Error::not_found(format!("file {old}")));
        }
        if old == new {
            return Ok(());
        }
        let to = self.path_for(new);
        if to.exists() {
            return Err(Error::duplicate_name(format!("file {new}")));
        }
        fs::rename(&from, &to).map_err(|e| {
            Error::io(format!("failed to rename file: {e}"))
                .with_context(ErrorContext::new().with_path(from.display().to_string()))
        })?;
        debug!(old, new, "renamed file");
        Ok(())
    }

    /// Lists stored names, sorted.
    ///
    /// Only files whose extension matches exactly are listed, so every
    /// name returned can be loaded back through [`FileStore::path_for`]
    /// on a case-sensitive file system.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the directory can't be read.
    pub fn list(&self) -> Result<Vec<String>> {
        self.ensure_root()?;
        let entries = fs::read_dir(&self.root).map_err(|e| {
            Error::io(format!("failed to list store: {e}"))
                .with_context(ErrorContext::new().with_path(self.root.display().to_string()))
        })?;

        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == self.extension.as_str()))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }
}
