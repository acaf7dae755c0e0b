use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use pathkv_core::{key, Bytes, Context, Error, Listing, Reader, Result, Store};

/// A store backed by a filesystem directory.
///
/// Keys map directly onto relative paths under `root`: `"a/b/c"` is the file
/// `root/a/b/c`. There is no metadata, so files placed under `root` by other
/// tools are visible through the store and vice versa.
///
/// Keys are trusted. Parent-directory segments are not rejected and can
/// address paths outside `root`.
///
/// Concurrent writers to one key race at whatever granularity the filesystem
/// provides; no extra locking is added.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

// A path running through a regular file names nothing, same as a missing one.
fn is_not_found(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl LocalStore {
    /// Open a store rooted at `root`, creating the directory and any missing
    /// ancestors.
    pub fn new(root: impl Into<PathBuf>) -> Result<LocalStore> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(Error::RootPathInvalid {
                path: root,
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty root path"),
            });
        }

        if let Err(source) = fs::create_dir_all(&root) {
            return Err(Error::RootPathInvalid { path: root, source });
        }
        tracing::debug!(root = %root.display(), "opened local store");

        Ok(LocalStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_to_file_path(&self, key: &str) -> PathBuf {
        self.root
            .components()
            .chain(key::segments(key).map(|s| Component::Normal(OsStr::new(s))))
            .collect()
    }

    /// Like `key_to_file_path`, but refuses keys that resolve to the root.
    fn leaf_file_path(&self, key: &str) -> Result<PathBuf> {
        if key::trim(key).is_empty() {
            return Err(Error::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.key_to_file_path(key))
    }
}

impl Reader for LocalStore {
    fn list(&self, ctx: &Context, key: &str) -> Result<Listing> {
        ctx.check()?;

        let dir = self.key_to_file_path(key);
        tracing::debug!(path = %dir.display(), "listing");

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if is_not_found(&e) => return Err(Error::KeyNotFound),
            Err(e) => return Err(e.into()),
        };

        let mut listing = Listing::default();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_dir() {
                listing.dirs.push(name);
            } else {
                listing.blobs.push(name);
            }
        }
        listing.dirs.sort();
        listing.blobs.sort();
        Ok(listing)
    }

    fn read(&self, ctx: &Context, key: &str) -> Result<Bytes> {
        ctx.check()?;

        let file = self.key_to_file_path(key);
        tracing::debug!(path = %file.display(), "reading");

        match fs::read(&file) {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if is_not_found(&e) => Err(Error::KeyNotFound),
            // A directory holds no value of its own.
            Err(_) if file.is_dir() => Err(Error::KeyNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

impl Store for LocalStore {
    fn write(&self, ctx: &Context, key: &str, value: Bytes) -> Result<()> {
        ctx.check()?;

        let file = self.leaf_file_path(key)?;
        tracing::debug!(path = %file.display(), len = value.len(), "writing");

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, &value)?;
        Ok(())
    }

    /// Removes the file or empty directory at `key`.
    ///
    /// A missing path is not an error. A directory that still has children is
    /// not removed and fails with `Error::Io`, never `Error::KeyNotFound`.
    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check()?;

        let file = self.leaf_file_path(key)?;
        tracing::debug!(path = %file.display(), "deleting");

        let metadata = match fs::symlink_metadata(&file) {
            Ok(metadata) => metadata,
            Err(e) if is_not_found(&e) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let removed = if metadata.is_dir() {
            fs::remove_dir(&file)
        } else {
            fs::remove_file(&file)
        };
        match removed {
            Ok(()) => Ok(()),
            // Lost a race with another deleter.
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
