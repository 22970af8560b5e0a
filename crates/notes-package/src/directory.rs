//! Filesystem-backed package store.
//!
//! A package location is a directory on disk. Loading walks it into a
//! [`Package`]; a plain file at the location loads as a flat regular-file
//! package so callers can tell "not a bundle" apart from "missing".
//!
//! Saving stages the whole tree in a hidden sibling directory and then swaps
//! it into place:
//!
//! ```text
//! .<name>.saving/    -- new tree written here
//! <name>             -- renamed to .<name>.previous
//! .<name>.saving/    -- renamed to <name>
//! .<name>.previous   -- removed
//! ```
//!
//! Entries a [`Package`] cannot represent (symlinks, special files, names
//! that are not UTF-8) are skipped on load and moved from the old bundle
//! into the new one on save, so they are never lost by a load/save cycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::package::Package;
use crate::traits::{PackageStore, PackageTree};

/// Package store over real directories.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectoryPackageStore;

impl DirectoryPackageStore {
    pub fn new() -> Self {
        Self
    }

    fn sibling(location: &Path, suffix: &str) -> StoreResult<PathBuf> {
        let name = location
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidLocation(location.to_path_buf()))?;
        Ok(location.with_file_name(format!(".{name}.{suffix}")))
    }

    /// Entry name components relative to the bundle root, if every one is
    /// UTF-8.
    fn components(relative: &Path) -> Option<Vec<&str>> {
        relative.iter().map(|c| c.to_str()).collect()
    }

    fn is_representable(relative: &Path, file_type: fs::FileType) -> bool {
        (file_type.is_dir() || file_type.is_file()) && Self::components(relative).is_some()
    }

    fn load_directory(location: &Path) -> StoreResult<Package> {
        let mut root = Package::directory();
        let mut walker = WalkDir::new(location).min_depth(1).sort_by_file_name().into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(walk_error)?;
            let relative = entry
                .path()
                .strip_prefix(location)
                .map_err(|_| StoreError::InvalidLocation(entry.path().to_path_buf()))?;

            let file_type = entry.file_type();
            if !Self::is_representable(relative, file_type) {
                debug!(path = %entry.path().display(), "skipping entry a package cannot hold");
                if file_type.is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }
            let Some(components) = Self::components(relative) else {
                continue;
            };
            let Some((name, parents)) = components.split_last() else {
                continue;
            };

            if file_type.is_dir() {
                root.ensure_directory(&components)?;
            } else {
                let contents = fs::read(entry.path())?;
                root.ensure_directory(parents)?
                    .add_regular_file(name, contents)?;
            }
        }
        Ok(root)
    }

    /// Move entries the package could not hold from the replaced bundle into
    /// the newly saved one. Returns how many were carried.
    fn carry_unrepresented(previous: &Path, location: &Path) -> StoreResult<usize> {
        if !fs::symlink_metadata(previous)?.is_dir() {
            return Ok(0);
        }

        let mut pending = Vec::new();
        let mut walker = WalkDir::new(previous).min_depth(1).sort_by_file_name().into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(walk_error)?;
            let relative = entry
                .path()
                .strip_prefix(previous)
                .map_err(|_| StoreError::InvalidLocation(entry.path().to_path_buf()))?;
            if Self::is_representable(relative, entry.file_type()) {
                continue;
            }
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            pending.push(relative.to_path_buf());
        }

        let mut carried = 0;
        for relative in pending {
            let target = location.join(&relative);
            let parent_exists = target.parent().is_some_and(Path::is_dir);
            if !parent_exists || fs::symlink_metadata(&target).is_ok() {
                warn!(path = %target.display(), "entry no longer has a place in the package; dropped");
                continue;
            }
            fs::rename(previous.join(&relative), &target)?;
            carried += 1;
        }
        Ok(carried)
    }

    fn write_tree(target: &Path, package: &Package) -> io::Result<()> {
        fs::create_dir(target)?;
        for (name, entry) in package.entries() {
            let path = target.join(name);
            match entry.regular_file_contents() {
                Some(contents) => fs::write(&path, contents)?,
                None => Self::write_tree(&path, entry)?,
            }
        }
        Ok(())
    }

    fn remove_any(path: &Path) -> io::Result<()> {
        if fs::symlink_metadata(path)?.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }
}

impl PackageStore for DirectoryPackageStore {
    fn load(&self, location: &Path) -> StoreResult<Package> {
        let metadata = match fs::metadata(location) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(location.to_path_buf()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let package = if metadata.is_dir() {
            Self::load_directory(location)?
        } else {
            Package::regular_file(fs::read(location)?)
        };
        debug!(
            location = %location.display(),
            entries = package.len(),
            bytes = package.total_bytes(),
            "package loaded"
        );
        Ok(package)
    }

    fn save(&self, location: &Path, package: &Package) -> StoreResult<()> {
        if !package.is_directory() {
            return Err(StoreError::NotADirectory(location.to_path_buf()));
        }

        let staging = Self::sibling(location, "saving")?;
        let previous = Self::sibling(location, "previous")?;
        for leftover in [&staging, &previous] {
            if fs::symlink_metadata(leftover).is_ok() {
                warn!(path = %leftover.display(), "removing leftover from interrupted save");
                Self::remove_any(leftover)?;
            }
        }

        if let Err(e) = Self::write_tree(&staging, package) {
            if let Err(cleanup) = Self::remove_any(&staging) {
                warn!(path = %staging.display(), error = %cleanup, "failed to clean up staging directory");
            }
            return Err(StoreError::Io(e));
        }

        let replaced = fs::symlink_metadata(location).is_ok();
        if replaced {
            fs::rename(location, &previous)?;
        }
        if let Err(e) = fs::rename(&staging, location) {
            // Put the old package back before reporting.
            if replaced {
                fs::rename(&previous, location)?;
            }
            return Err(StoreError::Io(e));
        }
        let mut carried = 0;
        if replaced {
            // On failure `previous` is kept so nothing is deleted.
            carried = Self::carry_unrepresented(&previous, location)?;
            Self::remove_any(&previous)?;
        }

        debug!(
            location = %location.display(),
            entries = package.len(),
            replaced,
            carried,
            "package saved"
        );
        Ok(())
    }

    fn exists(&self, location: &Path) -> StoreResult<bool> {
        match fs::symlink_metadata(location) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn remove(&self, location: &Path) -> StoreResult<bool> {
        match Self::remove_any(location) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

fn walk_error(e: walkdir::Error) -> StoreError {
    match e.into_io_error() {
        Some(io) => StoreError::Io(io),
        None => StoreError::Io(io::Error::new(
            io::ErrorKind::Other,
            "filesystem loop while reading package",
        )),
    }
}
