use std::path::Path;

use crate::error::{PackageResult, StoreResult};
use crate::package::Package;

/// A tree of named entries: the interface the package codec works against.
///
/// Each node is either a directory (it has children) or a regular file (it
/// has bytes). The codec depends only on this trait, never on a concrete
/// filesystem API.
pub trait PackageTree: Sized {
    /// A new, empty directory node.
    fn new_directory() -> Self;

    /// Names of the direct children, or `None` if this node is not a
    /// directory.
    fn child_names(&self) -> Option<Vec<&str>>;

    /// A direct child by name.
    fn child(&self, name: &str) -> Option<&Self>;

    /// The bytes of a regular-file node, or `None` for directories.
    fn regular_file_contents(&self) -> Option<&[u8]>;

    /// Add a regular file. Fails if the name is taken, invalid, or this node
    /// is not a directory.
    fn add_regular_file(&mut self, name: &str, contents: Vec<u8>) -> PackageResult<()>;

    /// Remove a direct child, returning it if it existed.
    fn remove_entry(&mut self, name: &str) -> Option<Self>;
}

/// Durable storage for packages, keyed by location.
///
/// All implementations must satisfy these invariants:
/// - `save` replaces whatever was at the location as a whole; a failed save
///   leaves the previous package intact.
/// - `load` returns exactly the tree that was last saved, including entries
///   the caller never looked at.
/// - All I/O errors are propagated, never silently ignored.
pub trait PackageStore: Send + Sync {
    /// Load the package at `location`.
    ///
    /// Returns `Err(StoreError::NotFound)` if nothing is there.
    fn load(&self, location: &Path) -> StoreResult<Package>;

    /// Persist `package` at `location`, replacing any previous package.
    fn save(&self, location: &Path, package: &Package) -> StoreResult<()>;

    /// Check whether anything exists at `location`.
    fn exists(&self, location: &Path) -> StoreResult<bool>;

    /// Delete the package at `location`. Returns `true` if it existed.
    fn remove(&self, location: &Path) -> StoreResult<bool>;
}

impl<S: PackageStore + ?Sized> PackageStore for &S {
    fn load(&self, location: &Path) -> StoreResult<Package> {
        (**self).load(location)
    }

    fn save(&self, location: &Path, package: &Package) -> StoreResult<()> {
        (**self).save(location, package)
    }

    fn exists(&self, location: &Path) -> StoreResult<bool> {
        (**self).exists(location)
    }

    fn remove(&self, location: &Path) -> StoreResult<bool> {
        (**self).remove(location)
    }
}

impl<S: PackageStore + ?Sized> PackageStore for std::sync::Arc<S> {
    fn load(&self, location: &Path) -> StoreResult<Package> {
        (**self).load(location)
    }

    fn save(&self, location: &Path, package: &Package) -> StoreResult<()> {
        (**self).save(location, package)
    }

    fn exists(&self, location: &Path) -> StoreResult<bool> {
        (**self).exists(location)
    }

    fn remove(&self, location: &Path) -> StoreResult<bool> {
        (**self).remove(location)
    }
}
