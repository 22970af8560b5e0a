use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::package::Package;
use crate::traits::PackageStore;

/// In-memory, HashMap-based package store.
///
/// Intended for tests and embedding. Packages are held behind a `RwLock` and
/// cloned on load/save, so callers never share a tree with the store.
pub struct InMemoryPackageStore {
    packages: RwLock<HashMap<PathBuf, Package>>,
}

impl InMemoryPackageStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            packages: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored packages.
    pub fn len(&self) -> usize {
        self.packages.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.read().expect("lock poisoned").is_empty()
    }

    /// Sorted list of all stored locations.
    pub fn locations(&self) -> Vec<PathBuf> {
        let map = self.packages.read().expect("lock poisoned");
        let mut locations: Vec<PathBuf> = map.keys().cloned().collect();
        locations.sort();
        locations
    }
}

impl Default for InMemoryPackageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageStore for InMemoryPackageStore {
    fn load(&self, location: &Path) -> StoreResult<Package> {
        let map = self.packages.read().expect("lock poisoned");
        map.get(location)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(location.to_path_buf()))
    }

    fn save(&self, location: &Path, package: &Package) -> StoreResult<()> {
        let mut map = self.packages.write().expect("lock poisoned");
        map.insert(location.to_path_buf(), package.clone());
        Ok(())
    }

    fn exists(&self, location: &Path) -> StoreResult<bool> {
        let map = self.packages.read().expect("lock poisoned");
        Ok(map.contains_key(location))
    }

    fn remove(&self, location: &Path) -> StoreResult<bool> {
        let mut map = self.packages.write().expect("lock poisoned");
        Ok(map.remove(location).is_some())
    }
}

impl std::fmt::Debug for InMemoryPackageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPackageStore")
            .field("package_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PackageTree;

    fn bundle(text: &[u8]) -> Package {
        let mut root = Package::directory();
        root.add_regular_file("Text.rtf", text.to_vec()).unwrap();
        root
    }

    #[test]
    fn save_and_load() {
        let store = InMemoryPackageStore::new();
        let path = Path::new("/notes/a.note");
        store.save(path, &bundle(b"hello")).unwrap();
        assert_eq!(store.load(path).unwrap(), bundle(b"hello"));
    }

    #[test]
    fn load_missing_is_not_found() {
        let store = InMemoryPackageStore::new();
        let err = store.load(Path::new("/missing")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(p) if p == Path::new("/missing")));
    }

    #[test]
    fn save_replaces_previous() {
        let store = InMemoryPackageStore::new();
        let path = Path::new("a.note");
        store.save(path, &bundle(b"one")).unwrap();
        store.save(path, &bundle(b"two")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(path).unwrap(), bundle(b"two"));
    }

    #[test]
    fn loaded_package_is_a_copy() {
        let store = InMemoryPackageStore::new();
        let path = Path::new("a.note");
        store.save(path, &bundle(b"one")).unwrap();
        let mut loaded = store.load(path).unwrap();
        loaded.remove_entry("Text.rtf");
        assert_eq!(store.load(path).unwrap(), bundle(b"one"));
    }

    #[test]
    fn exists_and_remove() {
        let store = InMemoryPackageStore::new();
        let path = Path::new("a.note");
        assert!(!store.exists(path).unwrap());
        store.save(path, &Package::directory()).unwrap();
        assert!(store.exists(path).unwrap());
        assert!(store.remove(path).unwrap());
        assert!(!store.remove(path).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn flat_packages_are_storable() {
        let store = InMemoryPackageStore::new();
        let path = Path::new("flat.rtf");
        store.save(path, &Package::regular_file(b"{\\rtf1}".to_vec())).unwrap();
        assert!(store.load(path).unwrap().is_regular_file());
    }

    #[test]
    fn locations_are_sorted() {
        let store = InMemoryPackageStore::default();
        store.save(Path::new("b"), &Package::directory()).unwrap();
        store.save(Path::new("a"), &Package::directory()).unwrap();
        assert_eq!(store.locations(), vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryPackageStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryPackageStore"));
        assert!(debug.contains("package_count"));
    }
}
