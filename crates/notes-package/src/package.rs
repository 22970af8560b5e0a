use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::digest::PackageDigest;
use crate::error::{PackageError, PackageResult};
use crate::names::validate_entry_name;
use crate::traits::PackageTree;

/// What a package node holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Raw bytes.
    RegularFile,
    /// Named children.
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegularFile => write!(f, "file"),
            Self::Directory => write!(f, "dir"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    RegularFile(Vec<u8>),
    Directory(BTreeMap<String, Package>),
}

/// A directory-shaped persistence container.
///
/// Every node of the tree is itself a `Package`: either a regular file
/// holding bytes or a directory holding named children. Children are kept
/// sorted by name so iteration and digests are deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    node: Node,
}

impl Package {
    /// Create an empty directory package.
    pub fn directory() -> Self {
        Self {
            node: Node::Directory(BTreeMap::new()),
        }
    }

    /// Create a flat regular-file package.
    pub fn regular_file(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            node: Node::RegularFile(contents.into()),
        }
    }

    /// The kind of this node.
    pub fn kind(&self) -> EntryKind {
        match self.node {
            Node::RegularFile(_) => EntryKind::RegularFile,
            Node::Directory(_) => EntryKind::Directory,
        }
    }

    /// Returns `true` if this node has children.
    pub fn is_directory(&self) -> bool {
        matches!(self.node, Node::Directory(_))
    }

    /// Returns `true` if this node holds bytes.
    pub fn is_regular_file(&self) -> bool {
        matches!(self.node, Node::RegularFile(_))
    }

    /// Number of direct children (zero for regular files).
    pub fn len(&self) -> usize {
        match &self.node {
            Node::Directory(children) => children.len(),
            Node::RegularFile(_) => 0,
        }
    }

    /// Returns `true` if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Direct children in name order. Empty for regular files.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Package)> {
        let children = match &self.node {
            Node::Directory(children) => Some(children),
            Node::RegularFile(_) => None,
        };
        children
            .into_iter()
            .flat_map(|c| c.iter().map(|(name, entry)| (name.as_str(), entry)))
    }

    /// Insert a subtree under `name`.
    ///
    /// Fails if this node is not a directory, the name is invalid, or an
    /// entry with that name already exists.
    pub fn add_entry(&mut self, name: &str, entry: Package) -> PackageResult<()> {
        validate_entry_name(name)?;
        let Node::Directory(children) = &mut self.node else {
            return Err(PackageError::NotADirectory);
        };
        if children.contains_key(name) {
            return Err(PackageError::EntryExists(name.to_string()));
        }
        children.insert(name.to_string(), entry);
        Ok(())
    }

    /// Mutable access to a direct child.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Package> {
        match &mut self.node {
            Node::Directory(children) => children.get_mut(name),
            Node::RegularFile(_) => None,
        }
    }

    /// Descend through `path`, creating empty directories where missing.
    ///
    /// Fails if an existing component is a regular file.
    pub fn ensure_directory(&mut self, path: &[&str]) -> PackageResult<&mut Package> {
        let Some((first, rest)) = path.split_first() else {
            if !self.is_directory() {
                return Err(PackageError::NotADirectory);
            }
            return Ok(self);
        };
        if self.child(first).is_none() {
            self.add_entry(first, Package::directory())?;
        }
        match self.child_mut(first) {
            Some(child) => child.ensure_directory(rest),
            None => Err(PackageError::NotADirectory),
        }
    }

    /// Every node below this one as `(path, entry)`, depth-first, parents
    /// before children. Paths are `/`-joined and relative to this node.
    pub fn walk(&self) -> Vec<(String, &Package)> {
        let mut out = Vec::new();
        self.walk_into("", &mut out);
        out
    }

    fn walk_into<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Package)>) {
        for (name, entry) in self.entries() {
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            };
            out.push((path.clone(), entry));
            entry.walk_into(&path, out);
        }
    }

    /// Total bytes held by regular files in this tree.
    pub fn total_bytes(&self) -> u64 {
        match &self.node {
            Node::RegularFile(contents) => contents.len() as u64,
            Node::Directory(children) => children.values().map(Package::total_bytes).sum(),
        }
    }

    /// Content digest of the whole tree.
    pub fn digest(&self) -> PackageDigest {
        PackageDigest::of(self)
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::directory()
    }
}

impl PackageTree for Package {
    fn new_directory() -> Self {
        Self::directory()
    }

    fn child_names(&self) -> Option<Vec<&str>> {
        match &self.node {
            Node::Directory(children) => Some(children.keys().map(String::as_str).collect()),
            Node::RegularFile(_) => None,
        }
    }

    fn child(&self, name: &str) -> Option<&Self> {
        match &self.node {
            Node::Directory(children) => children.get(name),
            Node::RegularFile(_) => None,
        }
    }

    fn regular_file_contents(&self) -> Option<&[u8]> {
        match &self.node {
            Node::RegularFile(contents) => Some(contents),
            Node::Directory(_) => None,
        }
    }

    fn add_regular_file(&mut self, name: &str, contents: Vec<u8>) -> PackageResult<()> {
        self.add_entry(name, Package::regular_file(contents))
    }

    fn remove_entry(&mut self, name: &str) -> Option<Self> {
        match &mut self.node {
            Node::Directory(children) => children.remove(name),
            Node::RegularFile(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        let mut root = Package::directory();
        root.add_regular_file("Text.rtf", b"{\\rtf1}".to_vec()).unwrap();
        let mut attachments = Package::directory();
        attachments
            .add_regular_file("photo.jpg", vec![0xff, 0xd8, 0xff])
            .unwrap();
        root.add_entry("Attachments", attachments).unwrap();
        root
    }

    // -----------------------------------------------------------------------
    // Tree interface
    // -----------------------------------------------------------------------

    #[test]
    fn directory_lists_children_sorted() {
        let root = sample();
        assert_eq!(root.child_names().unwrap(), vec!["Attachments", "Text.rtf"]);
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn regular_file_has_no_children() {
        let flat = Package::regular_file(b"just bytes".to_vec());
        assert!(flat.child_names().is_none());
        assert!(flat.child("anything").is_none());
        assert_eq!(flat.regular_file_contents(), Some(&b"just bytes"[..]));
        assert!(flat.is_empty());
    }

    #[test]
    fn directory_has_no_contents() {
        assert!(Package::directory().regular_file_contents().is_none());
    }

    #[test]
    fn add_over_existing_name_fails() {
        let mut root = sample();
        let err = root.add_regular_file("Text.rtf", vec![]).unwrap_err();
        assert_eq!(err, PackageError::EntryExists("Text.rtf".into()));
    }

    #[test]
    fn add_to_regular_file_fails() {
        let mut flat = Package::regular_file(vec![1, 2, 3]);
        let err = flat.add_regular_file("x", vec![]).unwrap_err();
        assert_eq!(err, PackageError::NotADirectory);
    }

    #[test]
    fn add_with_invalid_name_fails() {
        let mut root = Package::directory();
        assert!(matches!(
            root.add_regular_file("a/b", vec![]),
            Err(PackageError::InvalidEntryName { .. })
        ));
        assert!(root.is_empty());
    }

    #[test]
    fn remove_then_add_replaces() {
        let mut root = sample();
        let old = root.remove_entry("Text.rtf").unwrap();
        assert_eq!(old.regular_file_contents(), Some(&b"{\\rtf1}"[..]));
        root.add_regular_file("Text.rtf", b"new".to_vec()).unwrap();
        assert_eq!(
            root.child("Text.rtf").and_then(|e| e.regular_file_contents()),
            Some(&b"new"[..])
        );
    }

    #[test]
    fn remove_missing_returns_none() {
        let mut root = Package::directory();
        assert!(root.remove_entry("missing").is_none());
        let mut flat = Package::regular_file(vec![]);
        assert!(flat.remove_entry("missing").is_none());
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    #[test]
    fn ensure_directory_creates_path() {
        let mut root = Package::directory();
        root.ensure_directory(&["a", "b"])
            .unwrap()
            .add_regular_file("c.txt", b"c".to_vec())
            .unwrap();
        let paths: Vec<String> = root.walk().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/b/c.txt"]);
    }

    #[test]
    fn ensure_directory_through_file_fails() {
        let mut root = Package::directory();
        root.add_regular_file("a", vec![]).unwrap();
        assert_eq!(
            root.ensure_directory(&["a", "b"]).unwrap_err(),
            PackageError::NotADirectory
        );
    }

    #[test]
    fn walk_is_depth_first() {
        let root = sample();
        let walked: Vec<(String, EntryKind)> =
            root.walk().into_iter().map(|(p, e)| (p, e.kind())).collect();
        assert_eq!(
            walked,
            vec![
                ("Attachments".to_string(), EntryKind::Directory),
                ("Attachments/photo.jpg".to_string(), EntryKind::RegularFile),
                ("Text.rtf".to_string(), EntryKind::RegularFile),
            ]
        );
    }

    #[test]
    fn total_bytes_sums_files() {
        assert_eq!(sample().total_bytes(), 7 + 3);
    }

    #[test]
    fn entry_kind_display() {
        assert_eq!(EntryKind::RegularFile.to_string(), "file");
        assert_eq!(EntryKind::Directory.to_string(), "dir");
    }

    #[test]
    fn entry_kind_serde() {
        assert_eq!(serde_json::to_string(&EntryKind::Directory).unwrap(), "\"Directory\"");
        let kind: EntryKind = serde_json::from_str("\"RegularFile\"").unwrap();
        assert_eq!(kind, EntryKind::RegularFile);
    }
}
