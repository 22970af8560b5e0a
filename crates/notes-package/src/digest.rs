use std::fmt;

use serde::{Deserialize, Serialize};

use crate::package::Package;
use crate::traits::PackageTree;

/// Domain tag for regular-file nodes.
const FILE_DOMAIN: &[u8] = b"notes-file-v1:";
/// Domain tag for directory nodes.
const DIRECTORY_DOMAIN: &[u8] = b"notes-dir-v1:";

/// BLAKE3 digest of a package tree.
///
/// Computed bottom-up: a file hashes its bytes, a directory hashes the
/// length-prefixed name and digest of every child in name order. File and
/// directory nodes are domain-separated, so a file can never collide with a
/// directory. Equal trees always produce equal digests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageDigest([u8; 32]);

impl PackageDigest {
    /// Digest a package tree.
    pub fn of(package: &Package) -> Self {
        match package.regular_file_contents() {
            Some(contents) => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(FILE_DOMAIN);
                hasher.update(contents);
                Self(*hasher.finalize().as_bytes())
            }
            None => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(DIRECTORY_DOMAIN);
                for (name, child) in package.entries() {
                    hasher.update(&(name.len() as u64).to_le_bytes());
                    hasher.update(name.as_bytes());
                    hasher.update(Self::of(child).as_bytes());
                }
                Self(*hasher.finalize().as_bytes())
            }
        }
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for PackageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageDigest({})", self.short_hex())
    }
}

impl fmt::Display for PackageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
