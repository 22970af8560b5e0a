//! Directory-style document packages.
//!
//! A Notes document on disk is a bundle: a directory holding a `Text.rtf`
//! payload and an optional `Attachments/` subdirectory. This crate models
//! that bundle in memory as a [`Package`] tree and moves it to and from
//! durable storage.
//!
//! # Layout
//!
//! ```text
//! <package-root>/
//!   Text.rtf
//!   Attachments/
//!     <attachment-name>
//! ```
//!
//! # Storage Backends
//!
//! All backends implement the [`PackageStore`] trait:
//!
//! - [`InMemoryPackageStore`] -- `HashMap`-based store for tests and embedding
//! - [`DirectoryPackageStore`] -- real directories on the local filesystem
//!
//! # Design Rules
//!
//! 1. A package never interprets file contents; it only names and holds bytes.
//! 2. Entry names are validated on insertion, never on lookup.
//! 3. Overwriting is remove-then-add; adding over an existing name is an error.
//! 4. Saves are staged next to the target and swapped in, so a failed save
//!    never leaves a half-written bundle behind.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod digest;
pub mod directory;
pub mod error;
pub mod memory;
pub mod names;
pub mod package;
pub mod traits;

pub use digest::PackageDigest;
pub use directory::DirectoryPackageStore;
pub use error::{PackageError, PackageResult, StoreError, StoreResult};
pub use memory::InMemoryPackageStore;
pub use names::{validate_entry_name, PackageFilename};
pub use package::{EntryKind, Package};
pub use traits::{PackageStore, PackageTree};
