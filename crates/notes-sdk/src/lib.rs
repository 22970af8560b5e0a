//! Document lifecycle for Notes bundles.
//!
//! [`Document`] ties a [`PackageCodec`] to a [`PackageStore`]: it opens a
//! package from a location, tracks edits to the note's text, and saves or
//! autosaves the note back, preserving entries it does not manage. Hosts
//! follow the lifecycle through [`DocumentHooks`] and tune it with a
//! [`DocumentConfig`].

pub mod config;
pub mod document;
pub mod hooks;

pub use config::{ConfigError, ConfigResult, DocumentConfig};
pub use document::Document;
pub use hooks::{DocumentHooks, NoopHooks};

// Re-export key types
pub use notes_codec::{ErrorKind, Note, NoteError, NoteResult, PackageCodec};
pub use notes_package::{
    DirectoryPackageStore, InMemoryPackageStore, Package, PackageDigest, PackageStore,
};
pub use notes_rtf::{RtfTranscoder, StyledText, TextAttributes};
