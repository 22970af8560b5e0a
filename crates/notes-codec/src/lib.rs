//! Package codec for Notes document bundles.
//!
//! [`PackageCodec`] maps a [`Note`] onto a package tree and back:
//!
//! - `encode` transcodes the note's styled text and stores it as
//!   `Text.rtf`, replacing any previous text entry and leaving every other
//!   entry of an existing package untouched.
//! - `decode` reads `Text.rtf` back into styled text and keeps the package
//!   it came from so the next `encode` can preserve its siblings.
//!
//! The codec performs no I/O and keeps no state between calls. It works
//! against the [`PackageTree`](notes_package::PackageTree) interface, so any
//! tree implementation can back it.
//!
//! Attachments are neither read from nor written to `Attachments/`; the
//! directory name is reserved and an existing directory is carried through
//! untouched.

pub mod codec;
pub mod error;
pub mod note;

pub use codec::PackageCodec;
pub use error::{ErrorKind, NoteError, NoteResult};
pub use note::Note;

pub use notes_package::{Package, PackageFilename, PackageTree};
pub use notes_rtf::{RichTextTranscoder, RtfTranscoder, StyledText, TextAttributes};
