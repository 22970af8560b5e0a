//! Styled text and RTF transcoding for Notes document bundles.
//!
//! The package codec treats rich text as an opaque payload. This crate
//! defines that payload ([`StyledText`]) and the seam through which it is
//! turned into bytes and back ([`RichTextTranscoder`]).
//!
//! # Transcoders
//!
//! - [`RtfTranscoder`] -- the bundled RTF engine: a canonical writer and a
//!   tolerant reader covering the character formatting a note can carry.
//!
//! # Design Rules
//!
//! 1. Transcoders are stateless: every call is a pure function of its input.
//! 2. The writer is canonical: equal styled text always yields equal bytes.
//! 3. The reader never panics on hostile input; malformed documents are
//!    reported as [`TranscodeError`] values.
//! 4. `StyledText` is always normalized: no empty runs, no two adjacent runs
//!    with equal attributes.

pub mod error;
pub mod reader;
pub mod text;
pub mod traits;
pub mod writer;

pub use error::{TranscodeError, TranscodeResult};
pub use reader::RtfReader;
pub use text::{StyledText, TextAttributes, TextRun, DEFAULT_FONT_SIZE};
pub use traits::{RichTextTranscoder, RtfTranscoder};
pub use writer::RtfWriter;
