use notes_package::{PackageFilename, PackageTree};
use notes_rtf::{RichTextTranscoder, RtfTranscoder};
use tracing::debug;

use crate::error::{ErrorKind, NoteError, NoteResult};
use crate::note::Note;

/// Maps notes to packages and back.
///
/// Stateless apart from the transcoder it holds. Every call is a single
/// attempt: the first failure is returned and nothing is retried.
#[derive(Clone, Debug, Default)]
pub struct PackageCodec<T = RtfTranscoder> {
    transcoder: T,
}

impl PackageCodec<RtfTranscoder> {
    /// A codec using the bundled RTF transcoder.
    pub fn rtf() -> Self {
        Self::new(RtfTranscoder::new())
    }
}

impl<T: RichTextTranscoder> PackageCodec<T> {
    pub fn new(transcoder: T) -> Self {
        Self { transcoder }
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Store the note's text in a package.
    ///
    /// When `existing` is given the text entry is replaced inside it and all
    /// other entries are left as they are; otherwise a new directory package
    /// holding only the text entry is returned. Attachments are not written.
    pub fn encode<P: PackageTree>(&self, note: &Note<P>, existing: Option<P>) -> NoteResult<P> {
        let text_file = PackageFilename::TextFile.as_str();

        let payload = self.transcoder.to_bytes(note.text()).map_err(|e| {
            NoteError::new(ErrorKind::CannotSaveText)
                .with_context(text_file)
                .with_source(e)
        })?;
        let payload_len = payload.len();

        let mut package = existing.unwrap_or_else(P::new_directory);
        if package.child(text_file).is_some() {
            package.remove_entry(text_file);
        }
        package.add_regular_file(text_file, payload).map_err(|e| {
            NoteError::new(ErrorKind::CannotSaveText)
                .with_context(text_file)
                .with_source(e)
        })?;

        if !note.attachments().is_empty() {
            debug!(
                count = note.attachments().len(),
                "note attachments are not written to the package"
            );
        }
        debug!(bytes = payload_len, "note encoded");
        Ok(package)
    }

    /// Rebuild a note from a package.
    ///
    /// The returned note keeps `package` as its backing package. Attachments
    /// are not read; the note's attachment map is always empty.
    pub fn decode<P: PackageTree>(&self, package: P) -> NoteResult<Note<P>> {
        let text_file = PackageFilename::TextFile.as_str();

        if package.child_names().is_none() {
            return Err(NoteError::new(ErrorKind::CannotLoadFileWrappers));
        }

        let data = package
            .child(text_file)
            .and_then(|entry| entry.regular_file_contents())
            .ok_or_else(|| NoteError::new(ErrorKind::CannotLoadText).with_context(text_file))?;

        let text = self.transcoder.from_bytes(data).map_err(|e| {
            NoteError::new(ErrorKind::CannotLoadText)
                .with_context(text_file)
                .with_source(e)
        })?;

        debug!(bytes = data.len(), chars = text.len(), "note decoded");
        Ok(Note::decoded(text, package))
    }
}
