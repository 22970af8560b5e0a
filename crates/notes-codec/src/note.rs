use std::collections::BTreeMap;

use notes_package::{validate_entry_name, Package, PackageResult};
use notes_rtf::StyledText;

/// The in-memory content of one document.
///
/// A note owns its text and attachments exclusively. `package` is the
/// package the note was decoded from, if any: it is what a later encode
/// writes into so that entries the note knows nothing about survive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note<P = Package> {
    text: StyledText,
    attachments: BTreeMap<String, Vec<u8>>,
    package: Option<P>,
}

impl<P> Note<P> {
    /// An empty note with no backing package.
    pub fn new() -> Self {
        Self::with_text(StyledText::new())
    }

    pub fn with_text(text: StyledText) -> Self {
        Self {
            text,
            attachments: BTreeMap::new(),
            package: None,
        }
    }

    pub(crate) fn decoded(text: StyledText, package: P) -> Self {
        Self {
            text,
            attachments: BTreeMap::new(),
            package: Some(package),
        }
    }

    pub fn text(&self) -> &StyledText {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut StyledText {
        &mut self.text
    }

    pub fn set_text(&mut self, text: StyledText) {
        self.text = text;
    }

    /// Attachments by name.
    pub fn attachments(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.attachments
    }

    /// Add or replace an attachment. Returns the previous contents.
    ///
    /// Names must be usable as package entry names.
    pub fn insert_attachment(
        &mut self,
        name: &str,
        contents: Vec<u8>,
    ) -> PackageResult<Option<Vec<u8>>> {
        validate_entry_name(name)?;
        Ok(self.attachments.insert(name.to_string(), contents))
    }

    pub fn remove_attachment(&mut self, name: &str) -> Option<Vec<u8>> {
        self.attachments.remove(name)
    }

    /// The package this note was decoded from.
    pub fn package(&self) -> Option<&P> {
        self.package.as_ref()
    }

    /// Replace the backing package, e.g. after a successful encode.
    pub fn set_package(&mut self, package: P) {
        self.package = Some(package);
    }

    pub fn take_package(&mut self) -> Option<P> {
        self.package.take()
    }
}

impl<P> Default for Note<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_package::PackageError;

    #[test]
    fn new_note_is_empty() {
        let note: Note = Note::new();
        assert!(note.text().is_empty());
        assert!(note.attachments().is_empty());
        assert!(note.package().is_none());
    }

    #[test]
    fn attachments_are_keyed_by_name() {
        let mut note: Note = Note::new();
        assert_eq!(note.insert_attachment("a.png", vec![1]).unwrap(), None);
        assert_eq!(note.insert_attachment("a.png", vec![2]).unwrap(), Some(vec![1]));
        assert_eq!(note.attachments().len(), 1);
        assert_eq!(note.remove_attachment("a.png"), Some(vec![2]));
    }

    #[test]
    fn attachment_names_are_validated() {
        let mut note: Note = Note::new();
        let err = note.insert_attachment("../escape", vec![]).unwrap_err();
        assert!(matches!(err, PackageError::InvalidEntryName { .. }));
        assert!(note.attachments().is_empty());
    }

    #[test]
    fn text_can_be_edited_in_place() {
        let mut note: Note = Note::with_text(StyledText::plain("a"));
        note.text_mut().push("b", Default::default());
        assert_eq!(note.text().plain_text(), "ab");
    }

    #[test]
    fn package_can_be_taken() {
        let mut note: Note = Note::new();
        note.set_package(Package::directory());
        assert!(note.take_package().is_some());
        assert!(note.package().is_none());
    }
}
