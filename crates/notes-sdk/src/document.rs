use std::path::{Path, PathBuf};

use notes_codec::{ErrorKind, Note, NoteError, NoteResult, PackageCodec};
use notes_package::{DirectoryPackageStore, Package, PackageDigest, PackageStore, StoreError};
use notes_rtf::{RichTextTranscoder, RtfTranscoder, StyledText};
use tracing::{debug, info, warn};

use crate::config::DocumentConfig;
use crate::hooks::{DocumentHooks, NoopHooks};

/// One open note document.
///
/// Holds the note being edited, the package it was read from, and where it
/// lives. Every save encodes into a copy of that package, so entries the
/// note does not manage survive, and the live state is only replaced once
/// the store has accepted the new package.
pub struct Document<T = RtfTranscoder, S = DirectoryPackageStore> {
    codec: PackageCodec<T>,
    store: S,
    config: DocumentConfig,
    hooks: Box<dyn DocumentHooks>,
    note: Note,
    location: Option<PathBuf>,
    change_count: u64,
    saved_digest: Option<PackageDigest>,
}

impl<T: RichTextTranscoder, S: PackageStore> Document<T, S> {
    /// An untitled, empty document.
    pub fn new(codec: PackageCodec<T>, store: S, config: DocumentConfig) -> Self {
        let mut note = Note::new();
        note.set_package(Package::directory());
        Self {
            codec,
            store,
            config,
            hooks: Box::new(NoopHooks),
            note,
            location: None,
            change_count: 0,
            saved_digest: None,
        }
    }

    /// Open the document at `location`.
    pub fn open_at(
        codec: PackageCodec<T>,
        store: S,
        config: DocumentConfig,
        location: impl AsRef<Path>,
    ) -> NoteResult<Self> {
        let mut doc = Self::new(codec, store, config);
        doc.open(location)?;
        Ok(doc)
    }

    pub fn with_hooks(mut self, hooks: impl DocumentHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    // ---- Lifecycle ----

    /// Replace this document's contents with the document at `location`.
    ///
    /// On failure the current note, location and dirty state are untouched.
    pub fn open(&mut self, location: impl AsRef<Path>) -> NoteResult<()> {
        let location = location.as_ref();
        let result = self.read_from(location);
        match result {
            Ok((note, digest)) => {
                self.note = note;
                self.location = Some(location.to_path_buf());
                self.change_count = 0;
                self.saved_digest = Some(digest);
                info!(location = %location.display(), digest = %digest.short_hex(), "document opened");
                self.hooks.did_open(location);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    fn read_from(&self, location: &Path) -> NoteResult<(Note, PackageDigest)> {
        let package = self
            .store
            .load(location)
            .map_err(|e| load_error(location, e))?;
        let digest = package.digest();
        let note = self.codec.decode(package)?;
        Ok((note, digest))
    }

    /// Ask the host to build its windows for this document.
    pub fn make_window_controllers(&mut self) {
        self.hooks.make_window_controllers(&self.config.window_nib_name);
    }

    /// Save to the current location.
    pub fn save(&mut self) -> NoteResult<()> {
        let location = self.location.clone().ok_or_else(|| {
            NoteError::new(ErrorKind::CannotAccessDocument).with_context("document has no location")
        });
        match location {
            Ok(location) => self.write_to(&location, false).map(|_| ()),
            Err(e) => Err(self.report(e)),
        }
    }

    /// Save to a new location, which becomes the document's location.
    pub fn save_as(&mut self, location: impl AsRef<Path>) -> NoteResult<()> {
        let location = location.as_ref();
        self.write_to(location, false)?;
        self.location = Some(location.to_path_buf());
        Ok(())
    }

    /// Save in place if autosave applies: the config allows it, the
    /// document has a location and there are unsaved changes.
    ///
    /// Returns `true` if a package was written.
    pub fn autosave(&mut self) -> NoteResult<bool> {
        if !self.config.autosaves_in_place || !self.is_dirty() {
            return Ok(false);
        }
        let Some(location) = self.location.clone() else {
            debug!("untitled document; autosave skipped");
            return Ok(false);
        };
        self.write_to(&location, self.config.skip_unchanged_saves)
    }

    fn write_to(&mut self, location: &Path, skip_unchanged: bool) -> NoteResult<bool> {
        let package = match self.file_package() {
            Ok(package) => package,
            Err(e) => return Err(self.report(e)),
        };
        let digest = package.digest();

        if skip_unchanged && self.saved_digest == Some(digest) {
            debug!(location = %location.display(), "package unchanged; save skipped");
            self.change_count = 0;
            return Ok(false);
        }

        if let Err(e) = self.store.save(location, &package) {
            return Err(self.report(save_error(location, e)));
        }

        self.note.set_package(package);
        self.change_count = 0;
        self.saved_digest = Some(digest);
        info!(location = %location.display(), digest = %digest.short_hex(), "document saved");
        self.hooks.did_save(location, &digest);
        Ok(true)
    }

    /// The package a save would write right now, without writing it.
    pub fn file_package(&self) -> NoteResult<Package> {
        self.codec.encode(&self.note, self.note.package().cloned())
    }

    /// Flat-data reading is not supported for package documents.
    pub fn read_from_data(&mut self, _data: &[u8]) -> NoteResult<()> {
        let err = NoteError::new(ErrorKind::CannotLoadFileWrappers)
            .with_context("notes documents are packages, not flat files");
        Err(self.report(err))
    }

    /// Flat-data writing is not supported for package documents.
    pub fn data_of_type(&mut self) -> NoteResult<Vec<u8>> {
        let err = NoteError::new(ErrorKind::CannotSaveText)
            .with_context("notes documents are packages, not flat files");
        Err(self.report(err))
    }

    fn report(&mut self, err: NoteError) -> NoteError {
        warn!(kind = ?err.kind(), error = %err, "document operation failed");
        self.hooks.present_error(&err);
        err
    }

    // ---- Editing ----

    pub fn text(&self) -> &StyledText {
        self.note.text()
    }

    /// Replace the text and record a change.
    pub fn set_text(&mut self, text: StyledText) {
        self.note.set_text(text);
        self.change_count += 1;
    }

    /// Edit the text in place and record a change.
    pub fn edit_text(&mut self, edit: impl FnOnce(&mut StyledText)) {
        edit(self.note.text_mut());
        self.change_count += 1;
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Edits since the last open or save.
    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub fn is_dirty(&self) -> bool {
        self.change_count > 0
    }

    /// Digest of the package last read or written.
    pub fn saved_digest(&self) -> Option<PackageDigest> {
        self.saved_digest
    }
}

impl<T, S> std::fmt::Debug for Document<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("location", &self.location)
            .field("change_count", &self.change_count)
            .field("saved_digest", &self.saved_digest)
            .finish()
    }
}

fn load_error(location: &Path, err: StoreError) -> NoteError {
    let kind = match &err {
        StoreError::Package(_) => ErrorKind::CannotLoadFileWrappers,
        _ => ErrorKind::CannotAccessDocument,
    };
    NoteError::new(kind)
        .with_context(location.display().to_string())
        .with_source(err)
}

fn save_error(location: &Path, err: StoreError) -> NoteError {
    let kind = match &err {
        StoreError::NotADirectory(_) | StoreError::Package(_) => ErrorKind::CannotSaveText,
        _ => ErrorKind::CannotAccessDocument,
    };
    NoteError::new(kind)
        .with_context(location.display().to_string())
        .with_source(err)
}
