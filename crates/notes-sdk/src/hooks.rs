use std::path::Path;

use notes_codec::NoteError;
use notes_package::PackageDigest;

/// Callbacks a host implements to follow a document's lifecycle.
///
/// Every method has a no-op default, so hosts override only what they
/// display. Hooks are notified after the fact and cannot veto an operation.
pub trait DocumentHooks: Send {
    /// The host should build its windows using the named layout.
    fn make_window_controllers(&mut self, _window_nib_name: &str) {}

    /// A document was read from `location`.
    fn did_open(&mut self, _location: &Path) {}

    /// A document was written to `location`.
    fn did_save(&mut self, _location: &Path, _digest: &PackageDigest) {}

    /// An open or save failed; the host decides how to surface it.
    fn present_error(&mut self, _error: &NoteError) {}
}

/// Hooks that ignore every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl DocumentHooks for NoopHooks {}
