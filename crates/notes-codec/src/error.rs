use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// What went wrong while opening or saving a note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The document location could not be reached.
    CannotAccessDocument,
    /// The package has no child entries (it is a flat file, not a bundle).
    CannotLoadFileWrappers,
    /// The text entry is missing, unreadable, or not valid rich text.
    CannotLoadText,
    /// The attachments directory could not be read.
    CannotAccessAttachments,
    /// The text could not be encoded or stored.
    CannotSaveText,
    /// An attachment could not be stored.
    CannotSaveAttachment,
}

impl ErrorKind {
    /// Stable numeric code for hosts that need one.
    pub const fn code(self) -> i32 {
        match self {
            Self::CannotAccessDocument => 0,
            Self::CannotLoadFileWrappers => 1,
            Self::CannotLoadText => 2,
            Self::CannotAccessAttachments => 3,
            Self::CannotSaveText => 4,
            Self::CannotSaveAttachment => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::CannotAccessDocument),
            1 => Some(Self::CannotLoadFileWrappers),
            2 => Some(Self::CannotLoadText),
            3 => Some(Self::CannotAccessAttachments),
            4 => Some(Self::CannotSaveText),
            5 => Some(Self::CannotSaveAttachment),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::CannotAccessDocument => "cannot access document",
            Self::CannotLoadFileWrappers => "document is not a package",
            Self::CannotLoadText => "cannot load text",
            Self::CannotAccessAttachments => "cannot access attachments",
            Self::CannotSaveText => "cannot save text",
            Self::CannotSaveAttachment => "cannot save attachment",
        };
        f.write_str(msg)
    }
}

fn context_suffix(context: &Option<String>) -> String {
    context.as_ref().map(|c| format!(": {c}")).unwrap_or_default()
}

/// A failed open or save: the kind, plus optional context (usually the
/// offending entry name or location) and the lower-level cause.
#[derive(Debug, thiserror::Error)]
#[error("{}{}", .kind, context_suffix(.context))]
pub struct NoteError {
    kind: ErrorKind,
    context: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl NoteError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            source: None,
        }
    }

    /// Attach context such as an entry name or a location.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }
}

impl From<ErrorKind> for NoteError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result alias for codec and document operations.
pub type NoteResult<T> = Result<T, NoteError>;
