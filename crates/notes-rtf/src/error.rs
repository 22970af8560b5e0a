/// Errors from rich-text transcoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscodeError {
    /// The payload does not start with an `{\rtf` group.
    #[error("missing RTF header")]
    MissingHeader,

    /// A closing brace appeared with no open group.
    #[error("unbalanced group close at byte {offset}")]
    UnbalancedGroup { offset: usize },

    /// The payload ended before the outermost group was closed.
    #[error("document ended with {open} unclosed group(s)")]
    UnterminatedDocument { open: usize },

    /// Non-whitespace content follows the outermost group.
    #[error("trailing content after document at byte {offset}")]
    TrailingContent { offset: usize },

    /// A `\'hh` escape did not carry two hex digits.
    #[error("invalid hex escape at byte {offset}")]
    InvalidHexEscape { offset: usize },

    /// A control word parameter is out of range.
    #[error("invalid parameter for \\{word} at byte {offset}")]
    InvalidParameter { word: String, offset: usize },

    /// The styled text cannot be represented by this transcoder.
    #[error("unsupported content: {0}")]
    Unsupported(String),
}

/// Result alias for transcoding operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;
