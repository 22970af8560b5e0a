use crate::error::TranscodeResult;
use crate::reader::RtfReader;
use crate::text::StyledText;
use crate::writer::RtfWriter;

/// Converts styled text to a rich-text byte encoding and back.
///
/// Implementations must be deterministic: encoding the same styled text twice
/// yields identical bytes.
pub trait RichTextTranscoder: Send + Sync {
    /// Encode styled text into bytes.
    fn to_bytes(&self, text: &StyledText) -> TranscodeResult<Vec<u8>>;

    /// Decode bytes into styled text. Malformed input is an error, never a
    /// partial result.
    fn from_bytes(&self, data: &[u8]) -> TranscodeResult<StyledText>;
}

impl<T: RichTextTranscoder + ?Sized> RichTextTranscoder for &T {
    fn to_bytes(&self, text: &StyledText) -> TranscodeResult<Vec<u8>> {
        (**self).to_bytes(text)
    }

    fn from_bytes(&self, data: &[u8]) -> TranscodeResult<StyledText> {
        (**self).from_bytes(data)
    }
}

/// The bundled RTF engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct RtfTranscoder;

impl RtfTranscoder {
    pub fn new() -> Self {
        Self
    }
}

impl RichTextTranscoder for RtfTranscoder {
    fn to_bytes(&self, text: &StyledText) -> TranscodeResult<Vec<u8>> {
        RtfWriter::new().write(text)
    }

    fn from_bytes(&self, data: &[u8]) -> TranscodeResult<StyledText> {
        RtfReader::new(data).read()
    }
}
