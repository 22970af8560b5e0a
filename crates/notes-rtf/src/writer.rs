//! Canonical RTF writer.
//!
//! Output layout:
//! ```text
//! {\rtf1\ansi\ansicpg1252\deff0{\fonttbl\f0\fswiss Helvetica;}
//! \f0\fs24 {\b bold}{ plain}}
//! ```
//! Every run becomes its own group so formatting never leaks between runs.
//! Only 7-bit ASCII is emitted; everything else is written as `\uN?`.

use std::fmt::Write as _;

use crate::error::{TranscodeError, TranscodeResult};
use crate::text::{StyledText, TextAttributes, DEFAULT_FONT_SIZE};

/// Document preamble shared by every written payload.
pub(crate) const HEADER: &str = "{\\rtf1\\ansi\\ansicpg1252\\deff0{\\fonttbl\\f0\\fswiss Helvetica;}\n";

/// Writes [`StyledText`] as RTF.
#[derive(Debug, Default)]
pub struct RtfWriter {
    out: String,
}

impl RtfWriter {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    /// Serialize the styled text, consuming the writer.
    ///
    /// Fails only for attributes the reader would reject, such as a zero
    /// font size.
    pub fn write(mut self, text: &StyledText) -> TranscodeResult<Vec<u8>> {
        self.out.push_str(HEADER);
        let _ = write!(self.out, "\\f0\\fs{DEFAULT_FONT_SIZE} ");
        for run in text.runs() {
            self.out.push('{');
            self.write_attributes(&run.attributes)?;
            self.write_escaped(&run.text);
            self.out.push('}');
        }
        self.out.push('}');
        Ok(self.out.into_bytes())
    }

    fn write_attributes(&mut self, attrs: &TextAttributes) -> TranscodeResult<()> {
        let start = self.out.len();
        if attrs.bold {
            self.out.push_str("\\b");
        }
        if attrs.italic {
            self.out.push_str("\\i");
        }
        if attrs.underline {
            self.out.push_str("\\ul");
        }
        if attrs.strikethrough {
            self.out.push_str("\\strike");
        }
        match attrs.font_size {
            Some(0) => return Err(TranscodeError::Unsupported("font size 0".into())),
            Some(DEFAULT_FONT_SIZE) | None => {}
            Some(size) => {
                let _ = write!(self.out, "\\fs{size}");
            }
        }
        if self.out.len() > start {
            // Delimiter: consumed by the reader, never part of the text.
            self.out.push(' ');
        }
        Ok(())
    }

    fn write_escaped(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\\' => self.out.push_str("\\\\"),
                '{' => self.out.push_str("\\{"),
                '}' => self.out.push_str("\\}"),
                '\n' => self.out.push_str("\\par\n"),
                '\t' => self.out.push_str("\\tab "),
                ' '..='~' => self.out.push(ch),
                _ => {
                    let mut units = [0u16; 2];
                    for unit in ch.encode_utf16(&mut units) {
                        // RTF carries UTF-16 code units as signed 16-bit values.
                        let _ = write!(self.out, "\\u{}?", *unit as i16);
                    }
                }
            }
        }
    }
}
