//! Tolerant RTF reader.
//!
//! Understands the character formatting [`TextAttributes`] can express and
//! skips everything else: destination groups (font and color tables, style
//! sheets, document info, `\*` extensions) are dropped wholesale and unknown
//! control words are ignored. Structural damage (missing header, unbalanced
//! braces, trailing garbage) is an error.

use tracing::trace;

use crate::error::{TranscodeError, TranscodeResult};
use crate::text::{normalize_font_size, StyledText, TextAttributes};

/// Control words that open a destination whose content is not body text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "expandedcolortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "filetbl",
];

/// Windows-1252 code points for bytes 0x80..=0x9F. Unassigned bytes map to
/// the matching C1 control, as Windows does.
const CP1252_HIGH: [u16; 32] = [
    0x20AC, 0x0081, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160,
    0x2039, 0x0152, 0x008D, 0x017D, 0x008F, 0x0090, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022,
    0x2013, 0x2014, 0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x009D, 0x017E, 0x0178,
];

fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => char::from_u32(CP1252_HIGH[(byte - 0x80) as usize] as u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER),
        _ => byte as char,
    }
}

/// Per-group parser state, saved on `{` and restored on `}`.
#[derive(Clone, Copy, Debug)]
struct GroupState {
    attributes: TextAttributes,
    /// Inside a destination whose text is discarded.
    skip: bool,
    /// Fallback characters to skip after each `\uN` (`\ucN`).
    unicode_skip: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            attributes: TextAttributes::plain(),
            skip: false,
            unicode_skip: 1,
        }
    }
}

/// Reads one RTF document into [`StyledText`].
pub struct RtfReader<'a> {
    data: &'a [u8],
    pos: usize,
    state: GroupState,
    stack: Vec<GroupState>,
    /// Set right after `{`, cleared by the first token in the group.
    group_start: bool,
    /// Remaining `\uN` fallback characters to swallow.
    pending_skip: usize,
    /// High surrogate waiting for its pair.
    pending_high: Option<u16>,
    text: StyledText,
}

impl<'a> RtfReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            state: GroupState::default(),
            stack: Vec::new(),
            group_start: false,
            pending_skip: 0,
            pending_high: None,
            text: StyledText::new(),
        }
    }

    /// Parse the whole document.
    pub fn read(mut self) -> TranscodeResult<StyledText> {
        self.skip_whitespace();
        if !self.data[self.pos..].starts_with(b"{\\rtf") {
            return Err(TranscodeError::MissingHeader);
        }

        while self.pos < self.data.len() {
            let byte = self.data[self.pos];
            match byte {
                b'{' => {
                    self.pos += 1;
                    self.stack.push(self.state);
                    self.group_start = true;
                }
                b'}' => {
                    let offset = self.pos;
                    self.pos += 1;
                    self.group_start = false;
                    self.state = self
                        .stack
                        .pop()
                        .ok_or(TranscodeError::UnbalancedGroup { offset })?;
                    if self.stack.is_empty() {
                        return self.finish();
                    }
                }
                b'\\' => {
                    self.pos += 1;
                    self.control()?;
                    self.group_start = false;
                }
                b'\r' | b'\n' => {
                    self.pos += 1;
                }
                _ => {
                    self.pos += 1;
                    self.group_start = false;
                    self.emit(cp1252_char(byte));
                }
            }
        }

        Err(TranscodeError::UnterminatedDocument {
            open: self.stack.len(),
        })
    }

    fn finish(mut self) -> TranscodeResult<StyledText> {
        self.skip_whitespace();
        while self.pos < self.data.len() && self.data[self.pos] == 0 {
            self.pos += 1;
        }
        if self.pos < self.data.len() {
            return Err(TranscodeError::TrailingContent { offset: self.pos });
        }
        self.flush_surrogate();
        trace!(runs = self.text.runs().len(), "rtf document read");
        Ok(self.text)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    /// Handle the token following a backslash.
    fn control(&mut self) -> TranscodeResult<()> {
        let Some(&next) = self.data.get(self.pos) else {
            return Ok(());
        };

        if next.is_ascii_alphabetic() {
            let offset = self.pos;
            let word = self.read_word();
            let param = self.read_param(&word, offset)?;
            if self.data.get(self.pos) == Some(&b' ') {
                self.pos += 1;
            }
            self.apply_word(&word, param, offset)
        } else {
            self.pos += 1;
            match next {
                b'\\' | b'{' | b'}' => self.emit(next as char),
                b'\'' => {
                    let offset = self.pos - 2;
                    let hex = self
                        .data
                        .get(self.pos..self.pos + 2)
                        .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
                        .and_then(|h| std::str::from_utf8(h).ok())
                        .and_then(|h| u8::from_str_radix(h, 16).ok())
                        .ok_or(TranscodeError::InvalidHexEscape { offset })?;
                    self.pos += 2;
                    self.emit(cp1252_char(hex));
                }
                b'*' => {
                    if self.group_start {
                        self.state.skip = true;
                    }
                }
                b'~' => self.emit('\u{A0}'),
                b'_' => self.emit('\u{2011}'),
                b'\n' | b'\r' => self.emit('\n'),
                // Optional hyphen and anything else unknown.
                _ => {}
            }
            Ok(())
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.data[start..self.pos]).into_owned()
    }

    fn read_param(&mut self, word: &str, offset: usize) -> TranscodeResult<Option<i32>> {
        let start = self.pos;
        if self.data.get(self.pos) == Some(&b'-') {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos == digits_start {
            // A lone '-' is not a parameter.
            self.pos = start;
            return Ok(None);
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<i32>().ok())
            .map(Some)
            .ok_or_else(|| TranscodeError::InvalidParameter {
                word: word.to_string(),
                offset,
            })
    }

    fn apply_word(&mut self, word: &str, param: Option<i32>, offset: usize) -> TranscodeResult<()> {
        let on = param != Some(0);
        match word {
            "b" => self.state.attributes.bold = on,
            "i" => self.state.attributes.italic = on,
            "ul" => self.state.attributes.underline = on,
            "ulnone" => self.state.attributes.underline = false,
            "strike" => self.state.attributes.strikethrough = on,
            "fs" => {
                let size = param
                    .and_then(|p| u16::try_from(p).ok())
                    .filter(|p| *p > 0)
                    .ok_or_else(|| TranscodeError::InvalidParameter {
                        word: word.to_string(),
                        offset,
                    })?;
                self.state.attributes.font_size = normalize_font_size(size);
            }
            "plain" => self.state.attributes = TextAttributes::plain(),
            "par" | "line" => self.emit('\n'),
            "tab" => self.emit('\t'),
            "emdash" => self.emit('\u{2014}'),
            "endash" => self.emit('\u{2013}'),
            "bullet" => self.emit('\u{2022}'),
            "lquote" => self.emit('\u{2018}'),
            "rquote" => self.emit('\u{2019}'),
            "ldblquote" => self.emit('\u{201C}'),
            "rdblquote" => self.emit('\u{201D}'),
            "uc" => {
                self.state.unicode_skip = param
                    .and_then(|p| usize::try_from(p).ok())
                    .ok_or_else(|| TranscodeError::InvalidParameter {
                        word: word.to_string(),
                        offset,
                    })?;
            }
            "u" => {
                // Values are signed 16-bit; some writers emit the unsigned form.
                let unit = param
                    .filter(|v| (-0x8000..=0xFFFF).contains(v))
                    .map(|v| if v < 0 { (v + 0x10000) as u16 } else { v as u16 })
                    .ok_or_else(|| TranscodeError::InvalidParameter {
                        word: word.to_string(),
                        offset,
                    })?;
                self.emit_utf16(unit);
                self.pending_skip = self.state.unicode_skip;
            }
            w if SKIPPED_DESTINATIONS.contains(&w) => {
                if self.group_start {
                    self.state.skip = true;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Append a character of body text, honoring skip state.
    fn emit(&mut self, ch: char) {
        if self.pending_skip > 0 {
            self.pending_skip -= 1;
            return;
        }
        if self.state.skip {
            return;
        }
        self.flush_surrogate();
        self.text.push_char(ch, self.state.attributes);
    }

    fn emit_utf16(&mut self, unit: u16) {
        if self.state.skip {
            return;
        }
        match unit {
            0xD800..=0xDBFF => {
                self.flush_surrogate();
                self.pending_high = Some(unit);
            }
            0xDC00..=0xDFFF => match self.pending_high.take() {
                Some(high) => {
                    let ch = char::decode_utf16([high, unit])
                        .next()
                        .and_then(Result::ok)
                        .unwrap_or(char::REPLACEMENT_CHARACTER);
                    self.text.push_char(ch, self.state.attributes);
                }
                None => self
                    .text
                    .push_char(char::REPLACEMENT_CHARACTER, self.state.attributes),
            },
            _ => {
                self.flush_surrogate();
                let ch = char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
                self.text.push_char(ch, self.state.attributes);
            }
        }
    }

    fn flush_surrogate(&mut self) {
        if self.pending_high.take().is_some() {
            self.text
                .push_char(char::REPLACEMENT_CHARACTER, self.state.attributes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::RtfWriter;

    fn read(src: &str) -> TranscodeResult<StyledText> {
        RtfReader::new(src.as_bytes()).read()
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    #[test]
    fn minimal_document_is_empty() {
        let text = read("{\\rtf1}").unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn missing_header_rejected() {
        assert_eq!(read("hello").unwrap_err(), TranscodeError::MissingHeader);
        assert_eq!(read("").unwrap_err(), TranscodeError::MissingHeader);
        assert_eq!(read("{\\pard hello}").unwrap_err(), TranscodeError::MissingHeader);
    }

    #[test]
    fn unterminated_document_rejected() {
        let err = read("{\\rtf1 {\\b bold}").unwrap_err();
        assert_eq!(err, TranscodeError::UnterminatedDocument { open: 1 });
    }

    #[test]
    fn trailing_content_rejected() {
        let err = read("{\\rtf1 a} junk").unwrap_err();
        assert!(matches!(err, TranscodeError::TrailingContent { .. }));
    }

    #[test]
    fn trailing_whitespace_and_nul_allowed() {
        let text = read("  {\\rtf1 a}\r\n\0").unwrap();
        assert_eq!(text.plain_text(), "a");
    }

    #[test]
    fn bad_hex_escape_rejected() {
        let err = read("{\\rtf1 \\'zz}").unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidHexEscape { .. }));
    }

    #[test]
    fn signed_hex_escape_rejected() {
        let err = read("{\\rtf1 \\'+f}").unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidHexEscape { .. }));
    }

    #[test]
    fn out_of_range_unicode_rejected() {
        for src in ["{\\rtf1 \\u65536?}", "{\\rtf1 \\u-32769?}", "{\\rtf1 \\u?}"] {
            let err = read(src).unwrap_err();
            assert!(matches!(err, TranscodeError::InvalidParameter { ref word, .. } if word == "u"));
        }
    }

    #[test]
    fn unsigned_unicode_form_accepted() {
        // 0xD83D 0xDE00 written as unsigned values.
        let text = read("{\\rtf1 \\u55357?\\u56832?}").unwrap();
        assert_eq!(text.plain_text(), "😀");
    }

    // -----------------------------------------------------------------------
    // Formatting
    // -----------------------------------------------------------------------

    #[test]
    fn group_restores_attributes() {
        let text = read("{\\rtf1 a{\\b b}c}").unwrap();
        let runs = text.runs();
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].attributes.bold);
        assert!(runs[1].attributes.bold);
        assert!(!runs[2].attributes.bold);
    }

    #[test]
    fn toggles_with_zero_parameter() {
        let text = read("{\\rtf1 \\b\\i x\\b0 y\\i0\\ul z\\ulnone w}").unwrap();
        let runs = text.runs();
        assert_eq!(runs[0].text, "x");
        assert!(runs[0].attributes.bold && runs[0].attributes.italic);
        assert_eq!(runs[1].text, "y");
        assert!(!runs[1].attributes.bold && runs[1].attributes.italic);
        assert_eq!(runs[2].text, "z");
        assert!(runs[2].attributes.underline && !runs[2].attributes.italic);
        assert_eq!(runs[3].text, "w");
        assert!(runs[3].attributes.is_plain());
    }

    #[test]
    fn plain_resets_everything() {
        let text = read("{\\rtf1 \\b\\strike\\fs40 a\\plain b}").unwrap();
        assert_eq!(text.runs()[0].attributes.font_size, Some(40));
        assert!(text.runs()[1].attributes.is_plain());
    }

    #[test]
    fn default_font_size_reads_as_none() {
        let text = read("{\\rtf1 \\fs24 a}").unwrap();
        assert_eq!(text.runs()[0].attributes.font_size, None);
    }

    #[test]
    fn zero_font_size_rejected() {
        let err = read("{\\rtf1 \\fs0 a}").unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidParameter { .. }));
    }

    // -----------------------------------------------------------------------
    // Text content
    // -----------------------------------------------------------------------

    #[test]
    fn destinations_are_skipped() {
        let src = "{\\rtf1\\ansi{\\fonttbl\\f0\\fswiss Helvetica;}{\\colortbl;\\red255\\green0\\blue0;}\
                   {\\*\\expandedcolortbl;;}{\\info{\\title Secret}}body}";
        assert_eq!(read(src).unwrap().plain_text(), "body");
    }

    #[test]
    fn star_outside_group_start_is_ignored() {
        let text = read("{\\rtf1 {a\\*b}}").unwrap();
        assert_eq!(text.plain_text(), "ab");
    }

    #[test]
    fn paragraph_and_tab_controls() {
        let text = read("{\\rtf1 one\\par\ntwo\\line three\\tab four}").unwrap();
        assert_eq!(text.plain_text(), "one\ntwo\nthree\tfour");
    }

    #[test]
    fn raw_newlines_are_ignored() {
        let text = read("{\\rtf1 a\r\nb}").unwrap();
        assert_eq!(text.plain_text(), "ab");
    }

    #[test]
    fn escaped_literals() {
        let text = read("{\\rtf1 \\\\ \\{ \\}}").unwrap();
        assert_eq!(text.plain_text(), "\\ { }");
    }

    #[test]
    fn hex_escapes_use_cp1252() {
        let text = read("{\\rtf1 caf\\'e9 \\'80}").unwrap();
        assert_eq!(text.plain_text(), "café €");
    }

    #[test]
    fn unicode_escape_skips_fallback() {
        let text = read("{\\rtf1 \\u233?t\\uc2\\u8364 xxy}").unwrap();
        assert_eq!(text.plain_text(), "ét€y");
    }

    #[test]
    fn unicode_surrogate_pair() {
        let text = read("{\\rtf1 \\u-10179?\\u-8704?}").unwrap();
        assert_eq!(text.plain_text(), "😀");
    }

    #[test]
    fn unpaired_surrogate_becomes_replacement() {
        let text = read("{\\rtf1 \\u-10179?a}").unwrap();
        assert_eq!(text.plain_text(), "\u{FFFD}a");
    }

    #[test]
    fn unknown_control_words_ignored() {
        let text = read("{\\rtf1\\cocoartf2639\\pard\\tx560\\pardirnatural hello}").unwrap();
        assert_eq!(text.plain_text(), "hello");
    }

    #[test]
    fn typographic_symbols() {
        let text = read("{\\rtf1 \\ldblquote a\\rdblquote \\emdash \\bullet}").unwrap();
        assert_eq!(text.plain_text(), "\u{201C}a\u{201D}\u{2014}\u{2022}");
    }

    #[test]
    fn reads_writer_output() {
        let mut original = StyledText::new();
        original.push("Title\n", TextAttributes::plain().bold().with_font_size(36));
        original.push("Body with {braces} and \\slashes\\.\t", TextAttributes::plain());
        original.push("naïve", TextAttributes::plain().italic().underline());
        let bytes = RtfWriter::new().write(&original).unwrap();
        assert_eq!(RtfReader::new(&bytes).read().unwrap(), original);
    }
}
