use serde::{Deserialize, Serialize};

/// Default font size in half-points (12pt), as written in every document
/// header.
pub const DEFAULT_FONT_SIZE: u16 = 24;

/// Character-level formatting of a run.
///
/// `font_size` is in half-points; `None` means the document default
/// ([`DEFAULT_FONT_SIZE`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextAttributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub font_size: Option<u16>,
}

impl TextAttributes {
    /// Plain text: no formatting, default size.
    pub const fn plain() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            font_size: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    /// Set the font size in half-points. The default size collapses to `None`
    /// so equal-looking attributes always compare equal. Zero is not a size
    /// and leaves the default in place.
    pub fn with_font_size(mut self, half_points: u16) -> Self {
        self.font_size = match half_points {
            0 => None,
            n => normalize_font_size(n),
        };
        self
    }

    /// The same attributes with an explicit default size collapsed to `None`.
    pub fn normalized(mut self) -> Self {
        self.font_size = self.font_size.and_then(normalize_font_size);
        self
    }

    /// Returns `true` if no formatting differs from the document default.
    pub fn is_plain(&self) -> bool {
        *self == Self::plain()
    }
}

pub(crate) fn normalize_font_size(half_points: u16) -> Option<u16> {
    if half_points == DEFAULT_FONT_SIZE {
        None
    } else {
        Some(half_points)
    }
}

/// A span of text sharing one set of attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub attributes: TextAttributes,
}

impl TextRun {
    pub fn new(text: impl Into<String>, attributes: TextAttributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }
}

/// Attributed text: an ordered sequence of formatted runs.
///
/// Always normalized. Runs are never empty and adjacent runs never share
/// attributes, so two `StyledText` values holding the same characters with
/// the same formatting compare equal regardless of how they were built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TextRun>", into = "Vec<TextRun>")]
pub struct StyledText {
    runs: Vec<TextRun>,
}

impl StyledText {
    /// Create empty styled text.
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Unformatted text.
    pub fn plain(text: impl Into<String>) -> Self {
        let mut styled = Self::new();
        styled.push(&text.into(), TextAttributes::plain());
        styled
    }

    /// Build from arbitrary runs, normalizing as it goes.
    pub fn from_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        let mut styled = Self::new();
        for run in runs {
            styled.push(&run.text, run.attributes);
        }
        styled
    }

    /// Append text with the given attributes, merging into the last run when
    /// the attributes match.
    pub fn push(&mut self, text: &str, attributes: TextAttributes) {
        if text.is_empty() {
            return;
        }
        let attributes = attributes.normalized();
        match self.runs.last_mut() {
            Some(last) if last.attributes == attributes => last.text.push_str(text),
            _ => self.runs.push(TextRun::new(text, attributes)),
        }
    }

    /// Append a single character.
    pub fn push_char(&mut self, ch: char, attributes: TextAttributes) {
        let attributes = attributes.normalized();
        match self.runs.last_mut() {
            Some(last) if last.attributes == attributes => last.text.push(ch),
            _ => self.runs.push(TextRun::new(ch.to_string(), attributes)),
        }
    }

    /// Append another styled text.
    pub fn append(&mut self, other: &StyledText) {
        for run in &other.runs {
            self.push(&run.text, run.attributes);
        }
    }

    /// The normalized runs.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// The text with all formatting dropped.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }

    /// Returns `true` if there is no text at all.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl From<Vec<TextRun>> for StyledText {
    fn from(runs: Vec<TextRun>) -> Self {
        Self::from_runs(runs)
    }
}

impl From<StyledText> for Vec<TextRun> {
    fn from(styled: StyledText) -> Self {
        styled.runs
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_merges_equal_attributes() {
        let mut text = StyledText::new();
        text.push("Hello, ", TextAttributes::plain());
        text.push("world", TextAttributes::plain());
        assert_eq!(text.runs().len(), 1);
        assert_eq!(text.plain_text(), "Hello, world");
    }

    #[test]
    fn push_splits_on_attribute_change() {
        let mut text = StyledText::new();
        text.push("plain ", TextAttributes::plain());
        text.push("bold", TextAttributes::plain().bold());
        text.push(" plain", TextAttributes::plain());
        assert_eq!(text.runs().len(), 3);
        assert!(text.runs()[1].attributes.bold);
    }

    #[test]
    fn empty_runs_are_dropped() {
        let text = StyledText::from_runs(vec![
            TextRun::new("", TextAttributes::plain().bold()),
            TextRun::new("a", TextAttributes::plain()),
            TextRun::new("", TextAttributes::plain().italic()),
            TextRun::new("b", TextAttributes::plain()),
        ]);
        assert_eq!(text.runs(), &[TextRun::new("ab", TextAttributes::plain())]);
    }

    #[test]
    fn default_font_size_collapses() {
        assert_eq!(TextAttributes::plain().with_font_size(DEFAULT_FONT_SIZE), TextAttributes::plain());
        assert_eq!(TextAttributes::plain().with_font_size(36).font_size, Some(36));
    }

    #[test]
    fn zero_font_size_keeps_default() {
        assert_eq!(TextAttributes::plain().with_font_size(0), TextAttributes::plain());
    }

    #[test]
    fn push_collapses_explicit_default_size() {
        let explicit = TextAttributes {
            font_size: Some(DEFAULT_FONT_SIZE),
            ..TextAttributes::plain()
        };
        let mut text = StyledText::new();
        text.push("a", explicit);
        text.push_char('b', explicit);
        text.push("c", TextAttributes::plain());
        assert_eq!(text, StyledText::plain("abc"));
    }

    #[test]
    fn len_counts_characters() {
        let text = StyledText::plain("héllo");
        assert_eq!(text.len(), 5);
        assert!(!text.is_empty());
        assert!(StyledText::new().is_empty());
    }

    #[test]
    fn serde_normalizes_on_deserialize() {
        let json = r#"[{"text":"a","attributes":{"bold":false,"italic":false,"underline":false,"strikethrough":false,"font_size":null}},
                       {"text":"b","attributes":{"bold":false,"italic":false,"underline":false,"strikethrough":false,"font_size":null}}]"#;
        let text: StyledText = serde_json::from_str(json).unwrap();
        assert_eq!(text, StyledText::plain("ab"));
    }
}
