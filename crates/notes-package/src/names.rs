//! Fixed package entry names and entry-name validation.
//!
//! Valid entry names:
//! - Must be non-empty
//! - Must not be `.` or `..`
//! - Must not contain `/` or NUL

use std::fmt;

use crate::error::{PackageError, PackageResult};

/// Characters that are forbidden anywhere in an entry name.
const FORBIDDEN_CHARS: &[char] = &['/', '\0'];

/// The entries a Notes package reserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackageFilename {
    /// The RTF-encoded note text.
    TextFile,
    /// Directory holding one file per attachment.
    AttachmentsDirectory,
}

impl PackageFilename {
    /// All reserved names.
    pub const ALL: [PackageFilename; 2] = [Self::TextFile, Self::AttachmentsDirectory];

    /// The on-disk name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextFile => "Text.rtf",
            Self::AttachmentsDirectory => "Attachments",
        }
    }

    /// Look up a reserved name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for PackageFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PackageFilename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validate a single entry name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use notes_package::validate_entry_name;
///
/// assert!(validate_entry_name("Text.rtf").is_ok());
/// assert!(validate_entry_name("").is_err());
/// assert!(validate_entry_name("a/b").is_err());
/// ```
pub fn validate_entry_name(name: &str) -> PackageResult<()> {
    if name.is_empty() {
        return Err(PackageError::InvalidEntryName {
            name: name.to_string(),
            reason: "entry name must not be empty".into(),
        });
    }

    if name == "." || name == ".." {
        return Err(PackageError::InvalidEntryName {
            name: name.to_string(),
            reason: "must not be '.' or '..'".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(PackageError::InvalidEntryName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    Ok(())
}
