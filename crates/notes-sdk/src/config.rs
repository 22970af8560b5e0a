use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors from loading a [`DocumentConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Per-document behavior the host can tune.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Whether edits are autosaved over the document in place.
    pub autosaves_in_place: bool,
    /// Name of the window layout the host should load for this document.
    pub window_nib_name: String,
    /// Skip autosaves whose package would be identical to the last save.
    pub skip_unchanged_saves: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            autosaves_in_place: true,
            window_nib_name: "Document".into(),
            skip_unchanged_saves: true,
        }
    }
}

impl DocumentConfig {
    /// Parse from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DocumentConfig::default();
        assert!(c.autosaves_in_place);
        assert_eq!(c.window_nib_name, "Document");
        assert!(c.skip_unchanged_saves);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(DocumentConfig::from_toml_str("").unwrap(), DocumentConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let c = DocumentConfig::from_toml_str("autosaves_in_place = false\n").unwrap();
        assert!(!c.autosaves_in_place);
        assert_eq!(c.window_nib_name, "Document");
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = DocumentConfig::from_toml_str("autosaves_in_place = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = DocumentConfig {
            autosaves_in_place: false,
            window_nib_name: "Compact".into(),
            skip_unchanged_saves: false,
        };
        let s = c.to_toml_string().unwrap();
        assert_eq!(DocumentConfig::from_toml_str(&s).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.toml");
        std::fs::write(&path, "window_nib_name = \"Wide\"\n").unwrap();
        assert_eq!(DocumentConfig::load(&path).unwrap().window_nib_name, "Wide");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = DocumentConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
