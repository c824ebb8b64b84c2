//! Table layout and input tokenization settings, passed explicitly to the builder and runner.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{DfaError, EPSILON};

/// The default marker designating the start state.
pub const DEFAULT_START_MARKER: &str = "-->";
/// The default marker designating a final (accepting) state.
pub const DEFAULT_FINAL_MARKER: &str = "*";

/// Describes how a table lays out its markers and header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Text that marks the start row when it appears in the marker cell.
    pub start_marker: String,
    /// Text that marks a final row when it appears in the marker cell.
    pub final_marker: String,
    /// Index of the header row holding the alphabet. Rows above it are ignored.
    pub header_row: usize,
    /// How input strings are split into symbols.
    pub tokenization: Tokenization,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            start_marker: DEFAULT_START_MARKER.to_string(),
            final_marker: DEFAULT_FINAL_MARKER.to_string(),
            header_row: 0,
            tokenization: Tokenization::default(),
        }
    }
}

impl TableConfig {
    /// Parses a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, DfaError> {
        let config: TableConfig =
            toml::from_str(content).map_err(|e| DfaError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, DfaError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DfaError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded table configuration");
        Self::from_toml_str(&content)
    }

    /// Checks that the markers can be told apart and the separator is usable.
    pub fn validate(&self) -> Result<(), DfaError> {
        self.check().map_err(DfaError::ConfigError)
    }

    /// Markers are matched by substring, so neither may be empty or contain the other.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.start_marker.is_empty() || self.final_marker.is_empty() {
            return Err("Start and final markers must not be empty".to_string());
        }

        if self.start_marker.contains(self.final_marker.as_str())
            || self.final_marker.contains(self.start_marker.as_str())
        {
            return Err(format!(
                "Start marker '{}' and final marker '{}' overlap; neither may contain the other",
                self.start_marker, self.final_marker
            ));
        }

        if let Tokenization::Separated { separator } = &self.tokenization {
            if separator.is_empty() {
                return Err("Token separator must not be empty".to_string());
            }
        }

        Ok(())
    }
}

/// How an input string is split into alphabet symbols.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tokenization {
    /// Every character is one symbol.
    #[default]
    Chars,
    /// Symbols are separated by `separator`; `" "` splits on any run of whitespace.
    Separated { separator: String },
}

impl Tokenization {
    /// Splits `input` into symbols. Empty tokens are epsilon and are dropped.
    pub fn tokenize<'a>(&self, input: &'a str) -> Vec<&'a str> {
        match self {
            Tokenization::Chars => input
                .char_indices()
                .map(|(i, c)| &input[i..i + c.len_utf8()])
                .collect(),
            Tokenization::Separated { separator } if separator.trim().is_empty() => {
                input.split_whitespace().collect()
            }
            Tokenization::Separated { separator } => input
                .split(separator.as_str())
                .map(str::trim)
                .filter(|token| *token != EPSILON)
                .collect(),
        }
    }
}
