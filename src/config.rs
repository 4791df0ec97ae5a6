//! Message source configuration loader.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::locale::Locale;

const DEFAULT_CONFIG_FILE: &str = "messages.config.json";

/// Settings describing where bundles live and how missing messages are handled.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageSourceConfig {
    /// Comma-separated list of basenames, e.g. `"messages, errors"`.
    pub basename: String,
    /// Directory that bundle paths resolve against.
    pub resource_root: String,
    /// Locale tag tried when the requested locale has no message.
    pub fallback_locale: Option<String>,
    /// Return the message code itself instead of failing when nothing matches.
    pub use_code_as_default_message: bool,
    /// Parse messages as templates even when no arguments are supplied.
    pub always_use_message_format: bool,
    /// Try `<basename>.json` after all locale-specific candidates.
    pub include_base_file: bool,
    /// Keep parsed bundles in memory for the lifetime of the source.
    pub cache_bundles: bool,
}

impl Default for MessageSourceConfig {
    fn default() -> Self {
        Self {
            basename: "messages".into(),
            resource_root: ".".into(),
            fallback_locale: None,
            use_code_as_default_message: false,
            always_use_message_format: false,
            include_base_file: false,
            cache_bundles: true,
        }
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse a JSON configuration file.
    Json {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
    /// Failed to parse a YAML configuration file.
    Yaml {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_yaml::Error,
    },
}

impl MessageSourceConfig {
    /// Load `messages.config.json` from `dir`, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged before the defaults
    /// are used so startup can continue.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.exists() {
            return Self::default();
        }

        Self::from_path(&candidate).unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default message source configuration");
            Self::default()
        })
    }

    /// Read configuration from a JSON file, or YAML when the extension is `yaml`/`yml`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            parse_yaml(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        } else {
            parse_json(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    /// Basenames parsed from the comma-separated [`basename`](Self::basename) field.
    pub fn basenames(&self) -> BTreeSet<String> {
        split_basenames(&self.basename)
    }

    /// Fallback locale, ignoring tags that do not parse.
    pub fn fallback_locale(&self) -> Option<Locale> {
        let tag = self.fallback_locale.as_deref()?;
        match tag.parse() {
            Ok(locale) => Some(locale),
            Err(err) => {
                warn!(tag, error = %err, "ignoring invalid fallback locale");
                None
            }
        }
    }

    /// Directory that bundle paths resolve against, relative to `base_dir`.
    pub fn resource_root_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.resource_root)
    }
}

// Structs deserialize from sequences by position, so the top level is checked first.
fn parse_json(content: &str) -> Result<MessageSourceConfig, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_object() {
        return Err(serde::de::Error::custom(
            "configuration must be a JSON object",
        ));
    }
    serde_json::from_value(value)
}

fn parse_yaml(content: &str) -> Result<MessageSourceConfig, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    if !value.is_mapping() {
        return Err(serde::de::Error::custom(
            "configuration must be a YAML mapping",
        ));
    }
    serde_yaml::from_value(value)
}

/// Split a comma-delimited basename list, removing all whitespace and empty entries.
pub fn split_basenames(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(|entry| entry.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|entry| !entry.is_empty())
        .collect()
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Json { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            Self::Yaml { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Yaml { source, .. } => Some(source),
        }
    }
}
