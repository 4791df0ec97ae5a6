//! Flat key/value message stores parsed from JSON bundle files.

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use serde_json::{Map, Value};

use super::loader::{ResourceError, ResourceLoader};

/// Parsed content of a single bundle file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
  messages: HashMap<String, String>,
}

/// Errors that make a bundle file unusable.
#[derive(Debug)]
pub enum BundleError {
  /// The resource exists but could not be read.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The resource is not valid JSON or its top level is not an object.
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// A value is a nested object or array rather than a scalar.
  Shape {
    /// Path that caused the error.
    path: PathBuf,
    /// Key holding the structured value.
    key: String,
  },
}

impl Bundle {
  /// Look up the raw message stored under `code`.
  pub fn get(&self, code: &str) -> Option<&str> {
    self.messages.get(code).map(String::as_str)
  }

  /// Number of messages in the bundle.
  pub fn len(&self) -> usize {
    self.messages.len()
  }

  /// Whether the bundle holds no messages.
  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }

  /// Parse a bundle from a JSON reader.
  ///
  /// The top level must be an object. String values are kept as-is, numbers and booleans
  /// are stored in their JSON text form, `null` entries are dropped, and nested objects or
  /// arrays reject the whole bundle.
  pub fn from_reader(path: &str, reader: impl Read) -> Result<Self, BundleError> {
    let object: Map<String, Value> =
      serde_json::from_reader(reader).map_err(|err| classify_read_error(path, err))?;

    let mut messages = HashMap::with_capacity(object.len());
    for (key, value) in object {
      let text = match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null => continue,
        Value::Array(_) | Value::Object(_) => {
          return Err(BundleError::Shape {
            path: PathBuf::from(path),
            key,
          });
        }
      };
      messages.insert(key, text);
    }

    Ok(Self { messages })
  }

  /// Open `path` through `loader` and parse it.
  ///
  /// A missing resource is an empty bundle, not an error.
  pub fn load(loader: &dyn ResourceLoader, path: &str) -> Result<Self, BundleError> {
    match loader.open(path) {
      Ok(reader) => Self::from_reader(path, reader),
      Err(ResourceError::NotFound) => Ok(Self::default()),
      Err(ResourceError::Io { path, source }) => Err(BundleError::Io { path, source }),
    }
  }
}

impl<K, V> FromIterator<(K, V)> for Bundle
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      messages: iter
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect(),
    }
  }
}

fn classify_read_error(path: &str, err: serde_json::Error) -> BundleError {
  if err.is_io() {
    BundleError::Io {
      path: PathBuf::from(path),
      source: err.into(),
    }
  } else {
    BundleError::Parse {
      path: PathBuf::from(path),
      source: err,
    }
  }
}

impl std::fmt::Display for BundleError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io { path, source } => {
        write!(f, "failed to read {}: {}", path.display(), source)
      }
      Self::Parse { path, source } => {
        write!(f, "failed to parse {}: {}", path.display(), source)
      }
      Self::Shape { path, key } => {
        write!(
          f,
          "failed to parse {}: value for '{}' is not a string",
          path.display(),
          key
        )
      }
    }
  }
}

impl std::error::Error for BundleError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io { source, .. } => Some(source),
      Self::Parse { source, .. } => Some(source),
      Self::Shape { .. } => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bundle::loader::MemoryLoader;

  fn parse(json: &str) -> Result<Bundle, BundleError> {
    Bundle::from_reader("messages.json", json.as_bytes())
  }

  #[test]
  fn reads_flat_string_values() {
    let bundle = parse(r#"{"greeting": "Bonjour {0}", "farewell": "Au revoir"}"#)
      .expect("bundle should parse");

    assert_eq!(bundle.len(), 2);
    assert_eq!(bundle.get("greeting"), Some("Bonjour {0}"));
    assert_eq!(bundle.get("missing"), None);
  }

  #[test]
  fn stringifies_scalar_values_and_drops_nulls() {
    let bundle = parse(r#"{"count": 3, "ratio": 1.5, "enabled": true, "unset": null}"#)
      .expect("scalars should be coerced");

    assert_eq!(bundle.get("count"), Some("3"));
    assert_eq!(bundle.get("ratio"), Some("1.5"));
    assert_eq!(bundle.get("enabled"), Some("true"));
    assert_eq!(bundle.get("unset"), None);
  }

  #[test]
  fn rejects_nested_objects() {
    let err = parse(r#"{"ok": "fine", "nested": {"a": "b"}}"#).unwrap_err();
    assert!(matches!(err, BundleError::Shape { ref key, .. } if key == "nested"));
  }

  #[test]
  fn rejects_arrays() {
    let err = parse(r#"{"list": ["a"]}"#).unwrap_err();
    assert!(matches!(err, BundleError::Shape { .. }));
  }

  #[test]
  fn rejects_non_object_documents() {
    assert!(matches!(parse(r#"["a", "b"]"#), Err(BundleError::Parse { .. })));
    assert!(matches!(parse("{not json"), Err(BundleError::Parse { .. })));
  }

  #[test]
  fn missing_resource_loads_as_empty_bundle() {
    let loader = MemoryLoader::new();
    let bundle = Bundle::load(&loader, "messages_en.json").expect("missing is not an error");
    assert!(bundle.is_empty());
  }

  /// Yields a partial document, then fails.
  struct TruncatedReader {
    remaining: &'static [u8],
  }

  impl Read for TruncatedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
      if self.remaining.is_empty() {
        return Err(std::io::Error::new(
          std::io::ErrorKind::ConnectionReset,
          "stream dropped",
        ));
      }
      let count = buf.len().min(self.remaining.len());
      buf[..count].copy_from_slice(&self.remaining[..count]);
      self.remaining = &self.remaining[count..];
      Ok(count)
    }
  }

  #[test]
  fn read_failures_midway_are_io_errors() {
    let reader = TruncatedReader {
      remaining: br#"{"greeting": "Bon"#,
    };
    let err = Bundle::from_reader("messages_fr.json", reader).unwrap_err();

    assert!(matches!(err, BundleError::Io { .. }), "got {err:?}");
    assert!(err.to_string().contains("messages_fr.json"));
  }

  #[test]
  fn parse_errors_name_the_file() {
    let loader = MemoryLoader::new().with_file("messages_de.json", "{");
    let err = Bundle::load(&loader, "messages_de.json").unwrap_err();
    assert!(err.to_string().contains("messages_de.json"));
  }
}
