//! Resource access for bundle files, injectable so resolution can run without real I/O.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

const CLASSPATH_PREFIX: &str = "classpath:";
const FILE_PREFIX: &str = "file:";

/// Opens bundle resources by their computed path.
pub trait ResourceLoader: Send + Sync {
  /// Open `path` for reading, reporting [`ResourceError::NotFound`] when it does not exist.
  fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, ResourceError>;
}

/// Errors produced while opening a resource.
#[derive(Debug)]
pub enum ResourceError {
  /// No resource exists at the requested path.
  NotFound,
  /// The resource exists but could not be opened.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
}

impl std::fmt::Display for ResourceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NotFound => f.write_str("resource not found"),
      Self::Io { path, source } => write!(f, "failed to open {}: {}", path.display(), source),
    }
  }
}

impl std::error::Error for ResourceError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::NotFound => None,
      Self::Io { source, .. } => Some(source),
    }
  }
}

/// Path relative to the loader root: `classpath:` and leading slashes removed.
fn relative_path(path: &str) -> &str {
  path
    .strip_prefix(CLASSPATH_PREFIX)
    .unwrap_or(path)
    .trim_start_matches('/')
}

/// Loads resources from a directory on disk.
///
/// Paths prefixed with `classpath:` (or unprefixed) resolve against the root directory;
/// paths prefixed with `file:` are used as given.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
  root: PathBuf,
}

impl FileSystemLoader {
  /// Create a loader rooted at `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Directory that relative resource paths resolve against.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn resolve_path(&self, path: &str) -> PathBuf {
    if let Some(explicit) = path.strip_prefix(FILE_PREFIX) {
      return PathBuf::from(explicit);
    }
    self.root.join(relative_path(path))
  }
}

impl ResourceLoader for FileSystemLoader {
  fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, ResourceError> {
    let full_path = self.resolve_path(path);
    match File::open(&full_path) {
      Ok(file) => Ok(Box::new(file)),
      Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ResourceError::NotFound),
      Err(err) => Err(ResourceError::Io {
        path: full_path,
        source: err,
      }),
    }
  }
}

/// Serves resources from an in-memory map of path to bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
  files: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
  /// Create an empty loader.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `contents` under `path`, replacing any previous entry.
  pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
    let path = path.into();
    self.files.insert(relative_path(&path).to_string(), contents.into());
  }

  /// Builder-style variant of [`MemoryLoader::insert`].
  pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
    self.insert(path, contents);
    self
  }
}

impl ResourceLoader for MemoryLoader {
  fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, ResourceError> {
    let key = relative_path(path);
    self
      .files
      .get(key)
      .map(|contents| Box::new(Cursor::new(contents.clone())) as Box<dyn Read + Send>)
      .ok_or(ResourceError::NotFound)
  }
}
