//! Per-filename memo of parsed bundles shared between concurrent lookups.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::store::Bundle;

/// Concurrent cache of parsed bundles keyed by resource path.
///
/// Loading happens outside the lock; when two threads miss on the same path both parse it
/// and the first insert wins, so every caller observes the same `Arc` afterwards.
#[derive(Debug, Default)]
pub struct BundleCache {
  entries: RwLock<HashMap<String, Arc<Bundle>>>,
}

impl BundleCache {
  /// Create an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the cached bundle for `path`, computing it with `load` on a miss.
  pub fn get_or_load<F>(&self, path: &str, load: F) -> Arc<Bundle>
  where
    F: FnOnce() -> Bundle,
  {
    if let Some(bundle) = self.get(path) {
      return bundle;
    }

    let loaded = Arc::new(load());
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(entries.entry(path.to_string()).or_insert(loaded))
  }

  /// Cached bundle for `path`, if one has been loaded.
  pub fn get(&self, path: &str) -> Option<Arc<Bundle>> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries.get(path).cloned()
  }

  /// Number of cached bundles.
  pub fn len(&self) -> usize {
    self
      .entries
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }

  /// Whether nothing has been cached yet.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
