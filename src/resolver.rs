//! Locate a message code across the configured basenames and their locale variants.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bundle::{Bundle, BundleCache, ResourceLoader};
use crate::filenames::candidate_filenames;
use crate::format::MessageTemplate;
use crate::locale::Locale;

/// Extension appended to every candidate filename.
pub const FILENAME_SUFFIX: &str = ".json";

/// Resolves message codes to templates by probing locale-specific JSON bundles.
///
/// Basenames are fixed at construction and iterated in sorted order. For each basename
/// the locale candidates are tried most specific first; the first bundle containing the
/// code wins. Unreadable or malformed bundles are logged and treated as empty.
pub struct BundleResolver {
    basenames: BTreeSet<String>,
    loader: Arc<dyn ResourceLoader>,
    cache: Option<BundleCache>,
    include_base_file: bool,
}

impl std::fmt::Debug for BundleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleResolver")
            .field("basenames", &self.basenames)
            .field("cached_bundles", &self.cache.as_ref().map(BundleCache::len))
            .field("include_base_file", &self.include_base_file)
            .finish_non_exhaustive()
    }
}

impl BundleResolver {
    /// Create a resolver with bundle caching enabled.
    pub fn new<I, S>(basenames: I, loader: Arc<dyn ResourceLoader>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            basenames: basenames.into_iter().map(Into::into).collect(),
            loader,
            cache: Some(BundleCache::new()),
            include_base_file: false,
        }
    }

    /// Enable or disable the parsed bundle cache. Without it every lookup re-reads the file.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(BundleCache::new);
        self
    }

    /// Also try the bare `<basename>.json` after every locale-specific candidate.
    pub fn with_base_file(mut self, enabled: bool) -> Self {
        self.include_base_file = enabled;
        self
    }

    /// Configured basenames in lookup order.
    pub fn basenames(&self) -> impl Iterator<Item = &str> {
        self.basenames.iter().map(String::as_str)
    }

    /// Find `code` for `locale` and wrap it in a template bound to that locale.
    pub fn resolve(&self, code: &str, locale: &Locale) -> Option<MessageTemplate> {
        self.resolve_without_arguments(code, locale)
            .map(|message| MessageTemplate::new(message, locale.clone()))
    }

    /// Find the raw message text for `code` without parsing it as a template.
    pub fn resolve_without_arguments(&self, code: &str, locale: &Locale) -> Option<String> {
        for basename in &self.basenames {
            for filename in self.lookup_filenames(basename, locale) {
                let bundle = self.bundle(&filename);
                if let Some(message) = bundle.get(code) {
                    debug!(code, %locale, filename = filename.as_str(), "resolved message");
                    return Some(message.to_string());
                }
            }
        }

        None
    }

    /// Filenames (without extension) tried for `basename`, in lookup order.
    pub fn lookup_filenames(&self, basename: &str, locale: &Locale) -> Vec<String> {
        let mut filenames = candidate_filenames(basename, locale);
        if self.include_base_file {
            filenames.push(basename.to_string());
        }
        filenames
    }

    fn bundle(&self, filename: &str) -> Arc<Bundle> {
        let path = format!("{filename}{FILENAME_SUFFIX}");
        match &self.cache {
            Some(cache) => cache.get_or_load(&path, || self.load_bundle(&path)),
            None => Arc::new(self.load_bundle(&path)),
        }
    }

    fn load_bundle(&self, path: &str) -> Bundle {
        match Bundle::load(self.loader.as_ref(), path) {
            Ok(bundle) => bundle,
            Err(err) => {
                warn!(filename = path, error = %err, "could not read message bundle");
                Bundle::default()
            }
        }
    }
}
