//! Host-facing message lookup layered over [`BundleResolver`].

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::bundle::{FileSystemLoader, ResourceLoader};
use crate::config::{MessageSourceConfig, split_basenames};
use crate::format::{MessageArg, MessageTemplate};
use crate::locale::Locale;
use crate::resolver::BundleResolver;

/// Returned when no bundle provides a message and no default applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoSuchMessageError {
  /// Code that was requested.
  pub code: String,
  /// Locale the lookup was made for.
  pub locale: Locale,
}

impl std::fmt::Display for NoSuchMessageError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "no message found under code '{}' for locale '{}'",
      self.code, self.locale
    )
  }
}

impl std::error::Error for NoSuchMessageError {}

/// Message lookup with fallback-locale and default-message policy.
#[derive(Debug)]
pub struct MessageSource {
  resolver: BundleResolver,
  fallback_locale: Option<Locale>,
  use_code_as_default_message: bool,
  always_use_message_format: bool,
}

impl MessageSource {
  /// Start building a message source.
  pub fn builder() -> MessageSourceBuilder {
    MessageSourceBuilder::default()
  }

  /// Build a file-backed source from configuration, resolving paths against `base_dir`.
  pub fn from_config(config: &MessageSourceConfig, base_dir: &Path) -> Self {
    let loader = FileSystemLoader::new(config.resource_root_path(base_dir));
    Self::builder()
      .basenames(config.basenames())
      .loader(Arc::new(loader))
      .fallback_locale(config.fallback_locale())
      .use_code_as_default_message(config.use_code_as_default_message)
      .always_use_message_format(config.always_use_message_format)
      .include_base_file(config.include_base_file)
      .cache_bundles(config.cache_bundles)
      .build()
  }

  /// Underlying resolver.
  pub fn resolver(&self) -> &BundleResolver {
    &self.resolver
  }

  /// Render the message for `code`, trying the fallback locale before giving up.
  ///
  /// When nothing matches, the code itself is returned if
  /// `use_code_as_default_message` is set; otherwise [`NoSuchMessageError`].
  pub fn get_message(
    &self,
    code: &str,
    args: &[MessageArg],
    locale: &Locale,
  ) -> Result<String, NoSuchMessageError> {
    if let Some(message) = self.lookup(code, args, locale) {
      return Ok(message);
    }
    if self.use_code_as_default_message {
      return Ok(code.to_string());
    }
    Err(NoSuchMessageError {
      code: code.to_string(),
      locale: locale.clone(),
    })
  }

  /// Render the message for `code`, or format `default_message` with `args` when absent.
  pub fn get_message_or(
    &self,
    code: &str,
    args: &[MessageArg],
    default_message: &str,
    locale: &Locale,
  ) -> String {
    self.lookup(code, args, locale).unwrap_or_else(|| {
      if args.is_empty() && !self.always_use_message_format {
        default_message.to_string()
      } else {
        MessageTemplate::new(default_message, locale.clone()).format(args)
      }
    })
  }

  fn lookup(&self, code: &str, args: &[MessageArg], locale: &Locale) -> Option<String> {
    let fallback = self
      .fallback_locale
      .as_ref()
      .filter(|fallback| *fallback != locale);

    std::iter::once(locale)
      .chain(fallback)
      .find_map(|candidate| self.render(code, args, candidate))
  }

  fn render(&self, code: &str, args: &[MessageArg], locale: &Locale) -> Option<String> {
    if args.is_empty() && !self.always_use_message_format {
      return self.resolver.resolve_without_arguments(code, locale);
    }
    self
      .resolver
      .resolve(code, locale)
      .map(|template| template.format(args))
  }
}

/// Builder for [`MessageSource`].
#[derive(Default)]
pub struct MessageSourceBuilder {
  basenames: BTreeSet<String>,
  loader: Option<Arc<dyn ResourceLoader>>,
  fallback_locale: Option<Locale>,
  use_code_as_default_message: bool,
  always_use_message_format: bool,
  include_base_file: bool,
  cache_disabled: bool,
}

impl MessageSourceBuilder {
  /// Set basenames from a comma-delimited list; whitespace is removed.
  pub fn basename(mut self, value: &str) -> Self {
    self.basenames = split_basenames(value);
    self
  }

  /// Set basenames from an explicit list.
  pub fn basenames<I, S>(mut self, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.basenames = values.into_iter().map(Into::into).collect();
    self
  }

  /// Resource loader used to open bundles. Defaults to the current directory.
  pub fn loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
    self.loader = Some(loader);
    self
  }

  /// Locale tried after the requested one.
  pub fn fallback_locale(mut self, locale: Option<Locale>) -> Self {
    self.fallback_locale = locale;
    self
  }

  /// Return the code when no message is found.
  pub fn use_code_as_default_message(mut self, enabled: bool) -> Self {
    self.use_code_as_default_message = enabled;
    self
  }

  /// Treat argument-less messages as templates too.
  pub fn always_use_message_format(mut self, enabled: bool) -> Self {
    self.always_use_message_format = enabled;
    self
  }

  /// Try the bare basename file after locale candidates.
  pub fn include_base_file(mut self, enabled: bool) -> Self {
    self.include_base_file = enabled;
    self
  }

  /// Cache parsed bundles (the default).
  pub fn cache_bundles(mut self, enabled: bool) -> Self {
    self.cache_disabled = !enabled;
    self
  }

  /// Finish building.
  pub fn build(self) -> MessageSource {
    let loader = self
      .loader
      .unwrap_or_else(|| Arc::new(FileSystemLoader::new(".")));
    let resolver = BundleResolver::new(self.basenames, loader)
      .with_cache(!self.cache_disabled)
      .with_base_file(self.include_base_file);

    MessageSource {
      resolver,
      fallback_locale: self.fallback_locale,
      use_code_as_default_message: self.use_code_as_default_message,
      always_use_message_format: self.always_use_message_format,
    }
  }
}
