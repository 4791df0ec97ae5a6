#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod bundle;
pub mod config;
pub mod filenames;
pub mod format;
pub mod locale;
pub mod resolver;
pub mod source;

pub use bundle::{Bundle, BundleError, FileSystemLoader, MemoryLoader, ResourceError, ResourceLoader};
pub use config::{ConfigError, MessageSourceConfig};
pub use filenames::candidate_filenames;
pub use format::{MessageArg, MessageTemplate};
pub use locale::{Locale, LocaleError};
pub use resolver::BundleResolver;
pub use source::{MessageSource, MessageSourceBuilder, NoSuchMessageError};
