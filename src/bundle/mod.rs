//! Bundle loading: resource access, JSON parsing and the shared parse cache.

pub mod cache;
pub mod loader;
pub mod store;

pub use cache::BundleCache;
pub use loader::{FileSystemLoader, MemoryLoader, ResourceError, ResourceLoader};
pub use store::{Bundle, BundleError};
