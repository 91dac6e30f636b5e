//! lexmetrics-store: Resource store implementations.
//!
//! Implements the `ResourceStore` trait over resource files on disk and over
//! an in-memory list, plus the configuration that selects between them.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;

pub use config::{create_store, load_config, LexmetricsConfig, StoreConfig};
pub use error::StoreError;
pub use file::FileStore;
pub use memory::InMemoryStore;
