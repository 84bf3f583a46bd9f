#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;
pub mod sqlite;

pub use catalog::{CatalogLoadError, load_catalog_dir};
pub use repository::{InMemoryRepository, SessionStateRepository, StateKey, Storage, StorageError};
