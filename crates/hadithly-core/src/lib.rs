//! Hadithly Core Library
//!
//! This crate provides the core functionality for Hadithly, a local-first
//! reader for saving and organizing multilingual hadith texts.
//!
//! # Architecture
//!
//! - **SQLite**: durable store for saved hadiths and user folders
//! - **Snapshot**: one JSON document carrying the full state, for
//!   export/import (import is full-replace and atomic)
//! - **Fetch cache**: remote pages keyed by (collection, book, page),
//!   with single-flight coalescing of concurrent requests
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let db = Database::open(&config)?;
//! let library = Library::new(HadithStore::new(db.clone()), FolderStore::new(db));
//!
//! // Save a hadith
//! library.items().upsert(&hadith)?;
//!
//! // Organize it
//! library.folders().add_member(&folder.id, &hadith.id)?;
//! ```
//!
//! # Modules
//!
//! - `models`: data structures for hadiths, folders, and languages
//! - `store`: CRUD stores for saved hadiths and folders
//! - `snapshot`: full-state export/import
//! - `fetch`: remote page fetching and caching
//! - `facade`: query surface composing the stores
//! - `storage`: SQLite schema and shared database handle
//! - `config`: application configuration

pub mod config;
pub mod facade;
pub mod fetch;
pub mod models;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use config::Config;
pub use facade::Library;
pub use fetch::{FetchCache, FetchError, HttpSource, PageKey, RemoteSource, PAGE_SIZE};
pub use models::{Folder, Hadith, Language};
pub use snapshot::{Snapshot, SnapshotCodec, SnapshotError};
pub use storage::{Database, StorageError, StorageResult};
pub use store::{FolderStore, HadithStore};
