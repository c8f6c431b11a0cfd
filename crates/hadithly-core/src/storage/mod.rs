//! Storage layer
//!
//! Handles durable SQLite persistence for hadiths and folders.
//!
//! ## Architecture
//!
//! - **SQLite**: single durable store, one database per data directory
//! - Every mutation runs in its own transaction behind a shared lock, so
//!   mutations serialize and commit all-or-nothing
//!
//! Folder membership is relational: a junction table with a position column
//! keeps member lists ordered and de-duplicated.

pub mod db;
pub mod error;
pub mod schema;

pub use db::Database;
pub use error::{StorageError, StorageResult};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
