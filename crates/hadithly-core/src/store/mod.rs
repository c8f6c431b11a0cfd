//! Record stores
//!
//! CRUD over saved hadiths and user folders. Both stores share one
//! [`Database`](crate::storage::Database) handle, so their mutations
//! serialize against each other and against snapshot import/export.

pub mod folders;
pub mod items;

pub use folders::FolderStore;
pub use items::HadithStore;
