//! Library facade
//!
//! Composes the item and folder stores behind the small query surface the
//! presentation layer needs. Store handles are injected, not global: callers
//! decide how many libraries exist per process.

use tracing::debug;

use crate::models::Hadith;
use crate::storage::{StorageError, StorageResult};
use crate::store::{FolderStore, HadithStore};

/// Query surface over saved hadiths and folders
#[derive(Clone)]
pub struct Library {
    items: HadithStore,
    folders: FolderStore,
}

impl Library {
    /// Create a library over the given stores
    pub fn new(items: HadithStore, folders: FolderStore) -> Self {
        Self { items, folders }
    }

    /// The item store
    pub fn items(&self) -> &HadithStore {
        &self.items
    }

    /// The folder store
    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    /// Whether a hadith id is currently saved
    pub fn is_saved(&self, id: &str) -> StorageResult<bool> {
        self.items.exists(id)
    }

    /// All saved hadiths, most recently saved first
    pub fn all_saved(&self) -> StorageResult<Vec<Hadith>> {
        self.items.list_all()
    }

    /// The saved hadiths a folder references, in membership order
    ///
    /// Membership entries are soft references: ids with no saved hadith are
    /// skipped silently rather than reported.
    pub fn items_in_folder(&self, folder_id: &str) -> StorageResult<Vec<Hadith>> {
        let folder = self
            .folders
            .get(folder_id)?
            .ok_or_else(|| StorageError::FolderNotFound {
                id: folder_id.to_string(),
            })?;

        let mut hadiths = Vec::with_capacity(folder.item_ids.len());
        for id in &folder.item_ids {
            if let Some(hadith) = self.items.get(id)? {
                hadiths.push(hadith);
            } else {
                debug!(folder = %folder_id, id = %id, "skipping dangling folder entry");
            }
        }
        Ok(hadiths)
    }

    /// Toggle the saved state of a hadith, returning the new state
    pub fn toggle_saved(&self, hadith: &Hadith) -> StorageResult<bool> {
        self.items.toggle(hadith)
    }
}
