//! Snapshot export/import
//!
//! The snapshot is the only durable interchange format: one JSON document
//! with an `items` and a `folders` sequence. Export reads both tables in a
//! single transaction, so it is a consistent point-in-time view. Import is
//! full-replace: it validates the payload first, then deletes everything and
//! inserts the snapshot contents inside one exclusive transaction. If any
//! step fails the transaction rolls back and the prior state is untouched.
//!
//! There is no version field; a payload that does not match the current
//! schema fails the whole import.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{Folder, Hadith, Language};
use crate::storage::{Database, StorageError};
use crate::store::{folders, items};

/// The full exportable state: all saved hadiths and all folders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub items: Vec<Hadith>,
    pub folders: Vec<Folder>,
}

impl Snapshot {
    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::Parse)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Parse)
    }
}

/// Errors that can occur while exporting or importing a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Payload is not valid JSON for the snapshot shape
    #[error("Snapshot payload could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),

    /// Payload parsed but contains invalid records
    #[error("Snapshot validation failed: {0}")]
    Validation(String),

    /// Underlying storage operation failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Serializes and restores the complete store state
#[derive(Clone)]
pub struct SnapshotCodec {
    db: Database,
}

impl SnapshotCodec {
    /// Create a codec backed by the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Export the complete current state
    ///
    /// Both sequences come from the same lock acquisition, so no mutation
    /// can interleave between reading items and reading folders.
    pub fn export(&self) -> Result<Snapshot, SnapshotError> {
        let snapshot = self.db.with_conn(|conn| {
            Ok(Snapshot {
                items: items::read_all_hadiths(conn)?,
                folders: folders::read_all_folders(conn)?,
            })
        })?;
        info!(
            items = snapshot.items.len(),
            folders = snapshot.folders.len(),
            "exported snapshot"
        );
        Ok(snapshot)
    }

    /// Replace the complete store state with the snapshot contents
    ///
    /// Validation happens before the first destructive statement. The
    /// delete-then-insert sequence runs in one transaction; on any failure
    /// it rolls back and the prior state remains observable.
    pub fn import(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        validate(snapshot)?;

        self.db.with_tx(|tx| {
            tx.execute("DELETE FROM folder_items", [])?;
            tx.execute("DELETE FROM folders", [])?;
            tx.execute("DELETE FROM hadiths", [])?;

            for hadith in &snapshot.items {
                items::insert_preserving_saved_at(tx, hadith)?;
            }
            for folder in &snapshot.folders {
                folders::insert_folder_tx(tx, folder)?;
            }
            Ok(())
        })?;

        info!(
            items = snapshot.items.len(),
            folders = snapshot.folders.len(),
            "imported snapshot"
        );
        Ok(())
    }
}

/// Reject payloads that parsed but cannot describe a valid store state
fn validate(snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let mut seen_items = std::collections::HashSet::new();
    for hadith in &snapshot.items {
        if hadith.id.is_empty() {
            return Err(SnapshotError::Validation(
                "hadith with empty id".to_string(),
            ));
        }
        if !seen_items.insert(hadith.id.as_str()) {
            return Err(SnapshotError::Validation(format!(
                "duplicate hadith id '{}'",
                hadith.id
            )));
        }
        if hadith.book_number < 1 || hadith.hadith_number < 1 {
            return Err(SnapshotError::Validation(format!(
                "hadith '{}' has out-of-range numbering",
                hadith.id
            )));
        }
        if !hadith.text.contains_key(&Language::Arabic) {
            return Err(SnapshotError::Validation(format!(
                "hadith '{}' is missing the canonical (ar) text entry",
                hadith.id
            )));
        }
    }

    let mut seen_folders = std::collections::HashSet::new();
    for folder in &snapshot.folders {
        if folder.id.is_empty() {
            return Err(SnapshotError::Validation(
                "folder with empty id".to_string(),
            ));
        }
        if !seen_folders.insert(folder.id.as_str()) {
            return Err(SnapshotError::Validation(format!(
                "duplicate folder id '{}'",
                folder.id
            )));
        }
        if folder.name.is_empty() {
            return Err(SnapshotError::Validation(format!(
                "folder '{}' has an empty name",
                folder.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::store::{FolderStore, HadithStore};
    use std::collections::BTreeMap;

    fn sample(id: &str) -> Hadith {
        let mut text = BTreeMap::new();
        text.insert(Language::Arabic, "نص".to_string());
        text.insert(Language::English, "Text".to_string());
        let mut hadith = Hadith::new(id, "bukhari", 1, 1, text);
        hadith.set_grade("Sahih");
        hadith
    }

    fn stores() -> (Database, HadithStore, FolderStore, SnapshotCodec) {
        let db = Database::open_in_memory().unwrap();
        (
            db.clone(),
            HadithStore::new(db.clone()),
            FolderStore::new(db.clone()),
            SnapshotCodec::new(db),
        )
    }

    #[test]
    fn test_export_import_round_trip() {
        let (_db, hadiths, folder_store, codec) = stores();

        hadiths.upsert(&sample("h1")).unwrap();
        hadiths.upsert(&sample("h2")).unwrap();

        let mut folder = Folder::new("Favorites");
        folder.add_item("h1");
        folder_store.upsert(&folder).unwrap();

        let before_items = hadiths.list_all().unwrap();
        let before_folders = folder_store.list_all().unwrap();

        let snapshot = codec.export().unwrap();
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();
        codec.import(&restored).unwrap();

        assert_eq!(hadiths.list_all().unwrap(), before_items);
        assert_eq!(folder_store.list_all().unwrap(), before_folders);
    }

    #[test]
    fn test_import_replaces_existing_state() {
        let (_db, hadiths, folder_store, codec) = stores();

        hadiths.upsert(&sample("old")).unwrap();
        let folder = Folder::new("Old folder");
        folder_store.upsert(&folder).unwrap();

        let snapshot = Snapshot {
            items: vec![sample("new")],
            folders: vec![],
        };
        codec.import(&snapshot).unwrap();

        let ids: Vec<String> = hadiths
            .list_all()
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec!["new"]);
        assert!(folder_store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_import_empty_snapshot_clears_stores() {
        let (_db, hadiths, folder_store, codec) = stores();

        hadiths.upsert(&sample("h1")).unwrap();
        folder_store.upsert(&Folder::new("Favorites")).unwrap();

        let snapshot = Snapshot {
            items: vec![],
            folders: vec![],
        };
        codec.import(&snapshot).unwrap();

        assert!(hadiths.list_all().unwrap().is_empty());
        assert!(folder_store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_import_preserves_saved_at() {
        let (_db, hadiths, _folder_store, codec) = stores();

        hadiths.upsert(&sample("h1")).unwrap();
        let before = hadiths.list_all().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));

        let snapshot = codec.export().unwrap();
        codec.import(&snapshot).unwrap();

        assert_eq!(hadiths.list_all().unwrap(), before);
    }

    #[test]
    fn test_corrupt_payload_fails_parse() {
        let err = Snapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));

        let err = Snapshot::from_json(r#"{"items": "nope"}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
    }

    #[test]
    fn test_invalid_snapshot_leaves_state_intact() {
        let (_db, hadiths, folder_store, codec) = stores();

        hadiths.upsert(&sample("keep")).unwrap();

        let snapshot = Snapshot {
            items: vec![sample("new")],
            folders: vec![Folder::new("")],
        };

        let err = codec.import(&snapshot).unwrap_err();
        assert!(matches!(err, SnapshotError::Validation(_)));

        // Prior state is untouched
        let ids: Vec<String> = hadiths
            .list_all()
            .unwrap()
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec!["keep"]);
        assert_eq!(folder_store.count().unwrap(), 0);
    }

    #[test]
    fn test_validation_rejects_duplicate_ids() {
        let snapshot = Snapshot {
            items: vec![sample("h1"), sample("h1")],
            folders: vec![],
        };
        assert!(matches!(
            validate(&snapshot),
            Err(SnapshotError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_numbering() {
        let mut bad = sample("h1");
        bad.book_number = 0;
        let snapshot = Snapshot {
            items: vec![bad],
            folders: vec![],
        };
        assert!(matches!(
            validate(&snapshot),
            Err(SnapshotError::Validation(_))
        ));
    }

    #[test]
    fn test_import_keeps_dangling_membership() {
        let (_db, _hadiths, folder_store, codec) = stores();

        // Folder referencing an id that is not in the snapshot's items:
        // soft references survive import untouched.
        let mut folder = Folder::new("Favorites");
        folder.add_item("gone");
        let snapshot = Snapshot {
            items: vec![],
            folders: vec![folder.clone()],
        };
        codec.import(&snapshot).unwrap();

        let found = folder_store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["gone"]);
    }
}
