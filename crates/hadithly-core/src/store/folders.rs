//! User folder store
//!
//! Folders group saved hadith ids. Membership lives in a junction table
//! keyed by (folder_id, hadith_id) with a position column, so member lists
//! stay ordered and duplicate-free at the storage level. Membership entries
//! are soft references: they may point at hadiths that were deleted later.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::debug;

use crate::models::Folder;
use crate::storage::{Database, StorageError, StorageResult};

/// CRUD store for user folders and their membership lists
#[derive(Clone)]
pub struct FolderStore {
    db: Database,
}

impl FolderStore {
    /// Create a store backed by the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert or update a folder
    ///
    /// On id conflict the name, color, and membership list are overwritten;
    /// the original `created_at` is preserved. The stored membership list is
    /// de-duplicated in first-occurrence order.
    pub fn upsert(&self, folder: &Folder) -> StorageResult<()> {
        self.db.with_tx(|tx| {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT created_at FROM folders WHERE id = ?",
                    params![folder.id],
                    |row| row.get(0),
                )
                .optional()?;

            match existing {
                Some(_) => {
                    tx.execute(
                        "UPDATE folders SET name = ?, color = ? WHERE id = ?",
                        params![folder.name, folder.color, folder.id],
                    )?;
                }
                None => {
                    tx.execute(
                        "INSERT INTO folders (id, name, color, created_at) VALUES (?, ?, ?, ?)",
                        params![
                            folder.id,
                            folder.name,
                            folder.color,
                            folder.created_at.timestamp_millis()
                        ],
                    )?;
                }
            }

            write_members(tx, &folder.id, &folder.item_ids)?;
            Ok(())
        })?;
        debug!(id = %folder.id, "folder saved");
        Ok(())
    }

    /// Delete a folder by id
    ///
    /// Removes the folder and its membership rows only; member hadiths are
    /// untouched. Deleting a non-existent id is a no-op.
    pub fn delete(&self, id: &str) -> StorageResult<()> {
        self.db.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM folders WHERE id = ?", params![id])?;
            if removed > 0 {
                debug!(id = %id, "folder deleted");
            }
            Ok(())
        })
    }

    /// Get a folder by id, with its membership list
    pub fn get(&self, id: &str) -> StorageResult<Option<Folder>> {
        self.db.with_conn(|conn| {
            let header = conn
                .query_row(
                    "SELECT id, name, color, created_at FROM folders WHERE id = ?",
                    params![id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                        ))
                    },
                )
                .optional()?;

            match header {
                Some((id, name, color, created_at)) => {
                    let item_ids = read_members(conn, &id)?;
                    Ok(Some(build_folder(id, name, color, created_at, item_ids)))
                }
                None => Ok(None),
            }
        })
    }

    /// Get all folders, most recently created first
    pub fn list_all(&self) -> StorageResult<Vec<Folder>> {
        self.db.with_conn(read_all_folders)
    }

    /// Append a hadith id to a folder's membership list
    ///
    /// Fails with [`StorageError::FolderNotFound`] if the folder does not
    /// exist. Adding an id that is already a member is a no-op, so calling
    /// this twice never produces a duplicate entry.
    pub fn add_member(&self, folder_id: &str, hadith_id: &str) -> StorageResult<()> {
        self.db.with_tx(|tx| {
            require_folder(tx, folder_id)?;
            tx.execute(
                r#"
                INSERT OR IGNORE INTO folder_items (folder_id, hadith_id, position)
                VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0)
                               FROM folder_items WHERE folder_id = ?))
                "#,
                params![folder_id, hadith_id, folder_id],
            )?;
            Ok(())
        })
    }

    /// Remove a hadith id from a folder's membership list
    ///
    /// Fails with [`StorageError::FolderNotFound`] if the folder does not
    /// exist; removing an id that is not a member is a no-op.
    pub fn remove_member(&self, folder_id: &str, hadith_id: &str) -> StorageResult<()> {
        self.db.with_tx(|tx| {
            require_folder(tx, folder_id)?;
            tx.execute(
                "DELETE FROM folder_items WHERE folder_id = ? AND hadith_id = ?",
                params![folder_id, hadith_id],
            )?;
            Ok(())
        })
    }

    /// Get count of folders
    pub fn count(&self) -> StorageResult<i64> {
        self.db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM folders", [], |row| row.get(0))?)
        })
    }
}

/// Error unless the folder exists
fn require_folder(conn: &Connection, folder_id: &str) -> StorageResult<()> {
    let mut stmt = conn.prepare("SELECT 1 FROM folders WHERE id = ?")?;
    if stmt.exists(params![folder_id])? {
        Ok(())
    } else {
        Err(StorageError::FolderNotFound {
            id: folder_id.to_string(),
        })
    }
}

/// Replace a folder's membership rows, de-duplicating in order
fn write_members(tx: &Transaction, folder_id: &str, item_ids: &[String]) -> rusqlite::Result<()> {
    tx.execute(
        "DELETE FROM folder_items WHERE folder_id = ?",
        params![folder_id],
    )?;

    let mut position = 0i64;
    for hadith_id in item_ids {
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO folder_items (folder_id, hadith_id, position) VALUES (?, ?, ?)",
            params![folder_id, hadith_id, position],
        )?;
        if inserted > 0 {
            position += 1;
        }
    }
    Ok(())
}

/// Insert a folder row and its membership (snapshot import path)
pub(crate) fn insert_folder_tx(tx: &Transaction, folder: &Folder) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO folders (id, name, color, created_at) VALUES (?, ?, ?, ?)",
        params![
            folder.id,
            folder.name,
            folder.color,
            folder.created_at.timestamp_millis()
        ],
    )?;
    write_members(tx, &folder.id, &folder.item_ids)
}

/// Read every folder, most recently created first
pub(crate) fn read_all_folders(conn: &Connection) -> StorageResult<Vec<Folder>> {
    let mut stmt = conn
        .prepare("SELECT id, name, color, created_at FROM folders ORDER BY created_at DESC, id")?;
    let headers = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut folders = Vec::new();
    for (id, name, color, created_at) in headers {
        let item_ids = read_members(conn, &id)?;
        folders.push(build_folder(id, name, color, created_at, item_ids));
    }
    Ok(folders)
}

fn read_members(conn: &Connection, folder_id: &str) -> StorageResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT hadith_id FROM folder_items WHERE folder_id = ? ORDER BY position")?;
    let ids = stmt
        .query_map(params![folder_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ids)
}

fn build_folder(
    id: String,
    name: String,
    color: String,
    created_at: i64,
    item_ids: Vec<String>,
) -> Folder {
    let created_at = DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now);
    Folder {
        id,
        name,
        color,
        created_at,
        item_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn test_store() -> FolderStore {
        FolderStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_upsert_and_get() {
        let store = test_store();

        let mut folder = Folder::new("Morning reading");
        folder.set_color("blue");
        folder.add_item("h1");
        folder.add_item("h2");
        store.upsert(&folder).unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.name, "Morning reading");
        assert_eq!(found.color, "blue");
        assert_eq!(found.item_ids, vec!["h1", "h2"]);

        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_preserves_created_at() {
        let store = test_store();

        let folder = Folder::new("Favorites");
        store.upsert(&folder).unwrap();
        let original = store.get(&folder.id).unwrap().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));

        let mut renamed = folder.clone();
        renamed.name = "Renamed".to_string();
        renamed.created_at = Utc::now();
        store.upsert(&renamed).unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
        assert_eq!(found.created_at, original.created_at);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_rewrites_membership() {
        let store = test_store();

        let mut folder = Folder::new("Favorites");
        folder.add_item("h1");
        folder.add_item("h2");
        store.upsert(&folder).unwrap();

        folder.item_ids = vec!["h3".to_string()];
        store.upsert(&folder).unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["h3"]);
    }

    #[test]
    fn test_upsert_dedupes_membership() {
        let store = test_store();

        let mut folder = Folder::new("Favorites");
        // Bypass the model-level dedupe to exercise the storage-level one
        folder.item_ids = vec!["h1".to_string(), "h2".to_string(), "h1".to_string()];
        store.upsert(&folder).unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["h1", "h2"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = test_store();

        let mut folder = Folder::new("Favorites");
        folder.add_item("h1");
        store.upsert(&folder).unwrap();

        store.delete(&folder.id).unwrap();
        assert!(store.get(&folder.id).unwrap().is_none());

        // Second delete is a no-op, not an error
        store.delete(&folder.id).unwrap();
    }

    #[test]
    fn test_list_all_most_recent_first() {
        let store = test_store();

        let mut first = Folder::new("First");
        first.created_at = Utc::now() - chrono::Duration::seconds(10);
        store.upsert(&first).unwrap();

        let second = Folder::new("Second");
        store.upsert(&second).unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn test_add_member() {
        let store = test_store();

        let folder = Folder::new("Favorites");
        store.upsert(&folder).unwrap();

        store.add_member(&folder.id, "h1").unwrap();
        store.add_member(&folder.id, "h2").unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["h1", "h2"]);
    }

    #[test]
    fn test_add_member_twice_is_idempotent() {
        let store = test_store();

        let folder = Folder::new("Favorites");
        store.upsert(&folder).unwrap();

        store.add_member(&folder.id, "h1").unwrap();
        store.add_member(&folder.id, "h1").unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["h1"]);
    }

    #[test]
    fn test_add_member_unknown_folder() {
        let store = test_store();

        let err = store.add_member("missing", "h1").unwrap_err();
        assert!(matches!(err, StorageError::FolderNotFound { .. }));
    }

    #[test]
    fn test_remove_member() {
        let store = test_store();

        let folder = Folder::new("Favorites");
        store.upsert(&folder).unwrap();
        store.add_member(&folder.id, "h1").unwrap();
        store.add_member(&folder.id, "h2").unwrap();

        store.remove_member(&folder.id, "h1").unwrap();
        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["h2"]);

        // Removing a non-member is a no-op
        store.remove_member(&folder.id, "h9").unwrap();
    }

    #[test]
    fn test_remove_member_unknown_folder() {
        let store = test_store();

        let err = store.remove_member("missing", "h1").unwrap_err();
        assert!(matches!(err, StorageError::FolderNotFound { .. }));
    }

    #[test]
    fn test_membership_keeps_insertion_order_after_removal() {
        let store = test_store();

        let folder = Folder::new("Favorites");
        store.upsert(&folder).unwrap();
        for id in ["h1", "h2", "h3"] {
            store.add_member(&folder.id, id).unwrap();
        }
        store.remove_member(&folder.id, "h2").unwrap();
        store.add_member(&folder.id, "h4").unwrap();

        let found = store.get(&folder.id).unwrap().unwrap();
        assert_eq!(found.item_ids, vec!["h1", "h3", "h4"]);
    }
}
