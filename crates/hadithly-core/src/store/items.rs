//! Saved hadith store
//!
//! Upsert-by-id semantics: saving a hadith that already exists overwrites
//! its text and metadata and refreshes `saved_at`; the identifying fields
//! (collection, book number, hadith number) keep their original values.
//! Every mutating call commits before returning.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, Transaction};
use tracing::debug;

use crate::models::{Hadith, Language};
use crate::storage::{Database, StorageResult};

/// CRUD store for saved hadiths
#[derive(Clone)]
pub struct HadithStore {
    db: Database,
}

impl HadithStore {
    /// Create a store backed by the given database handle
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert or update a hadith
    ///
    /// On id conflict the text, narrator, grade, and reference are
    /// overwritten and `saved_at` is reset to now. Never creates a
    /// duplicate row for an id.
    pub fn upsert(&self, hadith: &Hadith) -> StorageResult<()> {
        let now = Utc::now();
        self.db.with_conn(|conn| {
            insert_or_update(conn, hadith, now)?;
            Ok(())
        })?;
        debug!(id = %hadith.id, "hadith saved");
        Ok(())
    }

    /// Delete a hadith by id
    ///
    /// Deleting a non-existent id is a no-op, not an error.
    pub fn delete(&self, id: &str) -> StorageResult<()> {
        self.db.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM hadiths WHERE id = ?", params![id])?;
            if removed > 0 {
                debug!(id = %id, "hadith deleted");
            }
            Ok(())
        })
    }

    /// Get a hadith by id
    pub fn get(&self, id: &str) -> StorageResult<Option<Hadith>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_HADITH} WHERE id = ?"))?;
            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_hadith(row)?)),
                None => Ok(None),
            }
        })
    }

    /// Get all saved hadiths, most recently saved first
    pub fn list_all(&self) -> StorageResult<Vec<Hadith>> {
        self.db.with_conn(read_all_hadiths)
    }

    /// Check whether a hadith id is saved
    pub fn exists(&self, id: &str) -> StorageResult<bool> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT 1 FROM hadiths WHERE id = ?")?;
            Ok(stmt.exists(params![id])?)
        })
    }

    /// Toggle the saved state of a hadith, returning the new state
    ///
    /// Runs as one transaction, so two racing toggles on the same id
    /// serialize instead of double-inverting.
    pub fn toggle(&self, hadith: &Hadith) -> StorageResult<bool> {
        let now = Utc::now();
        let saved = self.db.with_tx(|tx| {
            let mut stmt = tx.prepare("SELECT 1 FROM hadiths WHERE id = ?")?;
            if stmt.exists(params![hadith.id])? {
                tx.execute("DELETE FROM hadiths WHERE id = ?", params![hadith.id])?;
                Ok(false)
            } else {
                insert_or_update(tx, hadith, now)?;
                Ok(true)
            }
        })?;
        debug!(id = %hadith.id, saved = saved, "hadith toggled");
        Ok(saved)
    }

    /// Get count of saved hadiths
    pub fn count(&self) -> StorageResult<i64> {
        self.db.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM hadiths", [], |row| row.get(0))?)
        })
    }
}

const SELECT_HADITH: &str = "SELECT id, collection, book_number, hadith_number, \
     text_ar, text_en, text_ru, narrator, grade, reference, saved_at FROM hadiths";

/// Upsert a single row; identifying fields are kept on conflict
fn insert_or_update(
    conn: &Connection,
    hadith: &Hadith,
    saved_at: DateTime<Utc>,
) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT INTO hadiths
            (id, collection, book_number, hadith_number,
             text_ar, text_en, text_ru, narrator, grade, reference, saved_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            text_ar = excluded.text_ar,
            text_en = excluded.text_en,
            text_ru = excluded.text_ru,
            narrator = excluded.narrator,
            grade = excluded.grade,
            reference = excluded.reference,
            saved_at = excluded.saved_at
        "#,
        params![
            hadith.id,
            hadith.collection,
            hadith.book_number,
            hadith.hadith_number,
            hadith.text_for(Language::Arabic),
            hadith.text_for(Language::English),
            hadith.text_for(Language::Russian),
            hadith.narrator,
            hadith.grade,
            hadith.reference,
            saved_at.timestamp_millis(),
        ],
    )?;
    Ok(())
}

/// Insert a hadith preserving its own `saved_at` (snapshot import path)
pub(crate) fn insert_preserving_saved_at(
    tx: &Transaction,
    hadith: &Hadith,
) -> rusqlite::Result<()> {
    let saved_at = hadith.saved_at.unwrap_or_else(Utc::now);
    insert_or_update(tx, hadith, saved_at)
}

/// Read every saved hadith, most recently saved first
pub(crate) fn read_all_hadiths(conn: &Connection) -> StorageResult<Vec<Hadith>> {
    let mut stmt = conn.prepare(&format!("{SELECT_HADITH} ORDER BY saved_at DESC, id"))?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u32>(2)?,
            row.get::<_, u32>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
            row.get::<_, String>(9)?,
            row.get::<_, i64>(10)?,
        ))
    })?;

    let mut hadiths = Vec::new();
    for row in rows {
        let (id, collection, book_number, hadith_number, ar, en, ru, narrator, grade, reference, saved_at) =
            row?;
        hadiths.push(build_hadith(
            id, collection, book_number, hadith_number, ar, en, ru, narrator, grade, reference,
            saved_at,
        ));
    }
    Ok(hadiths)
}

fn row_to_hadith(row: &Row<'_>) -> StorageResult<Hadith> {
    Ok(build_hadith(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

#[allow(clippy::too_many_arguments)]
fn build_hadith(
    id: String,
    collection: String,
    book_number: u32,
    hadith_number: u32,
    ar: String,
    en: String,
    ru: String,
    narrator: String,
    grade: String,
    reference: String,
    saved_at: i64,
) -> Hadith {
    let mut text = BTreeMap::new();
    text.insert(Language::Arabic, ar);
    text.insert(Language::English, en);
    text.insert(Language::Russian, ru);

    let saved_at = DateTime::from_timestamp_millis(saved_at).unwrap_or_else(Utc::now);

    Hadith {
        id,
        collection,
        book_number,
        hadith_number,
        text,
        narrator,
        grade,
        reference,
        saved_at: Some(saved_at),
    }
}
