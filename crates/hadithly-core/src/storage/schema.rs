//! SQLite schema for the hadith store
//!
//! Two record tables plus a junction table for folder membership. The
//! junction table keeps member lists ordered (position column) and unique
//! (composite primary key). There is deliberately no foreign key from
//! `folder_items.hadith_id` to `hadiths`: membership entries are soft
//! references and may outlive the hadith they point at.

use rusqlite::{Connection, OptionalExtension, Result};

/// Version written to `schema_info` on init; bumped on breaking changes
pub const SCHEMA_VERSION: u32 = 1;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS hadiths (
    id TEXT PRIMARY KEY,
    collection TEXT NOT NULL,
    book_number INTEGER NOT NULL,
    hadith_number INTEGER NOT NULL,
    text_ar TEXT NOT NULL,
    text_en TEXT NOT NULL,
    text_ru TEXT NOT NULL,
    narrator TEXT NOT NULL,
    grade TEXT NOT NULL,
    reference TEXT NOT NULL,
    saved_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS folders (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS folder_items (
    folder_id TEXT NOT NULL,
    hadith_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (folder_id, hadith_id),
    FOREIGN KEY (folder_id) REFERENCES folders(id) ON DELETE CASCADE
);

-- saved list and folder list are both served most-recent-first;
-- folder contents in insertion order
CREATE INDEX IF NOT EXISTS idx_hadiths_saved_at ON hadiths(saved_at);
CREATE INDEX IF NOT EXISTS idx_folders_created_at ON folders(created_at);
CREATE INDEX IF NOT EXISTS idx_folder_items_position
    ON folder_items(folder_id, position);
"#;

/// Create all tables and indexes and stamp the schema version
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?)",
        [SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Whether the database is missing the schema or carries an older version
pub fn needs_init(conn: &Connection) -> bool {
    match stored_version(conn) {
        Ok(Some(version)) => version < SCHEMA_VERSION,
        _ => true,
    }
}

/// The version stamped into `schema_info`, if any
fn stored_version(conn: &Connection) -> Result<Option<u32>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_info WHERE key = 'version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.and_then(|v| v.parse().ok()))
}
