//! Snapshot export/import command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};

use hadithly_core::{Snapshot, SnapshotCodec};

use crate::output::Output;

/// Export the full state to a JSON file
pub fn export(codec: &SnapshotCodec, file: PathBuf, output: &Output) -> Result<()> {
    let snapshot = codec.export().context("Failed to export snapshot")?;
    let json = snapshot.to_json().context("Failed to serialize snapshot")?;

    std::fs::write(&file, json)
        .with_context(|| format!("Failed to write snapshot to {:?}", file))?;

    output.success(&format!(
        "Exported {} hadith(s) and {} folder(s) to {}",
        snapshot.items.len(),
        snapshot.folders.len(),
        file.display()
    ));
    Ok(())
}

/// Replace the full state with a snapshot file's contents
///
/// The import either applies completely or not at all; on any failure the
/// existing data is left untouched.
pub fn import(codec: &SnapshotCodec, file: PathBuf, output: &Output) -> Result<()> {
    let json = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read snapshot from {:?}", file))?;

    let snapshot = Snapshot::from_json(&json).context("Snapshot file is not valid")?;
    codec.import(&snapshot).context("Failed to import snapshot")?;

    output.success(&format!(
        "Imported {} hadith(s) and {} folder(s) from {}",
        snapshot.items.len(),
        snapshot.folders.len(),
        file.display()
    ));
    Ok(())
}
