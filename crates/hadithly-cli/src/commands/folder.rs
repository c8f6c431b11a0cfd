//! Folder command handlers

use anyhow::{anyhow, Context, Result};

use hadithly_core::{Folder, Library};

use crate::output::Output;

/// Create a new folder
pub fn create(
    library: &Library,
    name: String,
    color: Option<String>,
    output: &Output,
) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Folder name cannot be empty");
    }

    let mut folder = Folder::new(name);
    if let Some(color) = color {
        folder.set_color(color);
    }

    library
        .folders()
        .upsert(&folder)
        .context("Failed to create folder")?;

    output.success(&format!("Created folder: {}", folder.id));
    output.print_folder(&folder);
    Ok(())
}

/// List all folders
pub fn list(library: &Library, output: &Output) -> Result<()> {
    let folders = library.folders().list_all().context("Failed to list folders")?;
    output.print_folders(&folders);
    Ok(())
}

/// Show a folder and the saved hadiths it contains
pub fn show(library: &Library, id: String, output: &Output) -> Result<()> {
    let folder = library
        .folders()
        .get(&id)
        .context("Failed to look up folder")?
        .ok_or_else(|| anyhow!("Folder not found: {}", id))?;

    output.print_folder(&folder);

    let hadiths = library
        .items_in_folder(&id)
        .context("Failed to resolve folder contents")?;
    if !hadiths.is_empty() {
        output.message("");
        output.print_hadiths(&hadiths);
    }
    Ok(())
}

/// Rename a folder or change its color
pub fn edit(
    library: &Library,
    id: String,
    name: Option<String>,
    color: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut folder = library
        .folders()
        .get(&id)
        .context("Failed to look up folder")?
        .ok_or_else(|| anyhow!("Folder not found: {}", id))?;

    if let Some(name) = name {
        if name.trim().is_empty() {
            anyhow::bail!("Folder name cannot be empty");
        }
        folder.name = name;
    }
    if let Some(color) = color {
        folder.set_color(color);
    }

    library
        .folders()
        .upsert(&folder)
        .context("Failed to update folder")?;

    output.success("Folder updated");
    output.print_folder(&folder);
    Ok(())
}

/// Delete a folder (member hadiths stay saved)
pub fn delete(library: &Library, id: String, output: &Output) -> Result<()> {
    library
        .folders()
        .delete(&id)
        .context("Failed to delete folder")?;

    output.success(&format!("Deleted folder {}", id));
    Ok(())
}

/// Add a saved hadith to a folder
pub fn add(library: &Library, folder_id: String, hadith_id: String, output: &Output) -> Result<()> {
    library
        .folders()
        .add_member(&folder_id, &hadith_id)
        .context("Failed to add to folder")?;

    output.success(&format!("Added {} to {}", hadith_id, folder_id));
    Ok(())
}

/// Remove a hadith from a folder
pub fn remove(
    library: &Library,
    folder_id: String,
    hadith_id: String,
    output: &Output,
) -> Result<()> {
    library
        .folders()
        .remove_member(&folder_id, &hadith_id)
        .context("Failed to remove from folder")?;

    output.success(&format!("Removed {} from {}", hadith_id, folder_id));
    Ok(())
}
