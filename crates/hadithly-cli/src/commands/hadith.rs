//! Saved hadith command handlers

use anyhow::{anyhow, Context, Result};

use hadithly_core::{FetchCache, Hadith, HttpSource, Library};

use crate::output::Output;

/// Fetch a hadith from a remote page and save it
pub async fn save(
    cache: &FetchCache<HttpSource>,
    library: &Library,
    collection: String,
    book: u32,
    page: u32,
    number: u32,
    output: &Output,
) -> Result<()> {
    let hadith = fetch_one(cache, &collection, book, page, number).await?;

    library
        .items()
        .upsert(&hadith)
        .context("Failed to save hadith")?;

    output.success(&format!("Saved {}", hadith.id));
    output.print_hadith(&hadith);
    Ok(())
}

/// Toggle the saved state of a hadith from a remote page
pub async fn toggle(
    cache: &FetchCache<HttpSource>,
    library: &Library,
    collection: String,
    book: u32,
    page: u32,
    number: u32,
    output: &Output,
) -> Result<()> {
    let hadith = fetch_one(cache, &collection, book, page, number).await?;

    let saved = library
        .toggle_saved(&hadith)
        .context("Failed to toggle hadith")?;

    if saved {
        output.success(&format!("Saved {}", hadith.id));
    } else {
        output.success(&format!("Removed {}", hadith.id));
    }
    Ok(())
}

/// List all saved hadiths
pub fn list(library: &Library, output: &Output) -> Result<()> {
    let hadiths = library.all_saved().context("Failed to list hadiths")?;
    output.print_hadiths(&hadiths);
    Ok(())
}

/// Show a single saved hadith
pub fn show(library: &Library, id: String, output: &Output) -> Result<()> {
    let hadith = library
        .items()
        .get(&id)
        .context("Failed to look up hadith")?
        .ok_or_else(|| anyhow!("Hadith not saved: {}", id))?;

    output.print_hadith(&hadith);
    Ok(())
}

/// Delete a saved hadith
pub fn delete(library: &Library, id: String, output: &Output) -> Result<()> {
    if !library.is_saved(&id).context("Failed to look up hadith")? {
        output.message(&format!("Hadith not saved: {}", id));
        return Ok(());
    }

    library.items().delete(&id).context("Failed to delete hadith")?;
    output.success(&format!("Deleted {}", id));
    Ok(())
}

/// Fetch a page and pick one hadith out of it by number
async fn fetch_one(
    cache: &FetchCache<HttpSource>,
    collection: &str,
    book: u32,
    page: u32,
    number: u32,
) -> Result<Hadith> {
    let hadiths = cache
        .fetch_page(collection, book, page)
        .await
        .context("Failed to fetch page")?;

    hadiths
        .into_iter()
        .find(|h| h.hadith_number == number)
        .ok_or_else(|| {
            anyhow!(
                "Hadith {} not on {} book {} page {}",
                number,
                collection,
                book,
                page
            )
        })
}
