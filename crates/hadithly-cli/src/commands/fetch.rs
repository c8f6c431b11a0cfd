//! Remote browsing command handlers

use anyhow::{Context, Result};

use hadithly_core::{FetchCache, HttpSource, Library};

use crate::output::Output;
use crate::settings::Settings;

/// Browse one page of a collection's book (served from cache when possible)
pub async fn browse(
    cache: &FetchCache<HttpSource>,
    collection: String,
    book: u32,
    page: u32,
    output: &Output,
) -> Result<()> {
    let hadiths = cache
        .fetch_page(&collection, book, page)
        .await
        .context("Failed to fetch page")?;

    output.print_hadiths(&hadiths);
    Ok(())
}

/// Fetch a random hadith, optionally saving it
pub async fn random(
    cache: &FetchCache<HttpSource>,
    library: &Library,
    collection: String,
    save: bool,
    settings: &Settings,
    output: &Output,
) -> Result<()> {
    let hadith = cache
        .fetch_random(&collection)
        .await
        .context("Failed to fetch a random hadith")?;

    output.print_hadith(&hadith);

    if save || settings.auto_save {
        library
            .items()
            .upsert(&hadith)
            .context("Failed to save hadith")?;
        output.success(&format!("Saved {}", hadith.id));
    }

    Ok(())
}
