//! Remote content fetching
//!
//! Retrieves pages of hadiths from the remote editions API and memoizes
//! them by (collection, book, page).
//!
//! ## Behavior
//!
//! 1. A cache hit is served with no network access
//! 2. A miss performs exactly one outbound fetch per key, even when many
//!    callers ask for the same key concurrently (single-flight)
//! 3. Failures are delivered to every waiter and leave no cache entry
//! 4. Random fetches always bypass the cache
//!
//! ## Usage
//!
//! ```ignore
//! let source = HttpSource::new(&config.api_base_url)?;
//! let cache = FetchCache::new(source);
//! let page = cache.fetch_page("bukhari", 1, 1).await?;
//! ```

mod cache;
mod client;

use thiserror::Error;

pub use cache::{FetchCache, PageKey};
pub use client::{HttpSource, RemoteSource, PAGE_SIZE};

/// Errors that can occur while fetching remote content
///
/// Cloneable so one in-flight failure can be handed to every waiter.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    /// Remote answered with a non-success status
    #[error("Remote returned HTTP {status} for '{url}'")]
    Http { status: u16, url: String },

    /// Response body could not be decoded
    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },

    /// Edition exists but contains no hadiths to pick from
    #[error("No hadiths available in collection '{collection}'")]
    Empty { collection: String },

    /// The in-flight fetch this caller was waiting on went away
    #[error("In-flight fetch for '{key}' was dropped before completing")]
    Aborted { key: String },
}
