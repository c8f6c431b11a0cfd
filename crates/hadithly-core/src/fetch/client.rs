//! HTTP client for the remote hadith editions API
//!
//! Each collection is published as one edition per language
//! (e.g. `ara-bukhari`, `eng-bukhari`, `rus-bukhari`), sectioned by book.
//! A page is assembled by fetching the book's section in every language,
//! merging the texts by hadith number, and slicing a fixed-size chunk.
//!
//! The Arabic edition is canonical: if it cannot be fetched the whole page
//! fails. Translation editions are merged best-effort; a missing translation
//! leaves that language's text empty.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::fetch::FetchError;
use crate::models::{Hadith, Language};

/// Number of hadiths per page
pub const PAGE_SIZE: usize = 20;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// A provider of remote hadith pages
///
/// The trait is the seam between the cache and the network; tests substitute
/// an in-memory source to observe how often the network would be hit.
pub trait RemoteSource: Send + Sync + 'static {
    /// Fetch one page of a collection's book
    fn fetch_page(
        &self,
        collection: &str,
        book_number: u32,
        page: u32,
    ) -> impl Future<Output = Result<Vec<Hadith>, FetchError>> + Send;

    /// Fetch a single hadith whose identity the caller does not pick in advance
    fn fetch_random(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<Hadith, FetchError>> + Send;
}

/// Remote source backed by the editions CDN
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source for the given API base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent("Mozilla/5.0 (compatible; Hadithly/0.3)")
            .build()
            .map_err(|e| FetchError::Request {
                url: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Fetch a book's section merged across all language editions
    async fn fetch_section(
        &self,
        collection: &str,
        book_number: u32,
    ) -> Result<Vec<Hadith>, FetchError> {
        let arabic = self
            .get_edition_section(Language::Arabic, collection, book_number)
            .await?;

        let mut translations = HashMap::new();
        for language in [Language::English, Language::Russian] {
            match self
                .get_edition_section(language, collection, book_number)
                .await
            {
                Ok(hadiths) => {
                    translations.insert(language, hadiths);
                }
                Err(e) => {
                    // Arabic is canonical; a missing translation edition
                    // only leaves that language empty.
                    warn!(language = %language, collection = collection, error = %e,
                        "translation edition unavailable");
                }
            }
        }

        Ok(merge_editions(collection, book_number, arabic, translations))
    }

    /// Fetch one language edition of a book's section
    async fn get_edition_section(
        &self,
        language: Language,
        collection: &str,
        book_number: u32,
    ) -> Result<Vec<ApiHadith>, FetchError> {
        let url = self.section_url(language, collection, book_number);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let section: SectionResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(section.hadiths)
    }

    fn section_url(&self, language: Language, collection: &str, book_number: u32) -> String {
        format!(
            "{}/{}-{}/sections/{}.json",
            self.base_url,
            edition_prefix(language),
            collection,
            book_number
        )
    }
}

impl RemoteSource for HttpSource {
    async fn fetch_page(
        &self,
        collection: &str,
        book_number: u32,
        page: u32,
    ) -> Result<Vec<Hadith>, FetchError> {
        let collection = collection.to_lowercase();
        let section = self.fetch_section(&collection, book_number).await?;
        Ok(paginate(section, page))
    }

    async fn fetch_random(&self, collection: &str) -> Result<Hadith, FetchError> {
        let collection = collection.to_lowercase();
        let section = self.fetch_section(&collection, 1).await?;
        if section.is_empty() {
            return Err(FetchError::Empty { collection });
        }

        // No caller-controlled identity: pick by the subsecond clock
        let index = Utc::now().timestamp_subsec_nanos() as usize % section.len();
        Ok(section[index].clone())
    }
}

/// Edition name prefix for a language
fn edition_prefix(language: Language) -> &'static str {
    match language {
        Language::Arabic => "ara",
        Language::English => "eng",
        Language::Russian => "rus",
    }
}

// ==================== Wire format ====================

#[derive(Debug, Deserialize)]
struct SectionResponse {
    #[serde(default)]
    hadiths: Vec<ApiHadith>,
}

#[derive(Debug, Deserialize)]
struct ApiHadith {
    hadithnumber: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    grades: Vec<ApiGrade>,
}

#[derive(Debug, Deserialize)]
struct ApiGrade {
    #[serde(default)]
    grade: String,
}

/// Merge per-language sections into multilingual records
///
/// Arabic drives the record set and the ordering; translations are matched
/// by hadith number and may be missing.
fn merge_editions(
    collection: &str,
    book_number: u32,
    arabic: Vec<ApiHadith>,
    translations: HashMap<Language, Vec<ApiHadith>>,
) -> Vec<Hadith> {
    let by_number: HashMap<Language, HashMap<u32, &ApiHadith>> = translations
        .iter()
        .map(|(language, hadiths)| {
            let index = hadiths
                .iter()
                .map(|h| (h.hadithnumber as u32, h))
                .collect();
            (*language, index)
        })
        .collect();

    arabic
        .iter()
        .filter(|h| h.hadithnumber >= 1.0)
        .map(|api| {
            let number = api.hadithnumber as u32;
            let mut hadith = Hadith::new(
                format!("{}-{}-{}", collection, book_number, number),
                collection,
                book_number,
                number,
                Default::default(),
            );
            hadith.set_text(Language::Arabic, api.text.clone());

            for language in [Language::English, Language::Russian] {
                if let Some(translated) = by_number.get(&language).and_then(|m| m.get(&number)) {
                    hadith.set_text(language, translated.text.clone());
                }
            }

            if let Some(grade) = api
                .grades
                .iter()
                .map(|g| g.grade.trim())
                .find(|g| !g.is_empty())
            {
                hadith.set_grade(grade);
            }
            if let Some(narrator) = extract_narrator(hadith.text_for(Language::English)) {
                hadith.set_narrator(narrator);
            }
            hadith.set_reference(format!("{} {}:{}", capitalize(collection), book_number, number));
            hadith
        })
        .collect()
}

/// Slice one 1-based page out of a merged section
fn paginate(section: Vec<Hadith>, page: u32) -> Vec<Hadith> {
    let start = (page.saturating_sub(1) as usize).saturating_mul(PAGE_SIZE);
    if start >= section.len() {
        return Vec::new();
    }
    let end = (start + PAGE_SIZE).min(section.len());
    section[start..end].to_vec()
}

/// Pull the narrator out of the conventional "Narrated X:" English prefix
fn extract_narrator(english_text: &str) -> Option<String> {
    let rest = english_text.strip_prefix("Narrated ")?;
    let colon = rest.find(':')?;
    if colon == 0 || colon > 80 {
        return None;
    }
    Some(rest[..colon].trim().to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
