//! Data models for Hadithly
//!
//! Defines the core data structures: Hadith, Language, and Folder.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A language edition of a hadith text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ru")]
    Russian,
}

impl Language {
    /// All supported languages, canonical (Arabic) first
    pub const ALL: [Language; 3] = [Language::Arabic, Language::English, Language::Russian];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    /// Native display name
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Arabic => "العربية",
            Language::English => "English",
            Language::Russian => "Русский",
        }
    }

    /// Whether this language renders right-to-left
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Arabic)
    }

    /// Parse a two-letter code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ar" => Some(Language::Arabic),
            "en" => Some(Language::English),
            "ru" => Some(Language::Russian),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One multilingual hadith text unit with citation metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hadith {
    /// Stable, origin-assigned identifier
    pub id: String,
    /// Collection this hadith belongs to (e.g. "bukhari")
    pub collection: String,
    /// Book number within the collection (1-based)
    pub book_number: u32,
    /// Hadith number within the book (1-based)
    pub hadith_number: u32,
    /// Text per language; every supported language has an entry
    pub text: BTreeMap<Language, String>,
    /// Narrator attribution (may be empty)
    pub narrator: String,
    /// Authenticity grading (e.g. "Sahih")
    pub grade: String,
    /// Human-readable citation
    pub reference: String,
    /// When this hadith was saved locally; None until first persisted
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Hadith {
    /// Create a new hadith
    ///
    /// The text map is normalized so that every supported language has an
    /// entry; languages missing from the input get an empty string.
    pub fn new(
        id: impl Into<String>,
        collection: impl Into<String>,
        book_number: u32,
        hadith_number: u32,
        text: BTreeMap<Language, String>,
    ) -> Self {
        Self {
            id: id.into(),
            collection: collection.into(),
            book_number,
            hadith_number,
            text: normalize_text(text),
            narrator: String::new(),
            grade: String::new(),
            reference: String::new(),
            saved_at: None,
        }
    }

    /// Get the text for a language (empty string if not present)
    pub fn text_for(&self, language: Language) -> &str {
        self.text.get(&language).map(String::as_str).unwrap_or("")
    }

    /// The canonical (Arabic) text
    pub fn arabic_text(&self) -> &str {
        self.text_for(Language::Arabic)
    }

    /// Set the text for a language
    pub fn set_text(&mut self, language: Language, text: impl Into<String>) {
        self.text.insert(language, text.into());
    }

    /// Set the narrator attribution
    pub fn set_narrator(&mut self, narrator: impl Into<String>) {
        self.narrator = narrator.into();
    }

    /// Set the authenticity grade
    pub fn set_grade(&mut self, grade: impl Into<String>) {
        self.grade = grade.into();
    }

    /// Set the citation reference
    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = reference.into();
    }
}

/// Ensure every supported language has an entry in the text map
pub(crate) fn normalize_text(mut text: BTreeMap<Language, String>) -> BTreeMap<Language, String> {
    for language in Language::ALL {
        text.entry(language).or_default();
    }
    text
}

/// A named, user-created grouping of hadith ids
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Symbolic color tag (not validated against a palette)
    pub color: String,
    /// When this folder was created
    pub created_at: DateTime<Utc>,
    /// Member hadith ids, insertion-ordered, no duplicates
    ///
    /// Ids may reference hadiths that are no longer saved; resolution
    /// skips them at query time.
    pub item_ids: Vec<String>,
}

impl Folder {
    /// Create a new folder with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: "green".to_string(),
            created_at: Utc::now(),
            item_ids: Vec::new(),
        }
    }

    /// Create a folder with a specific id (for loading from storage)
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: "green".to_string(),
            created_at: Utc::now(),
            item_ids: Vec::new(),
        }
    }

    /// Set the color tag
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    /// Append a hadith id unless already present
    pub fn add_item(&mut self, hadith_id: impl Into<String>) {
        let hadith_id = hadith_id.into();
        if !self.item_ids.contains(&hadith_id) {
            self.item_ids.push(hadith_id);
        }
    }

    /// Remove a hadith id if present
    pub fn remove_item(&mut self, hadith_id: &str) {
        if let Some(pos) = self.item_ids.iter().position(|id| id == hadith_id) {
            self.item_ids.remove(pos);
        }
    }

    /// Whether a hadith id is a member of this folder
    pub fn contains(&self, hadith_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == hadith_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> BTreeMap<Language, String> {
        let mut text = BTreeMap::new();
        text.insert(
            Language::Arabic,
            "بِسْمِ اللَّهِ الرَّحْمَٰنِ الرَّحِيمِ".to_string(),
        );
        text.insert(
            Language::English,
            "In the name of Allah, the Most Gracious, the Most Merciful".to_string(),
        );
        text
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::Arabic.code(), "ar");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Russian.code(), "ru");
        assert_eq!(Language::from_code("ru"), Some(Language::Russian));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_language_rtl() {
        assert!(Language::Arabic.is_rtl());
        assert!(!Language::English.is_rtl());
        assert!(!Language::Russian.is_rtl());
    }

    #[test]
    fn test_hadith_new_normalizes_text() {
        let hadith = Hadith::new("bukhari-1-1", "bukhari", 1, 1, sample_text());

        // Russian was missing from the input; normalized to empty
        assert_eq!(hadith.text.len(), 3);
        assert_eq!(hadith.text_for(Language::Russian), "");
        assert!(!hadith.text_for(Language::Arabic).is_empty());
        assert!(hadith.saved_at.is_none());
    }

    #[test]
    fn test_hadith_text_for() {
        let mut hadith = Hadith::new("h1", "bukhari", 1, 1, BTreeMap::new());
        hadith.set_text(Language::Russian, "Во имя Аллаха");

        assert_eq!(hadith.text_for(Language::Russian), "Во имя Аллаха");
        assert_eq!(hadith.arabic_text(), "");
    }

    #[test]
    fn test_hadith_metadata_setters() {
        let mut hadith = Hadith::new("h1", "bukhari", 1, 1, BTreeMap::new());
        hadith.set_narrator("Abu Huraira");
        hadith.set_grade("Sahih");
        hadith.set_reference("Bukhari 1:1");

        assert_eq!(hadith.narrator, "Abu Huraira");
        assert_eq!(hadith.grade, "Sahih");
        assert_eq!(hadith.reference, "Bukhari 1:1");
    }

    #[test]
    fn test_hadith_serialization() {
        let mut hadith = Hadith::new("bukhari-1-1", "bukhari", 1, 1, sample_text());
        hadith.set_grade("Sahih");

        let json = serde_json::to_string(&hadith).unwrap();
        // Language keys serialize as two-letter codes
        assert!(json.contains("\"ar\""));
        assert!(json.contains("\"en\""));

        let deserialized: Hadith = serde_json::from_str(&json).unwrap();
        assert_eq!(hadith, deserialized);
    }

    #[test]
    fn test_folder_new() {
        let folder = Folder::new("Morning reading");
        assert!(!folder.id.is_empty());
        assert_eq!(folder.name, "Morning reading");
        assert_eq!(folder.color, "green");
        assert!(folder.item_ids.is_empty());
    }

    #[test]
    fn test_folder_add_item_dedupes() {
        let mut folder = Folder::new("Favorites");
        folder.add_item("h1");
        folder.add_item("h2");
        folder.add_item("h1");

        assert_eq!(folder.item_ids, vec!["h1", "h2"]);
        assert!(folder.contains("h1"));
        assert!(!folder.contains("h3"));
    }

    #[test]
    fn test_folder_remove_item() {
        let mut folder = Folder::new("Favorites");
        folder.add_item("h1");
        folder.add_item("h2");

        folder.remove_item("h1");
        assert_eq!(folder.item_ids, vec!["h2"]);

        // Removing a missing id is a no-op
        folder.remove_item("h9");
        assert_eq!(folder.item_ids, vec!["h2"]);
    }

    #[test]
    fn test_folder_serialization() {
        let mut folder = Folder::new("Favorites");
        folder.set_color("blue");
        folder.add_item("h1");

        let json = serde_json::to_string(&folder).unwrap();
        let deserialized: Folder = serde_json::from_str(&json).unwrap();
        assert_eq!(folder, deserialized);
    }
}
