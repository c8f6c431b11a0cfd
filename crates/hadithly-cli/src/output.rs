//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use hadithly_core::{Folder, Hadith, Language};

use crate::settings::Settings;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
    /// Display settings (which languages to show)
    settings: Settings,
}

impl Output {
    pub fn new(format: OutputFormat, settings: Settings) -> Self {
        Self { format, settings }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single hadith in full
    pub fn print_hadith(&self, hadith: &Hadith) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", hadith.id);
                println!("Reference: {}", hadith.reference);
                if !hadith.narrator.is_empty() {
                    println!("Narrator:  {}", hadith.narrator);
                }
                if !hadith.grade.is_empty() {
                    println!("Grade:     {}", hadith.grade);
                }
                if let Some(saved_at) = hadith.saved_at {
                    println!("Saved:     {}", saved_at.format("%Y-%m-%d %H:%M"));
                }
                println!();
                for language in self.display_languages() {
                    let text = hadith.text_for(language);
                    if !text.is_empty() {
                        println!("[{}] {}", language.code(), text);
                        println!();
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(hadith).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", hadith.id);
            }
        }
    }

    /// Print a list of hadiths, one line each
    pub fn print_hadiths(&self, hadiths: &[Hadith]) {
        match self.format {
            OutputFormat::Human => {
                if hadiths.is_empty() {
                    println!("No hadiths found.");
                    return;
                }
                let preview_language = if self.settings.pure_arabic {
                    Language::Arabic
                } else {
                    self.settings.language
                };
                for hadith in hadiths {
                    let mut preview = hadith.text_for(preview_language);
                    if preview.is_empty() {
                        preview = hadith.arabic_text();
                    }
                    println!(
                        "{} | {} | {}",
                        hadith.id,
                        hadith.reference,
                        truncate(preview, 60)
                    );
                }
                println!("\n{} hadith(s)", hadiths.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(hadiths).unwrap());
            }
            OutputFormat::Quiet => {
                for hadith in hadiths {
                    println!("{}", hadith.id);
                }
            }
        }
    }

    /// Print a single folder with its member count
    pub fn print_folder(&self, folder: &Folder) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", folder.id);
                println!("Name:    {}", folder.name);
                println!("Color:   {}", folder.color);
                println!("Created: {}", folder.created_at.format("%Y-%m-%d %H:%M"));
                println!("Items:   {}", folder.item_ids.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(folder).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", folder.id);
            }
        }
    }

    /// Print a list of folders
    pub fn print_folders(&self, folders: &[Folder]) {
        match self.format {
            OutputFormat::Human => {
                if folders.is_empty() {
                    println!("No folders found.");
                    return;
                }
                for folder in folders {
                    println!(
                        "{} | {} ({}) | {} item(s)",
                        folder.id,
                        folder.name,
                        folder.color,
                        folder.item_ids.len()
                    );
                }
                println!("\n{} folder(s)", folders.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(folders).unwrap());
            }
            OutputFormat::Quiet => {
                for folder in folders {
                    println!("{}", folder.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message (human mode only)
    pub fn message(&self, msg: &str) {
        if matches!(self.format, OutputFormat::Human) {
            println!("{}", msg);
        }
    }

    /// Languages to render, respecting the Arabic display toggles
    fn display_languages(&self) -> Vec<Language> {
        if self.settings.pure_arabic {
            return vec![Language::Arabic];
        }
        let mut languages = Vec::new();
        if self.settings.show_arabic {
            languages.push(Language::Arabic);
        }
        if self.settings.language != Language::Arabic {
            languages.push(self.settings.language);
        }
        if languages.is_empty() {
            languages.push(Language::Arabic);
        }
        languages
    }
}

/// Truncate a string for single-line previews
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        // Quiet wins over json
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        let long = "a".repeat(20);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_display_languages_pure_arabic() {
        let output = Output::new(
            OutputFormat::Human,
            Settings {
                pure_arabic: true,
                ..Settings::default()
            },
        );
        assert_eq!(output.display_languages(), vec![Language::Arabic]);
    }

    #[test]
    fn test_display_languages_with_translation() {
        let output = Output::new(
            OutputFormat::Human,
            Settings {
                language: Language::Russian,
                ..Settings::default()
            },
        );
        assert_eq!(
            output.display_languages(),
            vec![Language::Arabic, Language::Russian]
        );
    }

    #[test]
    fn test_display_languages_arabic_hidden() {
        let output = Output::new(
            OutputFormat::Human,
            Settings {
                show_arabic: false,
                ..Settings::default()
            },
        );
        assert_eq!(output.display_languages(), vec![Language::English]);
    }
}
