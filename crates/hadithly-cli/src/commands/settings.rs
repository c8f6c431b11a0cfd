//! Display settings command handlers

use anyhow::{bail, Context, Result};

use hadithly_core::Language;

use crate::output::{Output, OutputFormat};
use crate::settings::Settings;

/// Show current display settings
pub fn show(output: &Output) -> Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        OutputFormat::Quiet => {
            println!("{}", settings.language.code());
        }
        OutputFormat::Human => {
            println!("Settings:");
            println!(
                "  language:    {} ({})",
                settings.language.code(),
                settings.language.native_name()
            );
            println!("  auto_save:   {}", settings.auto_save);
            println!("  show_arabic: {}", settings.show_arabic);
            println!("  pure_arabic: {}", settings.pure_arabic);
            println!();
            println!("Settings file: {}", Settings::settings_file_path().display());
        }
    }

    Ok(())
}

/// Set a display setting
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut settings = Settings::load().context("Failed to load settings")?;

    match key.as_str() {
        "language" => {
            settings.language = Language::from_code(&value)
                .ok_or_else(|| anyhow::anyhow!("Unknown language code: '{}' (use ar, en, ru)", value))?;
        }
        "auto_save" => {
            settings.auto_save = parse_bool(&key, &value)?;
        }
        "show_arabic" => {
            settings.show_arabic = parse_bool(&key, &value)?;
        }
        "pure_arabic" => {
            settings.pure_arabic = parse_bool(&key, &value)?;
        }
        _ => {
            bail!(
                "Unknown settings key: '{}'\n\
                 Valid keys: language, auto_save, show_arabic, pure_arabic",
                key
            );
        }
    }

    settings.save().context("Failed to save settings")?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("Invalid value for {}. Use 'true' or 'false'.", key))
}
