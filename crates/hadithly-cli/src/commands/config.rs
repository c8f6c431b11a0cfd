//! Config command handlers

use anyhow::{bail, Context, Result};

use hadithly_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the effective configuration and where it came from
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("data_dir:     {}", config.data_dir.display());
            println!("api_base_url: {}", config.api_base_url);
            println!("(file: {})", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Change one configuration value and persist it
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => config.data_dir = value.clone().into(),
        "api_base_url" => config.api_base_url = value.clone(),
        other => bail!("Unknown configuration key '{other}' (expected data_dir or api_base_url)"),
    }

    config.save().context("Failed to save configuration")?;
    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
