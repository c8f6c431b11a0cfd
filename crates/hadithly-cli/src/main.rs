//! Hadithly CLI
//!
//! Command-line interface for Hadithly - saving and organizing
//! multilingual hadith texts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hadithly_core::{
    Config, Database, FetchCache, FolderStore, HadithStore, HttpSource, Library, SnapshotCodec,
};

mod commands;
mod output;
mod settings;

use output::{Output, OutputFormat};
use settings::Settings;

#[derive(Parser)]
#[command(name = "hadithly")]
#[command(about = "Hadithly - save and organize multilingual hadith texts")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a page of a collection's book
    Browse {
        /// Collection name (e.g. bukhari, muslim)
        collection: String,
        /// Book number
        book: u32,
        /// Page number
        #[arg(default_value_t = 1)]
        page: u32,
    },
    /// Fetch a random hadith
    Random {
        /// Collection name
        #[arg(default_value = "bukhari")]
        collection: String,
        /// Save the fetched hadith
        #[arg(long)]
        save: bool,
    },
    /// Fetch a hadith and save it
    Save {
        /// Collection name
        collection: String,
        /// Book number
        book: u32,
        /// Page number
        page: u32,
        /// Hadith number within the book
        number: u32,
    },
    /// Toggle the saved state of a hadith
    Toggle {
        /// Collection name
        collection: String,
        /// Book number
        book: u32,
        /// Page number
        page: u32,
        /// Hadith number within the book
        number: u32,
    },
    /// List saved hadiths
    #[command(alias = "ls")]
    List,
    /// Show a saved hadith
    Show {
        /// Hadith ID
        id: String,
    },
    /// Delete a saved hadith
    #[command(alias = "rm")]
    Delete {
        /// Hadith ID
        id: String,
    },
    /// Manage folders
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Export all saved data to a snapshot file
    Export {
        /// Destination file
        file: PathBuf,
    },
    /// Replace all saved data with a snapshot file's contents
    Import {
        /// Snapshot file to import
        file: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show or set display settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Color tag
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List all folders
    #[command(alias = "ls")]
    List,
    /// Show a folder and its contents
    Show {
        /// Folder ID
        id: String,
    },
    /// Rename a folder or change its color
    Edit {
        /// Folder ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New color tag
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a folder (saved hadiths are kept)
    #[command(alias = "rm")]
    Delete {
        /// Folder ID
        id: String,
    },
    /// Add a saved hadith to a folder
    Add {
        /// Folder ID
        folder_id: String,
        /// Hadith ID
        hadith_id: String,
    },
    /// Remove a hadith from a folder
    Remove {
        /// Folder ID
        folder_id: String,
        /// Hadith ID
        hadith_id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, api_base_url)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand, Clone)]
enum SettingsCommands {
    /// Show current display settings
    Show,
    /// Set a display setting
    Set {
        /// Settings key (language, auto_save, show_arabic, pure_arabic)
        key: String,
        /// Settings value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load().unwrap_or_default();
    let output = Output::new(
        OutputFormat::from_flags(cli.json, cli.quiet),
        settings.clone(),
    );

    // Commands that don't need the store
    match &cli.command {
        Commands::Config { command } => {
            return handle_config_command(command.clone(), &output);
        }
        Commands::Settings { command } => {
            return handle_settings_command(command.clone(), &output);
        }
        _ => {}
    }

    let config = Config::load().context("Failed to load configuration")?;
    let db = Database::open(&config).context("Failed to open database")?;
    let library = Library::new(HadithStore::new(db.clone()), FolderStore::new(db.clone()));
    let codec = SnapshotCodec::new(db);
    let cache = FetchCache::new(
        HttpSource::new(&config.api_base_url).context("Failed to build HTTP client")?,
    );

    match cli.command {
        Commands::Browse {
            collection,
            book,
            page,
        } => commands::fetch::browse(&cache, collection, book, page, &output).await,
        Commands::Random { collection, save } => {
            commands::fetch::random(&cache, &library, collection, save, &settings, &output).await
        }
        Commands::Save {
            collection,
            book,
            page,
            number,
        } => commands::hadith::save(&cache, &library, collection, book, page, number, &output).await,
        Commands::Toggle {
            collection,
            book,
            page,
            number,
        } => {
            commands::hadith::toggle(&cache, &library, collection, book, page, number, &output)
                .await
        }
        Commands::List => commands::hadith::list(&library, &output),
        Commands::Show { id } => commands::hadith::show(&library, id, &output),
        Commands::Delete { id } => commands::hadith::delete(&library, id, &output),
        Commands::Folder { command } => handle_folder_command(command, &library, &output),
        Commands::Export { file } => commands::snapshot::export(&codec, file, &output),
        Commands::Import { file } => commands::snapshot::import(&codec, file, &output),
        Commands::Config { .. } => unreachable!(),   // Handled above
        Commands::Settings { .. } => unreachable!(), // Handled above
    }
}

fn handle_folder_command(
    command: FolderCommands,
    library: &Library,
    output: &Output,
) -> Result<()> {
    match command {
        FolderCommands::Create { name, color } => {
            commands::folder::create(library, name, color, output)
        }
        FolderCommands::List => commands::folder::list(library, output),
        FolderCommands::Show { id } => commands::folder::show(library, id, output),
        FolderCommands::Edit { id, name, color } => {
            commands::folder::edit(library, id, name, color, output)
        }
        FolderCommands::Delete { id } => commands::folder::delete(library, id, output),
        FolderCommands::Add {
            folder_id,
            hadith_id,
        } => commands::folder::add(library, folder_id, hadith_id, output),
        FolderCommands::Remove {
            folder_id,
            hadith_id,
        } => commands::folder::remove(library, folder_id, hadith_id, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

fn handle_settings_command(command: Option<SettingsCommands>, output: &Output) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(output),
        Some(SettingsCommands::Set { key, value }) => commands::settings::set(key, value, output),
    }
}
