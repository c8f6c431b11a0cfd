//! Command handlers, one module per command group

pub mod config;
pub mod fetch;
pub mod folder;
pub mod hadith;
pub mod settings;
pub mod snapshot;
