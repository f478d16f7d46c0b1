/// Database configuration and connection management
pub mod database;

/// Application settings (display unit, seed templates) from config.toml
pub mod settings;
