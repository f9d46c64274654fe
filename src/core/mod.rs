//! Core application functionality
//!
//! This module contains the core logic shared by the library and the binary:
//! - Command table state, stores and history
//! - Settings, config file and CLI handling
//! - Process-level error handling

pub mod cli;
pub mod config_file;
pub mod platform;
pub mod settings;
pub mod state;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use settings::EditorSettings;
