//! Command line interface for the glyphsmith outline tool
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Many CLI options are documented with
//! examples to help users understand the expected format.

use crate::core::config_file::ConfigFile;
use crate::core::settings::EditorSettings;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// glyphsmith CLI arguments
///
/// Examples:
///   glyphsmith --edit my-font.ufo                       # Summarize a font
///   glyphsmith --edit my-font.ufo --glyph a             # Dump glyph "a" as a command table
///   glyphsmith --edit my-font.ufo --export out.ufo      # Re-encode the font
///   glyphsmith --new-config                             # Create ~/.config/glyphsmith
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "glyphsmith",
    version,
    about = "Glyph outline editing engine for UFO fonts",
    long_about = "glyphsmith loads UFO (Unified Font Object) sources into normalized command tables, the representation its editing, transform and snapping engine works on, and can write them back out through its font codec."
)]
pub struct CliArgs {
    /// Path to a UFO source to open
    #[clap(
        long = "edit",
        short = 'e',
        help = "UFO source to open",
        long_help = "Path to a UFO version 3 directory. Without --glyph, prints a summary of the font's metrics and glyphs."
    )]
    pub font_source: Option<PathBuf>,

    /// Glyph whose command table to print
    #[clap(
        long = "glyph",
        short = 'g',
        help = "Glyph to print as a command table",
        long_help = "Name of a glyph in the default layer. Its outline is converted to a normalized command table and printed as JSON together with its bounds."
    )]
    pub glyph: Option<String>,

    /// Where to write the re-encoded font
    #[clap(
        long = "export",
        short = 'o',
        help = "Write the font through the codec worker",
        long_help = "Convert every glyph to a command table and back, then write the result as a UFO at this path. Runs on the background codec worker."
    )]
    pub export: Option<PathBuf>,

    /// Grid size in font units, overriding the config file
    #[clap(
        long = "grid",
        help = "Grid size in font units",
        long_help = "Grid size used for snapping, in font units. Overrides grid_size from ~/.config/glyphsmith/settings.json."
    )]
    pub grid: Option<f64>,

    /// Also write logs to ~/.config/glyphsmith/logs
    #[clap(
        long = "log-file",
        help = "Write logs to a daily file",
        long_help = "In addition to stderr, write logs to a daily rolling file in ~/.config/glyphsmith/logs."
    )]
    pub log_file: bool,

    /// Initialize user configuration directory with settings
    ///
    /// This creates the ~/.config/glyphsmith directory with:
    /// - settings.json: snapping and editing preferences
    /// - logs/: destination for --log-file
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with settings",
        long_help = "Initialize the ~/.config/glyphsmith directory with a settings.json file holding the default snapping and editing preferences."
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist and are valid before the tool runs,
    /// providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.font_source {
            if !path.exists() {
                return Err(format!(
                    "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
            if !path.is_dir() {
                return Err(format!(
                    "Not a UFO directory: {}\nUFO sources are directories ending in .ufo.",
                    path.display()
                ));
            }
            let meta_info = path.join("metainfo.plist");
            if !meta_info.exists() {
                return Err(format!(
                    "Not a valid UFO directory: missing metainfo.plist in {}\nMake sure this is a valid UFO directory.",
                    path.display()
                ));
            }
        }

        if self.font_source.is_none() && (self.glyph.is_some() || self.export.is_some()) {
            return Err("--glyph and --export need a font source (--edit <font.ufo>)".to_string());
        }

        if let Some(grid) = self.grid {
            if !grid.is_finite() || grid <= 0.0 {
                return Err(format!("Grid size must be a positive number, got {grid}"));
            }
        }

        Ok(())
    }

    /// Get the font source path if provided
    pub fn get_font_source(&self) -> Option<&PathBuf> {
        self.font_source.as_ref()
    }

    /// Resolve editor settings from CLI args, config file, or default
    ///
    /// Priority order:
    /// 1. CLI argument (--grid)
    /// 2. Config file setting (~/.config/glyphsmith/settings.json)
    /// 3. Built-in defaults
    pub fn get_editor_settings(&self) -> EditorSettings {
        let config = ConfigFile::load();
        if config.is_some() {
            debug!("Using settings from config file");
        }
        EditorSettings::from_config(config.as_ref()).with_grid(self.grid)
    }
}
