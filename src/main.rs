//! Command line front end for the glyphsmith outline engine.
//!
//! Loads a UFO, prints glyphs as normalized command tables, and re-encodes
//! fonts through the background codec worker.

use anyhow::{anyhow, Context, Result};
use glyphsmith::core;
use glyphsmith::core::config_file::ConfigFile;
use glyphsmith::core::settings::EditorSettings;
use glyphsmith::data::{load_font_data, FontData};
use glyphsmith::font_source::FontInfo;
use glyphsmith::geometry::compute_bounds;
use glyphsmith::io::{AssetPayload, CodecWorker, FontSnapshot, UfoCodec};
use std::path::Path;
use tracing::info;

/// Run the tool with the given CLI arguments.
fn run_app(cli_args: core::cli::CliArgs) -> Result<()> {
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory();
    }
    cli_args.validate().map_err(|message| anyhow!(message))?;
    let _log_guard = glyphsmith::logging::init(cli_args.log_file)?;

    let settings = cli_args.get_editor_settings();
    let Some(path) = cli_args.get_font_source() else {
        println!("No font source given. Try --edit <font.ufo> or --help.");
        return Ok(());
    };

    let (info, data) = load_font_data(path)?;
    match &cli_args.glyph {
        Some(name) => print_glyph(&info, &data, name, &settings)?,
        None => print_summary(&info, &data),
    }

    if let Some(output) = &cli_args.export {
        export(info, data, output)?;
    }
    Ok(())
}

fn print_summary(info: &FontInfo, data: &FontData) {
    println!("{}", info.get_display_name());
    println!("  units per em: {}", info.metrics.units_per_em);
    println!("  glyphs: {}", data.glyphs.len());
    let commands: usize = data.glyphs.values().map(|glyph| glyph.commands.len()).sum();
    println!("  commands: {commands}");
}

fn print_glyph(info: &FontInfo, data: &FontData, name: &str, settings: &EditorSettings) -> Result<()> {
    let glyph = data
        .glyph(name)
        .ok_or_else(|| anyhow!("Glyph {name:?} not found in {}", info.get_display_name()))?;
    let bounds = compute_bounds(&glyph.commands, 1.0);
    let metric_lines = info.metrics.metric_lines(glyph.advance_width);

    let output = serde_json::json!({
        "name": glyph.name,
        "advance_width": glyph.advance_width,
        "bounds": bounds.to_bounds(),
        "contours": glyph.commands.contours().len(),
        "metric_lines": metric_lines,
        "grid": settings.grid_size,
        "commands": glyph.commands,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn export(info: FontInfo, data: FontData, output: &Path) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the codec runtime")?;

    let asset = runtime.block_on(async {
        let worker = CodecWorker::spawn(UfoCodec::new(output));
        let result = worker.encode(FontSnapshot::new(info, data)).await;
        worker.shutdown().await;
        result
    })?;

    match asset.payload {
        AssetPayload::Directory(path) => info!("Exported {} glyphs to {}", asset.glyph_count, path.display()),
        AssetPayload::Bytes(bytes) => info!("Exported {} glyphs ({} bytes)", asset.glyph_count, bytes.len()),
    }
    Ok(())
}

fn main() {
    let cli_args = core::platform::get_cli_args();
    match run_app(cli_args) {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
