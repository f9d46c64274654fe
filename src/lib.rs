//! Glyphsmith: glyph outline model and editing engine
pub mod core;
pub mod data;
pub mod editing;
pub mod font_source;
pub mod geometry;
pub mod io;
pub mod logging;
#[cfg(test)]
mod tests;
pub mod tools;
