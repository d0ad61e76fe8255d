//! FontMetrics trait for abstracting the font backend.
//!
//! The layout engine only needs a handful of numbers from a font: its design
//! grid, ascender, per-glyph advances and bounds, pair kerning and, for
//! rendering, the glyph outline. Anything that can answer those questions can
//! stand in for a real font file.

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Error type for font loading operations.
#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font not found: {0}")]
    NotFound(String),

    #[error("Failed to parse font '{id}': {message}")]
    ParseFailed { id: String, message: String },

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },
}

/// A glyph's bounding box in font units (y up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphBounds {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl GlyphBounds {
    pub fn height(&self) -> i32 {
        i32::from(self.y_max) - i32::from(self.y_min)
    }
}

/// Names a font can be looked up by, as stored in its `name` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontNames {
    pub family: Option<String>,
    pub subfamily: Option<String>,
    pub full_name: Option<String>,
    pub postscript_name: Option<String>,
}

/// Receives a glyph outline in font units (y up).
pub trait OutlineSink {
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32);
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);
    fn close(&mut self);
}

/// The font queries the leaf builder makes.
///
/// All lengths are in font units; callers scale by `font_size / units_per_em`.
pub trait FontMetrics: Send + Sync + Debug {
    fn units_per_em(&self) -> u16;

    fn ascender(&self) -> i16;

    fn descender(&self) -> i16;

    /// Maps a character to a glyph id, `None` if the font has no glyph for it.
    fn glyph_id(&self, c: char) -> Option<u16>;

    fn advance_width(&self, glyph: u16) -> Option<u16>;

    /// `None` for glyphs without contours (e.g. the space glyph).
    fn glyph_bounds(&self, glyph: u16) -> Option<GlyphBounds>;

    /// Horizontal pair adjustment between two glyphs, if the font defines one.
    fn kerning(&self, left: u16, right: u16) -> Option<i16>;

    /// Streams the glyph outline into `sink`. Returns `false` when the glyph
    /// has no outline.
    fn outline(&self, glyph: u16, sink: &mut dyn OutlineSink) -> bool;

    fn names(&self) -> FontNames;
}

/// Shared, thread-safe handle to a loaded font.
pub type FontHandle = Arc<dyn FontMetrics>;
