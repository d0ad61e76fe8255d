use leaftext::{FontHandle, FontLibrary, FontMetrics, Formatter, ImageLibrary, LayoutConfig};
use leaftext_traits::{FontNames, GlyphBounds, OutlineSink};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Monospaced font: 1000 units per em, 600-unit advances, 300 for the space,
/// ascender 750, glyph boxes from -250 to 750.
#[derive(Debug)]
pub struct FixedFont {
    subfamily: String,
}

impl FixedFont {
    pub fn handle(subfamily: &str) -> FontHandle {
        Arc::new(Self {
            subfamily: subfamily.to_string(),
        })
    }
}

impl FontMetrics for FixedFont {
    fn units_per_em(&self) -> u16 {
        1000
    }

    fn ascender(&self) -> i16 {
        750
    }

    fn descender(&self) -> i16 {
        -250
    }

    fn glyph_id(&self, c: char) -> Option<u16> {
        (!c.is_control()).then(|| u16::try_from(u32::from(c)).unwrap_or(0))
    }

    fn advance_width(&self, glyph: u16) -> Option<u16> {
        Some(if glyph == 32 { 300 } else { 600 })
    }

    fn glyph_bounds(&self, glyph: u16) -> Option<GlyphBounds> {
        (glyph != 32).then_some(GlyphBounds {
            x_min: 0,
            y_min: -250,
            x_max: 600,
            y_max: 750,
        })
    }

    fn kerning(&self, _left: u16, _right: u16) -> Option<i16> {
        None
    }

    fn outline(&self, _glyph: u16, sink: &mut dyn OutlineSink) -> bool {
        sink.move_to(0.0, 0.0);
        sink.line_to(600.0, 750.0);
        sink.close();
        true
    }

    fn names(&self) -> FontNames {
        FontNames {
            family: Some("Fixed".to_string()),
            subfamily: Some(self.subfamily.clone()),
            full_name: Some(format!("Fixed {}", self.subfamily)),
            postscript_name: Some(format!("Fixed-{}", self.subfamily)),
        }
    }
}

pub fn fixed_fonts() -> FontLibrary {
    let fonts = FontLibrary::new();
    for subfamily in ["Regular", "Bold", "Italic"] {
        fonts
            .register(subfamily, FixedFont::handle(subfamily))
            .expect("register test font");
    }
    fonts
}

/// A formatter at 10px (6px glyphs, 3px spaces) with the `Fixed` family as
/// the default style's family.
pub fn formatter(word_wrap: f32) -> Formatter {
    let config = LayoutConfig {
        word_wrap,
        default_font_size: 10.0,
        ..Default::default()
    };
    let mut formatter = Formatter::with_config(fixed_fonts(), ImageLibrary::new(), config);
    formatter.add_styles(leaftext::Style {
        font_family: Some("Fixed".to_string()),
        ..Default::default()
    });
    formatter
}
