use leaftext_traits::{FontHandle, FontMetrics, FontNames, GlyphBounds, OutlineSink};
use std::sync::Arc;

/// A font with round numbers: 1000 units per em, every printable glyph 500
/// units wide and 900 units tall (descending 200 below the baseline), the
/// space 250 wide with no contours, and one kerning pair, `AV`, at -100.
#[derive(Debug)]
pub struct MockFont {
    names: FontNames,
}

pub const UNITS_PER_EM: u16 = 1000;
pub const ADVANCE: u16 = 500;
pub const SPACE_ADVANCE: u16 = 250;
pub const AV_KERNING: i16 = -100;

impl MockFont {
    pub fn new(family: &str, subfamily: &str) -> Self {
        Self {
            names: FontNames {
                family: Some(family.to_string()),
                subfamily: Some(subfamily.to_string()),
                full_name: Some(format!("{} {}", family, subfamily)),
                postscript_name: Some(format!("{}-{}", family, subfamily)),
            },
        }
    }

    pub fn handle(family: &str, subfamily: &str) -> FontHandle {
        Arc::new(Self::new(family, subfamily))
    }
}

impl FontMetrics for MockFont {
    fn units_per_em(&self) -> u16 {
        UNITS_PER_EM
    }

    fn ascender(&self) -> i16 {
        800
    }

    fn descender(&self) -> i16 {
        -200
    }

    fn glyph_id(&self, c: char) -> Option<u16> {
        if c.is_control() {
            return None;
        }
        u16::try_from(u32::from(c)).ok()
    }

    fn advance_width(&self, glyph: u16) -> Option<u16> {
        Some(if glyph == u16::from(b' ') {
            SPACE_ADVANCE
        } else {
            ADVANCE
        })
    }

    fn glyph_bounds(&self, glyph: u16) -> Option<GlyphBounds> {
        (glyph != u16::from(b' ')).then_some(GlyphBounds {
            x_min: 0,
            y_min: -200,
            x_max: 500,
            y_max: 700,
        })
    }

    fn kerning(&self, left: u16, right: u16) -> Option<i16> {
        (left == u16::from(b'A') && right == u16::from(b'V')).then_some(AV_KERNING)
    }

    fn outline(&self, glyph: u16, sink: &mut dyn OutlineSink) -> bool {
        if glyph == u16::from(b' ') {
            return false;
        }
        sink.move_to(0.0, 0.0);
        sink.line_to(500.0, 0.0);
        sink.line_to(500.0, 700.0);
        sink.close();
        true
    }

    fn names(&self) -> FontNames {
        self.names.clone()
    }
}
