//! Font library for the layout engine.
//!
//! `FontLibrary` maps lookup keys (registration id, `"{family} {subfamily}"`,
//! full name, PostScript name) to loaded fonts and picks the best font for a
//! style. `TtfFont` is the `ttf-parser` backed [`FontMetrics`] implementation.
//!
//! With the `system-fonts` feature the library can also pull installed fonts
//! from the system through `fontdb`.

use crate::LayoutError;
use leaftext_style::Style;
use leaftext_traits::{
    FontError, FontHandle, FontMetrics, FontNames, GlyphBounds, OutlineSink, ResourceProvider,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use ttf_parser::gpos::{PairAdjustment, PositioningSubtable};
use ttf_parser::{Face, GlyphId, Tag, name_id};

/// A font file parsed on demand with `ttf-parser`.
///
/// Only the raw bytes are kept; a `Face` is a cheap view created per query,
/// which avoids a self-referential struct. The header values used on every
/// leaf are read once up front.
pub struct TtfFont {
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    names: FontNames,
}

impl std::fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFont")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .field("family", &self.names.family)
            .field("subfamily", &self.names.subfamily)
            .finish()
    }
}

fn english_name(face: &Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id && name.is_unicode())
        .find_map(|name| name.to_string())
}

/// Horizontal advance adjustment for a pair from the GPOS `kern` feature.
fn gpos_kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> Option<i16> {
    let gpos = face.tables().gpos?;
    let kern = Tag::from_bytes(b"kern");
    gpos.features
        .into_iter()
        .filter(|feature| feature.tag == kern)
        .flat_map(|feature| feature.lookup_indices)
        .filter_map(|index| gpos.lookups.get(index))
        .flat_map(|lookup| lookup.subtables.into_iter::<PositioningSubtable>())
        .find_map(|subtable| match subtable {
            PositioningSubtable::Pair(pair) => pair_adjustment(&pair, left, right),
            _ => None,
        })
}

fn pair_adjustment(pair: &PairAdjustment<'_>, left: GlyphId, right: GlyphId) -> Option<i16> {
    let index = pair.coverage().get(left)?;
    let (first, _) = match pair {
        PairAdjustment::Format1 { sets, .. } => sets.get(index)?.get(right)?,
        PairAdjustment::Format2 {
            classes, matrix, ..
        } => matrix.get((classes.0.get(left), classes.1.get(right)))?,
    };
    Some(first.x_advance)
}

/// Legacy `kern` table, horizontal and non-variable subtables only.
fn kern_table_kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> Option<i16> {
    let kern = face.tables().kern?;
    kern.subtables
        .into_iter()
        .filter(|st| st.horizontal && !st.variable)
        .find_map(|st| st.glyphs_kerning(left, right))
}

struct SinkAdapter<'a>(&'a mut dyn OutlineSink);

impl ttf_parser::OutlineBuilder for SinkAdapter<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.curve_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

impl TtfFont {
    pub fn from_data(id: &str, data: Arc<Vec<u8>>, index: u32) -> Result<Self, FontError> {
        let face = Face::parse(&data, index).map_err(|e| FontError::ParseFailed {
            id: id.to_string(),
            message: e.to_string(),
        })?;
        let names = FontNames {
            family: english_name(&face, name_id::TYPOGRAPHIC_FAMILY)
                .or_else(|| english_name(&face, name_id::FAMILY)),
            subfamily: english_name(&face, name_id::TYPOGRAPHIC_SUBFAMILY)
                .or_else(|| english_name(&face, name_id::SUBFAMILY)),
            full_name: english_name(&face, name_id::FULL_NAME),
            postscript_name: english_name(&face, name_id::POST_SCRIPT_NAME),
        };
        let (units_per_em, ascender, descender) =
            (face.units_per_em(), face.ascender(), face.descender());
        drop(face);

        Ok(Self {
            data,
            index,
            units_per_em,
            ascender,
            descender,
            names,
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

impl FontMetrics for TtfFont {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn ascender(&self) -> i16 {
        self.ascender
    }

    fn descender(&self) -> i16 {
        self.descender
    }

    fn glyph_id(&self, c: char) -> Option<u16> {
        self.face()?.glyph_index(c).map(|g| g.0)
    }

    fn advance_width(&self, glyph: u16) -> Option<u16> {
        self.face()?.glyph_hor_advance(GlyphId(glyph))
    }

    fn glyph_bounds(&self, glyph: u16) -> Option<GlyphBounds> {
        let rect = self.face()?.glyph_bounding_box(GlyphId(glyph))?;
        Some(GlyphBounds {
            x_min: rect.x_min,
            y_min: rect.y_min,
            x_max: rect.x_max,
            y_max: rect.y_max,
        })
    }

    /// GPOS pair adjustment first, then the legacy `kern` table.
    fn kerning(&self, left: u16, right: u16) -> Option<i16> {
        let face = self.face()?;
        let (left, right) = (GlyphId(left), GlyphId(right));
        gpos_kerning(&face, left, right).or_else(|| kern_table_kerning(&face, left, right))
    }

    fn outline(&self, glyph: u16, sink: &mut dyn OutlineSink) -> bool {
        let Some(face) = self.face() else {
            return false;
        };
        face.outline_glyph(GlyphId(glyph), &mut SinkAdapter(sink))
            .is_some()
    }

    fn names(&self) -> FontNames {
        self.names.clone()
    }
}

/// Registered fonts, shareable between a loader thread and the formatter.
#[derive(Clone, Default)]
pub struct FontLibrary {
    /// Every lookup key of every registered font.
    fonts: Arc<RwLock<HashMap<String, FontHandle>>>,

    /// Last resort for style resolution. Set to the family of the first
    /// registered font unless chosen explicitly.
    default_family: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("keys", &self.len())
            .field("default_family", &self.default_family())
            .finish()
    }
}

/// Candidate lookup keys for `style`, most specific first. A candidate is
/// skipped when any of its components is unset.
fn candidate_keys(style: &Style, default_family: Option<&str>) -> Vec<String> {
    let family = style.font_family.as_deref();
    let name = style.font_name.as_deref();
    let weight = style.font_weight.as_ref().map(|w| w.to_string());
    let slant = style.font_style.as_ref().map(|s| s.to_string());
    let (weight, slant) = (weight.as_deref(), slant.as_deref());

    let key = |base: Option<&str>, parts: &[Option<&str>]| -> Option<String> {
        let mut key = base?.to_string();
        for part in parts {
            key.push(' ');
            key.push_str((*part)?);
        }
        Some(key)
    };

    [
        key(family, &[weight, slant]),
        key(name, &[weight, slant]),
        key(family, &[weight]),
        key(name, &[weight]),
        key(family, &[slant]),
        key(name, &[slant]),
        key(family, &[]),
        key(name, &[]),
        default_family.map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect()
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `font` under `id` and under every name it carries.
    pub fn register(&self, id: &str, font: FontHandle) -> Result<(), FontError> {
        let names = font.names();
        let mut keys = vec![id.to_string()];
        if let (Some(family), Some(subfamily)) = (&names.family, &names.subfamily) {
            keys.push(format!("{} {}", family, subfamily));
        }
        keys.extend(names.full_name.clone());
        keys.extend(names.postscript_name.clone());

        {
            let mut fonts = self.fonts.write().map_err(|_| FontError::LoadFailed {
                path: id.to_string(),
                message: "font library lock poisoned".to_string(),
            })?;
            for key in &keys {
                fonts.insert(key.clone(), font.clone());
            }
            // The bare family resolves to the first face registered for it.
            if let Some(family) = &names.family {
                fonts.entry(family.clone()).or_insert_with(|| font.clone());
            }
        }

        if let Some(family) = names.family
            && let Ok(mut default_family) = self.default_family.write()
            && default_family.is_none()
        {
            log::debug!("Default font family is now '{}'", family);
            *default_family = Some(family);
        }

        log::debug!("Registered font '{}' under {:?}", id, keys);
        Ok(())
    }

    /// Parses font file bytes and registers the result under `id`.
    pub fn add_font(&self, id: &str, data: Arc<Vec<u8>>) -> Result<FontHandle, FontError> {
        let font: FontHandle = Arc::new(TtfFont::from_data(id, data, 0)?);
        self.register(id, font.clone())?;
        Ok(font)
    }

    /// Loads `(id, path)` pairs through `provider` and registers them.
    /// Stops at the first font that cannot be read or parsed.
    pub fn load_fonts(
        &self,
        provider: &dyn ResourceProvider,
        fonts: &[(&str, &str)],
    ) -> Result<(), LayoutError> {
        for (id, path) in fonts {
            let data = provider.load(path)?;
            self.add_font(id, data)?;
        }
        Ok(())
    }

    /// Loads every installed font through `fontdb`. Returns how many were
    /// registered; faces that fail to parse are skipped.
    #[cfg(feature = "system-fonts")]
    pub fn load_system_fonts(&self) -> usize {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let mut loaded = 0;
        for face in db.faces() {
            let parsed = db.with_face_data(face.id, |data, index| {
                TtfFont::from_data(&face.post_script_name, Arc::new(data.to_vec()), index)
            });
            match parsed {
                Some(Ok(font)) => {
                    if self.register(&face.post_script_name, Arc::new(font)).is_ok() {
                        loaded += 1;
                    }
                }
                Some(Err(e)) => log::debug!("Skipping system font: {}", e),
                None => log::debug!("No data for system font '{}'", face.post_script_name),
            }
        }
        log::debug!("Loaded {} system fonts", loaded);
        loaded
    }

    pub fn set_default_family(&self, family: impl Into<String>) {
        if let Ok(mut default_family) = self.default_family.write() {
            *default_family = Some(family.into());
        }
    }

    pub fn default_family(&self) -> Option<String> {
        self.default_family.read().ok().and_then(|f| f.clone())
    }

    pub fn get(&self, key: &str) -> Option<FontHandle> {
        self.fonts.read().ok()?.get(key).cloned()
    }

    /// Number of lookup keys. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Picks the font for `style`: the first candidate key that is
    /// registered, falling back to the default family.
    pub fn resolve(&self, style: &Style) -> Option<FontHandle> {
        let default_family = self.default_family();
        let fonts = self.fonts.read().ok()?;
        let found = candidate_keys(style, default_family.as_deref())
            .into_iter()
            .find_map(|key| fonts.get(&key).cloned());
        if found.is_none() {
            log::warn!(
                "No font for family={:?} name={:?} weight={:?} style={:?}",
                style.font_family,
                style.font_name,
                style.font_weight,
                style.font_style
            );
        }
        found
    }
}
