//! Builds leaves from resolved runs.
//!
//! Text is cut into words and single whitespace characters. A one-character
//! word is a glyph leaf; a longer word is a container whose children are its
//! glyphs. Metrics come from the run's font scaled by
//! `round(font_size) / units_per_em`. Positions are left at zero for the
//! line composer, except the children's offsets inside their word.

use crate::attributes::AttributeList;
use crate::config::LayoutConfig;
use crate::images::ImageLibrary;
use crate::leaf::{Leaf, LeafId, LeafKind, LeafTree};
use crate::resolver::{ResolvedRun, RunContent};
use leaftext_style::Style;
use leaftext_traits::{FontHandle, FontMetrics};
use std::sync::Arc;

const RETURN_SYMBOL: char = '\u{21B5}';
const NO_BREAK_SPACE: char = '\u{A0}';

fn is_break(c: char) -> bool {
    (c.is_whitespace() && c != NO_BREAK_SPACE) || c == RETURN_SYMBOL
}

/// Splits text into words and single break characters, in order. A `\r`
/// directly before `\n` is dropped.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut word_start = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_break(c) {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            pieces.push(&text[start..i]);
        }
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            continue;
        }
        pieces.push(&text[i..i + c.len_utf8()]);
    }
    if let Some(start) = word_start {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Pair adjustment between two glyphs, in pixels.
pub fn kerned_advance(
    font: &dyn FontMetrics,
    previous_glyph: u16,
    glyph: u16,
    ratio: f32,
) -> f32 {
    font.kerning(previous_glyph, glyph)
        .map_or(0.0, |k| f32::from(k) * ratio)
}

fn same_font(a: &FontHandle, b: &FontHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// The run-level inputs shared by every leaf built from one run.
struct RunContext<'r> {
    tag: Option<&'r str>,
    style: &'r Style,
    attributes: &'r AttributeList,
    font: Option<&'r FontHandle>,
    font_size: f32,
    ratio: f32,
}

pub struct LeafBuilder<'a> {
    tree: &'a mut LeafTree,
    images: &'a ImageLibrary,
    config: &'a LayoutConfig,
}

impl<'a> LeafBuilder<'a> {
    pub fn new(tree: &'a mut LeafTree, images: &'a ImageLibrary, config: &'a LayoutConfig) -> Self {
        Self {
            tree,
            images,
            config,
        }
    }

    /// Appends the leaves for one run after the last existing root.
    pub fn push_run(&mut self, run: &ResolvedRun, font: Option<&FontHandle>) -> Vec<LeafId> {
        match &run.content {
            RunContent::Image => {
                let previous = self.tree.last_root();
                vec![self.build("", run, font, previous)]
            }
            RunContent::Text(text) => split_words(text)
                .into_iter()
                .map(|piece| {
                    let previous = self.tree.last_root();
                    self.build(piece, run, font, previous)
                })
                .collect(),
        }
    }

    /// Builds one top-level leaf: a glyph, a whitespace character, an image
    /// or a word container with its children.
    pub fn build(
        &mut self,
        text: &str,
        run: &ResolvedRun,
        font: Option<&FontHandle>,
        previous: Option<LeafId>,
    ) -> LeafId {
        let font_size = run
            .style
            .font_size
            .unwrap_or(self.config.default_font_size);
        let ratio = font
            .map(|f| f.units_per_em())
            .filter(|&upem| upem > 0)
            .map_or(0.0, |upem| font_size.round() / f32::from(upem));
        let context = RunContext {
            tag: run.tag.as_deref(),
            style: &run.style,
            attributes: &run.attributes,
            font,
            font_size,
            ratio,
        };

        let is_image = run.content == RunContent::Image;
        match LeafKind::classify(text, is_image) {
            LeafKind::Container => self.build_container(text, &context, previous),
            LeafKind::Image => {
                let leaf = self.image_leaf(&context, previous);
                self.tree.push(leaf)
            }
            kind => {
                let leaf = self.char_leaf(kind, text, &context, None, previous);
                self.tree.push(leaf)
            }
        }
    }

    fn base_leaf(
        &self,
        kind: LeafKind,
        text: &str,
        context: &RunContext<'_>,
        parent: Option<LeafId>,
        previous: Option<LeafId>,
    ) -> Leaf {
        let mut leaf = Leaf::new(kind, text);
        leaf.tag = context.tag.map(str::to_string);
        leaf.style = context.style.clone();
        leaf.attributes = context.attributes.clone();
        leaf.font = context.font.cloned();
        leaf.font_size = context.font_size;
        leaf.font_ratio = context.ratio;
        leaf.line_height = context.style.line_height.unwrap_or(0.0);
        leaf.letter_spacing = context.style.letter_spacing.unwrap_or(0.0);
        leaf.parent = parent;
        leaf.previous = previous;
        if let Some(font) = context.font {
            leaf.baseline = f32::from(font.ascender()) * context.ratio;
        }
        leaf
    }

    /// A glyph or whitespace leaf.
    fn char_leaf(
        &self,
        kind: LeafKind,
        text: &str,
        context: &RunContext<'_>,
        parent: Option<LeafId>,
        previous: Option<LeafId>,
    ) -> Leaf {
        let mut leaf = self.base_leaf(kind, text, context, parent, previous);
        let (Some(font), Some(c)) = (context.font, text.chars().next()) else {
            return leaf;
        };
        let ratio = context.ratio;

        match kind {
            LeafKind::NewLine => {}
            LeafKind::Space | LeafKind::Tab => {
                let advance = font
                    .glyph_id(c)
                    .and_then(|g| font.advance_width(g))
                    .or_else(|| font.glyph_id(' ').and_then(|g| font.advance_width(g)))
                    .unwrap_or(0);
                leaf.glyph = font.glyph_id(c);
                leaf.width = f32::from(advance) * ratio;
                leaf.height = context.font_size;
            }
            _ => {
                let glyph = font.glyph_id(c).unwrap_or(0);
                leaf.glyph = Some(glyph);
                leaf.kerning = self.kerning_with_previous(font, glyph, previous, ratio);
                leaf.width =
                    f32::from(font.advance_width(glyph).unwrap_or(0)) * ratio + leaf.kerning;
                leaf.height = font
                    .glyph_bounds(glyph)
                    .map_or(context.font_size, |b| b.height() as f32 * ratio);
            }
        }
        leaf
    }

    fn kerning_with_previous(
        &self,
        font: &FontHandle,
        glyph: u16,
        previous: Option<LeafId>,
        ratio: f32,
    ) -> f32 {
        if !self.config.kerning {
            return 0.0;
        }
        let Some(before) = previous
            .map(|p| self.tree.last_descendant(p))
            .and_then(|p| self.tree.get(p))
        else {
            return 0.0;
        };
        match (&before.font, before.glyph, before.kind) {
            (Some(before_font), Some(before_glyph), LeafKind::Glyph)
                if same_font(before_font, font) =>
            {
                kerned_advance(&**font, before_glyph, glyph, ratio)
            }
            _ => 0.0,
        }
    }

    fn build_container(
        &mut self,
        text: &str,
        context: &RunContext<'_>,
        previous: Option<LeafId>,
    ) -> LeafId {
        let container = self.base_leaf(LeafKind::Container, text, context, None, previous);
        let letter_spacing = container.letter_spacing;
        let id = self.tree.push(container);

        let mut width = 0.0_f32;
        let mut height = 0.0_f32;
        let mut before = previous;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            let piece: &str = c.encode_utf8(&mut buf);
            let kind = LeafKind::classify(piece, false);
            let mut child = self.char_leaf(kind, piece, context, Some(id), before);
            child.x = width;
            width += child.width + letter_spacing;
            height = height.max(child.height);
            before = Some(self.tree.push(child));
        }

        if let Some(container) = self.tree.get_mut(id) {
            container.width = width;
            container.height = height;
        }
        id
    }

    fn image_leaf(&self, context: &RunContext<'_>, previous: Option<LeafId>) -> Leaf {
        let mut leaf = self.base_leaf(LeafKind::Image, "", context, None, previous);
        let source = context.attributes.value("src");
        let intrinsic = source.and_then(|key| self.images.get_by_id_or_url(key));
        if intrinsic.is_none() {
            log::debug!("Image {:?} is not loaded yet", source);
            leaf.pending = true;
        }
        let (intrinsic_width, intrinsic_height) =
            intrinsic.map_or((0.0, 0.0), |i| (i.width, i.height));

        leaf.image = source.map(str::to_string);
        leaf.width = explicit_size(
            context.style.width.and_then(|d| d.resolve(intrinsic_width)),
            context.attributes.as_integer("width"),
        )
        .unwrap_or(intrinsic_width);
        leaf.height = explicit_size(
            context.style.height.and_then(|d| d.resolve(intrinsic_height)),
            context.attributes.as_integer("height"),
        )
        .unwrap_or(intrinsic_height);
        leaf
    }
}

/// The attribute wins over the style.
fn explicit_size(from_style: Option<f32>, from_attribute: Option<i64>) -> Option<f32> {
    from_attribute.map(|v| v as f32).or(from_style)
}
