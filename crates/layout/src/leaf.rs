//! The leaf tree: positioned glyphs, words, whitespace and images.
//!
//! Leaves live in an arena and refer to each other by [`LeafId`]. Top-level
//! leaves (the roots) are what the line composer positions; a word is a
//! container root whose children are its glyphs.
//!
//! Positions are stored relative to the parent. [`LeafTree::absolute_position`]
//! adds up the chain of parents.

use crate::attributes::AttributeList;
use crate::outline::{PathBuilder, PathCommand};
use leaftext_style::Style;
use leaftext_traits::FontHandle;
use leaftext_types::{Point, Rect};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId(pub(crate) usize);

impl LeafId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Glyph,
    Space,
    Tab,
    NewLine,
    Image,
    /// A run of several characters; its children are the glyphs.
    Container,
}

impl LeafKind {
    /// Classifies leaf text. Length wins over everything, then the image
    /// flag, then the single code point.
    pub fn classify(text: &str, is_image: bool) -> LeafKind {
        let mut chars = text.chars();
        let first = chars.next();
        if chars.next().is_some() {
            return LeafKind::Container;
        }
        if is_image {
            return LeafKind::Image;
        }
        match first {
            Some(' ') => LeafKind::Space,
            Some('\t') => LeafKind::Tab,
            Some('\n' | '\r' | '\u{21B5}') => LeafKind::NewLine,
            _ => LeafKind::Glyph,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LeafKind::Glyph => "glyph",
            LeafKind::Space => "space",
            LeafKind::Tab => "tab",
            LeafKind::NewLine => "newline",
            LeafKind::Image => "image",
            LeafKind::Container => "container",
        }
    }
}

impl Serialize for LeafKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Leaf {
    pub kind: LeafKind,
    pub text: String,
    /// Innermost open tag when the leaf was built.
    pub tag: Option<String>,
    pub style: Style,
    pub attributes: AttributeList,
    pub font: Option<FontHandle>,
    pub glyph: Option<u16>,
    /// Image lookup key (the `src` attribute).
    pub image: Option<String>,
    /// Set on image leaves whose image was not registered at build time.
    pub pending: bool,

    pub font_size: f32,
    /// `font_size / units_per_em`.
    pub font_ratio: f32,
    pub baseline: f32,
    pub line_height: f32,
    pub letter_spacing: f32,
    /// Pair adjustment against the previous glyph, already part of `width`.
    pub kerning: f32,

    /// Offset from the parent, or absolute for roots.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub parent: Option<LeafId>,
    pub previous: Option<LeafId>,
    pub next: Option<LeafId>,
    pub children: Vec<LeafId>,
}

impl Leaf {
    pub fn new(kind: LeafKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            tag: None,
            style: Style::default(),
            attributes: AttributeList::default(),
            font: None,
            glyph: None,
            image: None,
            pending: false,
            font_size: 0.0,
            font_ratio: 0.0,
            baseline: 0.0,
            line_height: 0.0,
            letter_spacing: 0.0,
            kerning: 0.0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            parent: None,
            previous: None,
            next: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeafTree {
    leaves: Vec<Leaf>,
    roots: Vec<LeafId>,
}

impl LeafTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf. A leaf without a parent becomes the next root.
    ///
    /// If `leaf.previous` is set, that leaf's `next` is pointed back here,
    /// unless this is a first child borrowing its parent's predecessor. When
    /// the previous leaf is a container its last descendant is linked too,
    /// so the glyph-level sequence runs on across words.
    pub fn push(&mut self, mut leaf: Leaf) -> LeafId {
        let id = LeafId(self.leaves.len());
        if leaf.previous.is_none()
            && let Some(parent) = leaf.parent
        {
            leaf.previous = self.leaves[parent.0].previous;
        }

        let inherits_previous = leaf.parent.is_some_and(|p| self.leaves[p.0].children.is_empty());
        if let Some(previous) = leaf.previous
            && !inherits_previous
        {
            self.leaves[previous.0].next = Some(id);
            let last = self.last_descendant(previous);
            self.leaves[last.0].next = Some(id);
        }

        match leaf.parent {
            Some(parent) => self.leaves[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        self.leaves.push(leaf);
        id
    }

    pub fn get(&self, id: LeafId) -> Option<&Leaf> {
        self.leaves.get(id.0)
    }

    pub fn get_mut(&mut self, id: LeafId) -> Option<&mut Leaf> {
        self.leaves.get_mut(id.0)
    }

    /// Top-level leaves in document order.
    pub fn roots(&self) -> &[LeafId] {
        &self.roots
    }

    pub fn children(&self, id: LeafId) -> &[LeafId] {
        self.get(id).map(|l| l.children.as_slice()).unwrap_or(&[])
    }

    /// Every leaf, roots and children, in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (LeafId, &Leaf)> {
        self.leaves.iter().enumerate().map(|(i, l)| (LeafId(i), l))
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn last_root(&self) -> Option<LeafId> {
        self.roots.last().copied()
    }

    /// The deepest last child of `id`, or `id` itself.
    pub fn last_descendant(&self, mut id: LeafId) -> LeafId {
        while let Some(&last) = self.children(id).last() {
            id = last;
        }
        id
    }

    /// The glyph before `id` in reading order, descending into containers.
    pub fn previous_glyph(&self, id: LeafId) -> Option<LeafId> {
        let previous = self.get(id)?.previous?;
        Some(self.last_descendant(previous))
    }

    /// The leaf after `id` in reading order: a container's first child,
    /// otherwise the stored `next`.
    pub fn next_in_order(&self, id: LeafId) -> Option<LeafId> {
        let leaf = self.get(id)?;
        leaf.children.first().copied().or(leaf.next)
    }

    pub fn absolute_position(&self, id: LeafId) -> Point {
        let mut point = Point::default();
        let mut current = Some(id);
        while let Some(leaf) = current.and_then(|c| self.get(c)) {
            point.x += leaf.x;
            point.y += leaf.y;
            current = leaf.parent;
        }
        point
    }

    /// The box used for hit testing, every edge snapped to whole pixels.
    ///
    /// It starts at the pen position `x + kerning`, where the outline is
    /// drawn, and spans the glyph's own advance `width - kerning`. Vertically
    /// it runs from `y - baseline` down by `height`.
    pub fn bounds(&self, id: LeafId) -> Option<Rect> {
        let leaf = self.get(id)?;
        let position = self.absolute_position(id);
        Some(
            Rect::new(
                position.x + leaf.kerning,
                position.y - leaf.baseline,
                leaf.width - leaf.kerning,
                leaf.height,
            )
            .rounded(),
        )
    }

    pub fn contains(&self, id: LeafId, point: Point) -> bool {
        self.bounds(id).is_some_and(|b| b.contains(point))
    }

    /// The innermost leaf under `point`, if any. Where kerning pulls a glyph
    /// over its predecessor, the later leaf is the one painted on top and wins.
    pub fn leaf_at(&self, point: Point) -> Option<LeafId> {
        let root = self
            .roots
            .iter()
            .rev()
            .copied()
            .find(|&id| self.contains(id, point))?;
        Some(
            self.children(root)
                .iter()
                .rev()
                .copied()
                .find(|&child| self.contains(child, point))
                .unwrap_or(root),
        )
    }

    /// The outline of a glyph, or of every glyph in a container, in absolute
    /// pixel coordinates (y down, origin on the baseline). Whitespace and
    /// images have no outline.
    pub fn outline(&self, id: LeafId) -> Vec<PathCommand> {
        let Some(leaf) = self.get(id) else {
            return Vec::new();
        };
        if leaf.kind == LeafKind::Container {
            return leaf
                .children
                .iter()
                .flat_map(|&child| self.outline(child))
                .collect();
        }
        let (LeafKind::Glyph, Some(font), Some(glyph)) = (leaf.kind, &leaf.font, leaf.glyph)
        else {
            return Vec::new();
        };

        let position = self.absolute_position(id);
        let mut builder = PathBuilder::new(
            (position.x + leaf.kerning).round(),
            position.y.round(),
            leaf.font_ratio,
        );
        font.outline(glyph, &mut builder);
        builder.finish()
    }
}

/// Serializes one leaf with absolute coordinates and its children inline.
struct LeafView<'a> {
    tree: &'a LeafTree,
    id: LeafId,
}

impl Serialize for LeafView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(leaf) = self.tree.get(self.id) else {
            return serializer.serialize_none();
        };
        let position = self.tree.absolute_position(self.id);
        let mut state = serializer.serialize_struct("Leaf", 13)?;
        state.serialize_field("id", &self.id.0)?;
        state.serialize_field("kind", &leaf.kind)?;
        state.serialize_field("text", &leaf.text)?;
        state.serialize_field("tag", &leaf.tag)?;
        state.serialize_field("x", &position.x)?;
        state.serialize_field("y", &position.y)?;
        state.serialize_field("width", &leaf.width)?;
        state.serialize_field("height", &leaf.height)?;
        state.serialize_field("baseline", &leaf.baseline)?;
        state.serialize_field("style", &leaf.style)?;
        state.serialize_field("image", &leaf.image)?;
        state.serialize_field("pending", &leaf.pending)?;
        let children: Vec<LeafView<'_>> = leaf
            .children
            .iter()
            .map(|&id| LeafView {
                tree: self.tree,
                id,
            })
            .collect();
        state.serialize_field("children", &children)?;
        state.end()
    }
}

impl Serialize for LeafTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.roots.iter().map(|&id| LeafView { tree: self, id }))
    }
}
