//! leaftext lays out lightly marked-up rich text.
//!
//! Markup such as `<b>Hi</b> there` is tokenized, styled through a cascading
//! style table and turned into a tree of leaves (glyphs, whitespace, words
//! and images) measured against real font metrics, then word-wrapped into
//! lines. The result can be hit-tested, outlined or serialized.
//!
//! ```no_run
//! use leaftext::{FontLibrary, Formatter, ImageLibrary};
//!
//! let fonts = FontLibrary::new();
//! let mut formatter = Formatter::new(fonts, ImageLibrary::new());
//! formatter.set_word_wrap(320.0);
//! let layout = formatter.parse("<b>Hello</b> world");
//! println!("{}x{}", layout.width, layout.height);
//! ```

pub mod assets;
pub mod cli;
pub mod error;

pub use error::LeafTextError;

pub use leaftext_layout::{
    Attribute, AttributeList, FontLibrary, Formatter, ImageHandle, ImageLibrary, Layout,
    LayoutConfig, LayoutError, LayoutObserver, LayoutUpdated, Leaf, LeafId, LeafKind, LeafTree,
    PathCommand, TtfFont,
};
pub use leaftext_markup::{EntityMap, Token, Tokenizer};
pub use leaftext_style::{Dimension, FontStyle, FontWeight, Style, StyleInput, StyleTable};
pub use leaftext_traits::{
    FilesystemResourceProvider, FontHandle, FontMetrics, InMemoryResourceProvider,
    ResourceProvider,
};
pub use leaftext_types::{Color, Point, Rect};
