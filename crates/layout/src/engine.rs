//! The formatter: markup in, positioned leaves out.

use crate::builder::LeafBuilder;
use crate::compose::compose;
use crate::config::LayoutConfig;
use crate::fonts::FontLibrary;
use crate::images::ImageLibrary;
use crate::leaf::{LeafKind, LeafTree};
use crate::resolver::StyleResolver;
use leaftext_markup::Tokenizer;
use leaftext_style::{Style, StyleInput, StyleTable};
use serde::Serialize;
use std::sync::Arc;

/// The result of the last parse.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub leaves: LeafTree,
    pub width: f32,
    pub height: f32,
}

/// Sent to observers after every parse and compose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutUpdated {
    pub width: f32,
    pub height: f32,
    pub leaf_count: usize,
}

pub trait LayoutObserver: Send + Sync {
    fn on_layout_updated(&self, update: &LayoutUpdated);
}

/// Owns the style table and the current layout; shares the font and image
/// libraries with whoever loads assets into them.
pub struct Formatter {
    config: LayoutConfig,
    tokenizer: Tokenizer,
    styles: StyleTable,
    fonts: FontLibrary,
    images: ImageLibrary,
    observers: Vec<Arc<dyn LayoutObserver>>,
    layout: Layout,
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("config", &self.config)
            .field("styles", &self.styles.len())
            .field("fonts", &self.fonts.len())
            .field("images", &self.images.len())
            .field("observers", &self.observers.len())
            .field("leaves", &self.layout.leaves.len())
            .finish()
    }
}

impl Formatter {
    pub fn new(fonts: FontLibrary, images: ImageLibrary) -> Self {
        Self::with_config(fonts, images, LayoutConfig::default())
    }

    pub fn with_config(fonts: FontLibrary, images: ImageLibrary, config: LayoutConfig) -> Self {
        let tokenizer = Tokenizer::new().with_raw_text_element(config.raw_text_element.clone());
        Self {
            config,
            tokenizer,
            styles: StyleTable::new(),
            fonts,
            images,
            observers: Vec::new(),
            layout: Layout::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Takes effect on the next [`Formatter::compose`] or parse.
    pub fn set_word_wrap(&mut self, word_wrap: f32) {
        self.config.word_wrap = word_wrap;
    }

    pub fn word_wrap(&self) -> f32 {
        self.config.word_wrap
    }

    /// Replaces all styles: the table goes back to its baseline first.
    pub fn set_styles(&mut self, input: impl Into<StyleInput>) {
        self.styles.set_styles(input);
    }

    pub fn add_styles(&mut self, input: impl Into<StyleInput>) {
        self.styles.add_styles(input);
    }

    pub fn set_style_by_name(&mut self, name: &str, style: &Style) {
        self.styles.set_style_by_name(name, style);
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn images(&self) -> &ImageLibrary {
        &self.images
    }

    /// For adding entities.
    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer {
        &mut self.tokenizer
    }

    /// Replaces the layout with one built from `markup`, then composes it.
    pub fn parse(&mut self, markup: &str) -> &Layout {
        let mut tree = LeafTree::new();
        let resolver = StyleResolver::new(&self.styles, &self.config.image_element);
        let runs = resolver.resolve(self.tokenizer.tokenize(markup));

        let mut builder = LeafBuilder::new(&mut tree, &self.images, &self.config);
        for run in &runs {
            let font = self.fonts.resolve(&run.style);
            builder.push_run(run, font.as_ref());
        }
        log::debug!("Built {} leaves from {} runs", tree.len(), runs.len());

        self.layout.leaves = tree;
        self.compose()
    }

    /// Re-positions the current leaves at the configured wrap width.
    pub fn compose(&mut self) -> &Layout {
        let (width, height) = compose(&mut self.layout.leaves, self.config.word_wrap);
        self.layout.width = width;
        self.layout.height = height;
        self.notify();
        &self.layout
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Image keys referenced by the current layout but not yet registered.
    /// Load these and parse again.
    pub fn pending_images(&self) -> Vec<String> {
        let mut pending: Vec<String> = Vec::new();
        for (_, leaf) in self.layout.leaves.iter() {
            if leaf.kind == LeafKind::Image
                && leaf.pending
                && let Some(key) = &leaf.image
                && !pending.contains(key)
            {
                pending.push(key.clone());
            }
        }
        pending
    }

    pub fn register_observer(&mut self, observer: Arc<dyn LayoutObserver>) {
        self.observers.push(observer);
    }

    /// Returns `false` if `observer` was not registered.
    pub fn remove_observer(&mut self, observer: &Arc<dyn LayoutObserver>) -> bool {
        let before = self.observers.len();
        self.observers
            .retain(|o| !std::ptr::addr_eq(Arc::as_ptr(o), Arc::as_ptr(observer)));
        self.observers.len() != before
    }

    fn notify(&self) {
        let update = LayoutUpdated {
            width: self.layout.width,
            height: self.layout.height,
            leaf_count: self.layout.leaves.len(),
        };
        for observer in &self.observers {
            observer.on_layout_updated(&update);
        }
    }
}
