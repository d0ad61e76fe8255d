use leaftext_traits::{FontError, ResourceError};
use thiserror::Error;

/// Errors raised while loading fonts and images.
///
/// Layout itself never fails: unresolved fonts and missing images fall back
/// to zero-sized leaves.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Font error: {0}")]
    Font(#[from] FontError),
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
    #[error("Failed to decode image '{url}': {message}")]
    ImageDecode { url: String, message: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub mod attributes;
pub mod builder;
pub mod compose;
pub mod config;
pub mod engine;
pub mod fonts;
pub mod images;
pub mod leaf;
pub mod outline;
pub mod resolver;

pub use self::attributes::{Attribute, AttributeList};
pub use self::config::LayoutConfig;
pub use self::engine::{Formatter, Layout, LayoutObserver, LayoutUpdated};
pub use self::fonts::{FontLibrary, TtfFont};
pub use self::images::{ImageHandle, ImageLibrary};
pub use self::leaf::{Leaf, LeafId, LeafKind, LeafTree};
pub use self::outline::PathCommand;
pub use self::resolver::{ResolvedRun, RunContent, StyleResolver};

#[cfg(test)]
mod test_utils;
