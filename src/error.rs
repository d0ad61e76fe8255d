use leaftext_layout::LayoutError;
use leaftext_style::StyleParseError;
use thiserror::Error;

/// Everything that can go wrong between reading the inputs and printing a
/// layout. Laying out the markup itself cannot fail.
#[derive(Error, Debug)]
pub enum LeafTextError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Asset loading failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Style table is invalid: {0}")]
    Style(#[from] StyleParseError),

    #[error("{0}")]
    Usage(String),
}
