//! Command line handling for the `leaftext` binary.

use crate::assets::{AssetSpec, load_font, load_image};
use crate::error::LeafTextError;
use clap::Parser;
use leaftext_layout::{Formatter, FontLibrary, ImageLibrary, LayoutConfig};
use leaftext_style::StyleInput;
use std::fs;
use std::path::PathBuf;

/// Lays out a markup file and prints the leaves as JSON.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Options {
    /// Markup file to lay out
    pub markup: PathBuf,

    /// Named styles, or a single style for `default`
    #[arg(long, value_name = "FILE")]
    pub styles: Option<PathBuf>,

    /// Layout configuration (wordWrap, kerning, ...)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Word wrap width in pixels, overrides the configuration
    #[arg(long, value_name = "PIXELS")]
    pub wrap: Option<f32>,

    /// Load a font file as `id=path` (repeatable)
    #[arg(long = "font", value_name = "ID=PATH", value_parser = parse_asset)]
    pub fonts: Vec<AssetSpec>,

    /// Load an image file as `key=path` (repeatable)
    #[arg(long = "image", value_name = "KEY=PATH", value_parser = parse_asset)]
    pub images: Vec<AssetSpec>,

    /// Load installed fonts
    #[arg(long, default_value_t = false)]
    pub system_fonts: bool,

    /// Indent the JSON output
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

fn parse_asset(value: &str) -> Result<AssetSpec, String> {
    value.parse().map_err(|e: LeafTextError| e.to_string())
}

/// Loads everything the options name, lays out the markup and returns the
/// layout as JSON.
pub fn run(options: &Options) -> Result<String, LeafTextError> {
    let mut config = match &options.config {
        Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    if let Some(wrap) = options.wrap {
        config.word_wrap = wrap;
    }

    let fonts = FontLibrary::new();
    if options.system_fonts {
        load_system_fonts(&fonts);
    }
    for spec in &options.fonts {
        load_font(&fonts, spec)?;
    }
    let images = ImageLibrary::new();
    for spec in &options.images {
        load_image(&images, spec)?;
    }

    let mut formatter = Formatter::with_config(fonts, images, config);
    if let Some(path) = &options.styles {
        formatter.set_styles(StyleInput::from_json(&fs::read_to_string(path)?)?);
    }

    let markup = fs::read_to_string(&options.markup)?;
    formatter.parse(&markup);
    for key in formatter.pending_images() {
        log::warn!("Image '{}' was not loaded; laid out with its explicit size only", key);
    }

    let layout = formatter.layout();
    let json = if options.pretty {
        serde_json::to_string_pretty(layout)?
    } else {
        serde_json::to_string(layout)?
    };
    Ok(json)
}

#[cfg(feature = "system-fonts")]
fn load_system_fonts(fonts: &FontLibrary) {
    let count = fonts.load_system_fonts();
    log::info!("Loaded {} system fonts", count);
}

#[cfg(not(feature = "system-fonts"))]
fn load_system_fonts(_fonts: &FontLibrary) {
    log::warn!("Built without system font support; --system-fonts ignored");
}
