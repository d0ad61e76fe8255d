use crate::LayoutError;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// The line width at which words wrap, in pixels.
    ///
    /// A word that would cross this width starts a new line; words are never
    /// split. `0` disables wrapping.
    ///
    /// Defaults to `0.0`.
    pub word_wrap: f32,

    /// Whether pair kerning (GPOS, else the `kern` table) is applied between
    /// consecutive glyphs of the same font.
    ///
    /// Defaults to `true`.
    pub kerning: bool,

    /// The font size used when no style sets one.
    ///
    /// Defaults to `12.0`.
    pub default_font_size: f32,

    /// The element whose content is taken verbatim, without tag recognition.
    ///
    /// Defaults to `"script"`.
    pub raw_text_element: String,

    /// The element that produces image leaves.
    ///
    /// Defaults to `"img"`.
    pub image_element: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            word_wrap: 0.0,
            kerning: true,
            default_font_size: 12.0,
            raw_text_element: "script".to_string(),
            image_element: "img".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Reads a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let config: LayoutConfig =
            serde_json::from_str(json).map_err(|e| LayoutError::Config(e.to_string()))?;
        if !config.word_wrap.is_finite() || config.word_wrap < 0.0 {
            return Err(LayoutError::Config(format!(
                "wordWrap must be a non-negative number, got {}",
                config.word_wrap
            )));
        }
        if config.default_font_size.is_nan() || config.default_font_size <= 0.0 {
            return Err(LayoutError::Config(format!(
                "defaultFontSize must be positive, got {}",
                config.default_font_size
            )));
        }
        Ok(config)
    }
}
