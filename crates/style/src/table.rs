//! Named styles looked up by tag name.
//!
//! The table always carries a baseline for `default`, `b`, `i` and `a`;
//! user input is merged on top of it property by property.

use crate::font::{FontStyle, FontWeight};
use crate::parsers::StyleParseError;
use crate::style::Style;
use leaftext_types::Color;
use serde_json::Value;
use std::collections::HashMap;

/// The name of the style every cascade starts from.
pub const DEFAULT_STYLE: &str = "default";

/// Input accepted by [`StyleTable::add_styles`] and [`StyleTable::set_styles`].
#[derive(Debug, Clone, PartialEq)]
pub enum StyleInput {
    /// Styles keyed by tag name.
    Map(HashMap<String, Style>),
    /// A single record, applied to `default`.
    Single(Style),
}

impl From<Style> for StyleInput {
    fn from(style: Style) -> Self {
        StyleInput::Single(style)
    }
}

impl From<HashMap<String, Style>> for StyleInput {
    fn from(map: HashMap<String, Style>) -> Self {
        StyleInput::Map(map)
    }
}

impl<const N: usize> From<[(&str, Style); N]> for StyleInput {
    fn from(entries: [(&str, Style); N]) -> Self {
        StyleInput::Map(
            entries
                .into_iter()
                .map(|(name, style)| (name.to_string(), style))
                .collect(),
        )
    }
}

impl StyleInput {
    /// Reads style input from JSON.
    ///
    /// Each top-level key holding an object is a named style. Every other
    /// top-level value is gathered into one record that is merged into
    /// `default`, so `{"fontSize": 20, "h1": {"fontSize": 30}}` sets both.
    pub fn from_json(json: &str) -> Result<Self, StyleParseError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| StyleParseError::Json(e.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(StyleParseError::Json(
                "expected a JSON object at the top level".to_string(),
            ));
        };

        let mut named = HashMap::new();
        let mut loose = serde_json::Map::new();
        for (key, value) in entries {
            if value.is_object() {
                let style: Style = serde_json::from_value(value)
                    .map_err(|e| StyleParseError::Json(format!("style '{}': {}", key, e)))?;
                named.insert(key, style);
            } else {
                loose.insert(key, value);
            }
        }

        if !loose.is_empty() {
            let style: Style = serde_json::from_value(Value::Object(loose))
                .map_err(|e| StyleParseError::Json(e.to_string()))?;
            named
                .entry(DEFAULT_STYLE.to_string())
                .and_modify(|existing: &mut Style| existing.merge(&style))
                .or_insert(style);
        }

        Ok(StyleInput::Map(named))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    styles: HashMap<String, Style>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            styles: Self::baseline(),
        }
    }
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn baseline() -> HashMap<String, Style> {
        let mut styles = HashMap::new();
        styles.insert(
            DEFAULT_STYLE.to_string(),
            Style {
                color: Some(Color::BLACK),
                ..Default::default()
            },
        );
        styles.insert(
            "b".to_string(),
            Style {
                font_weight: Some(FontWeight::Bold),
                ..Default::default()
            },
        );
        styles.insert(
            "i".to_string(),
            Style {
                font_style: Some(FontStyle::Italic),
                ..Default::default()
            },
        );
        styles.insert(
            "a".to_string(),
            Style {
                color: Some(Color::BLUE),
                underline_weight: Some(1.0),
                underline_distance: Some(2.0),
                ..Default::default()
            },
        );
        styles
    }

    /// Discards every user style, restores the baseline, then adds `input`.
    pub fn set_styles(&mut self, input: impl Into<StyleInput>) {
        self.styles = Self::baseline();
        self.add_styles(input);
    }

    /// Merges `input` into the existing entries.
    pub fn add_styles(&mut self, input: impl Into<StyleInput>) {
        match input.into() {
            StyleInput::Single(style) => self.set_style_by_name(DEFAULT_STYLE, &style),
            StyleInput::Map(map) => {
                for (name, style) in &map {
                    self.set_style_by_name(name, style);
                }
            }
        }
    }

    /// Merges `style` into the entry for `name`, creating it if needed.
    pub fn set_style_by_name(&mut self, name: &str, style: &Style) {
        self.styles
            .entry(name.to_string())
            .or_default()
            .merge(style);
    }

    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    pub fn default_style(&self) -> Style {
        self.styles.get(DEFAULT_STYLE).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold_h1() -> Style {
        Style {
            font_size: Some(30.0),
            font_weight: Some(FontWeight::Bold),
            ..Default::default()
        }
    }

    #[test]
    fn test_baseline_entries() {
        let table = StyleTable::new();
        assert_eq!(table.len(), 4);
        assert_eq!(table.default_style().color, Some(Color::BLACK));
        assert_eq!(table.get("b").unwrap().font_weight, Some(FontWeight::Bold));
        assert_eq!(table.get("i").unwrap().font_style, Some(FontStyle::Italic));
        let a = table.get("a").unwrap();
        assert_eq!(a.color, Some(Color::BLUE));
        assert_eq!(a.underline_weight, Some(1.0));
        assert_eq!(a.underline_distance, Some(2.0));
    }

    #[test]
    fn test_set_styles_resets_to_baseline() {
        let mut table = StyleTable::new();
        table.set_styles([
            (
                "b",
                Style {
                    font_size: Some(40.0),
                    ..Default::default()
                },
            ),
            ("h1", bold_h1()),
        ]);
        assert_eq!(table.get("b").unwrap().font_size, Some(40.0));
        assert!(table.get("h1").is_some());

        table.set_styles(HashMap::new());
        assert_eq!(table, StyleTable::new());
    }

    #[test]
    fn test_add_styles_merges_property_wise() {
        let mut table = StyleTable::new();
        table.add_styles([("h1", bold_h1())]);
        table.add_styles([(
            "h1",
            Style {
                font_size: Some(24.0),
                ..Default::default()
            },
        )]);
        let h1 = table.get("h1").unwrap();
        assert_eq!(h1.font_size, Some(24.0));
        assert_eq!(h1.font_weight, Some(FontWeight::Bold));
    }

    #[test]
    fn test_single_style_applies_to_default() {
        let mut table = StyleTable::new();
        table.add_styles(Style {
            font_size: Some(20.0),
            ..Default::default()
        });
        let default = table.default_style();
        assert_eq!(default.font_size, Some(20.0));
        assert_eq!(default.color, Some(Color::BLACK));
    }

    #[test]
    fn test_from_json_mixed_keys() {
        let input = StyleInput::from_json(
            r#"{
                "fontSize": 20,
                "fontFamily": "Roboto",
                "h1": {"fontSize": "30px"},
                "default": {"color": "red"}
            }"#,
        )
        .unwrap();
        let mut table = StyleTable::new();
        table.set_styles(input);

        let default = table.default_style();
        assert_eq!(default.font_size, Some(20.0));
        assert_eq!(default.font_family.as_deref(), Some("Roboto"));
        assert_eq!(default.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(table.get("h1").unwrap().font_size, Some(30.0));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(matches!(
            StyleInput::from_json("[1, 2]"),
            Err(StyleParseError::Json(_))
        ));
        assert!(StyleInput::from_json("{\"h1\": {\"fontSize\": \"huge\"}}").is_err());
    }
}
