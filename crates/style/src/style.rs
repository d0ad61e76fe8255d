//! The sparse, cascading style record attached to tags.

use crate::dimension::Dimension;
use crate::font::{FontStyle, FontWeight};
use crate::parsers::{parse_length, run_parser};
use leaftext_types::Color;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Every property is optional: an unset property lets the ancestor's value
/// through when styles are folded with [`Style::merge`].
#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // Font selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,

    // Paint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<Color>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f32>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub shadow_offset_x: Option<f32>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub shadow_offset_y: Option<f32>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub underline_weight: Option<f32>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub underline_distance: Option<f32>,

    // Spacing
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, deserialize_with = "de_length", skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,

    // Explicit box size (image leaves)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
}

fn override_with<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

impl Style {
    /// Overrides every property `other` sets; properties it leaves unset keep
    /// their current value.
    pub fn merge(&mut self, other: &Style) {
        override_with(&mut self.font_family, &other.font_family);
        override_with(&mut self.font_name, &other.font_name);
        override_with(&mut self.font_size, &other.font_size);
        override_with(&mut self.font_weight, &other.font_weight);
        override_with(&mut self.font_style, &other.font_style);
        override_with(&mut self.color, &other.color);
        override_with(&mut self.stroke, &other.stroke);
        override_with(&mut self.stroke_width, &other.stroke_width);
        override_with(&mut self.shadow_color, &other.shadow_color);
        override_with(&mut self.shadow_blur, &other.shadow_blur);
        override_with(&mut self.shadow_offset_x, &other.shadow_offset_x);
        override_with(&mut self.shadow_offset_y, &other.shadow_offset_y);
        override_with(&mut self.underline_weight, &other.underline_weight);
        override_with(&mut self.underline_distance, &other.underline_distance);
        override_with(&mut self.line_height, &other.line_height);
        override_with(&mut self.letter_spacing, &other.letter_spacing);
        override_with(&mut self.width, &other.width);
        override_with(&mut self.height, &other.height);
    }

    /// Builder-style variant of [`Style::merge`].
    pub fn merged(mut self, other: &Style) -> Self {
        self.merge(other);
        self
    }

    /// Left fold of `layers` on top of `self`, later layers winning.
    pub fn cascade<'a, I>(&self, layers: I) -> Style
    where
        I: IntoIterator<Item = &'a Style>,
    {
        layers
            .into_iter()
            .fold(self.clone(), |acc, layer| acc.merged(layer))
    }

    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

/// Accepts a JSON number or a length string such as `"12px"`.
fn de_length<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LengthDef {
        Num(f32),
        Str(String),
    }

    match Option::<LengthDef>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LengthDef::Num(n)) => Ok(Some(n)),
        Some(LengthDef::Str(s)) => run_parser(parse_length, &s)
            .map(Some)
            .map_err(de::Error::custom),
    }
}
