//! Explicit sizes for image leaves: a pixel length or a percentage of the
//! image's intrinsic size.
use crate::parsers::{parse_dimension, run_parser};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Px(f32),
    Percent(f32),
    #[default]
    Auto,
}

impl Eq for Dimension {}

impl Dimension {
    /// Resolves against `base` (the intrinsic size). `Auto` has no explicit value.
    pub fn resolve(&self, base: f32) -> Option<f32> {
        match self {
            Dimension::Px(v) => Some(*v),
            Dimension::Percent(p) => Some(p / 100.0 * base),
            Dimension::Auto => None,
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DimensionVisitor;
        impl de::Visitor<'_> for DimensionVisitor {
            type Value = Dimension;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number of pixels or a string like '60px', '50%' or 'auto'")
            }

            fn visit_str<E>(self, value: &str) -> Result<Dimension, E>
            where
                E: de::Error,
            {
                run_parser(parse_dimension, value).map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Dimension, E>
            where
                E: de::Error,
            {
                Ok(Dimension::Px(value as f32))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Dimension, E>
            where
                E: de::Error,
            {
                Ok(Dimension::Px(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Dimension, E>
            where
                E: de::Error,
            {
                Ok(Dimension::Px(value as f32))
            }
        }
        deserializer.deserialize_any(DimensionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_against_intrinsic_size() {
        assert_eq!(Dimension::Px(60.0).resolve(200.0), Some(60.0));
        assert_eq!(Dimension::Percent(50.0).resolve(200.0), Some(100.0));
        assert_eq!(Dimension::Auto.resolve(200.0), None);
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let d: Dimension = serde_json::from_str("60").unwrap();
        assert_eq!(d, Dimension::Px(60.0));
        let d: Dimension = serde_json::from_str("\"25%\"").unwrap();
        assert_eq!(d, Dimension::Percent(25.0));
        let d: Dimension = serde_json::from_str("\"12px\"").unwrap();
        assert_eq!(d, Dimension::Px(12.0));
        assert!(serde_json::from_str::<Dimension>("\"wide\"").is_err());
    }
}
