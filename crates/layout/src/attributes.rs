//! Tag attributes as collected by the style resolver.

use leaftext_style::parsers::parse_f32;
use nom::character::complete::{digit1, one_of};
use nom::combinator::{opt, recognize};
use nom::{IResult, Parser};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

fn integer_prefix(input: &str) -> IResult<&str, &str> {
    recognize((opt(one_of("+-")), digit1)).parse(input)
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The leading integer of the value (`"60px"` is 60). `None` if the value
    /// does not start with one.
    pub fn as_integer(&self) -> Option<i64> {
        let (_, digits) = integer_prefix(self.value.trim_start()).ok()?;
        digits.parse().ok()
    }

    /// The leading decimal number of the value (`"1.5em"` is 1.5).
    pub fn as_float(&self) -> Option<f32> {
        parse_f32(self.value.trim_start()).ok().map(|(_, value)| value)
    }
}

/// An append-only list of attributes. Duplicate names are kept; lookups by
/// name return the one appended last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeList {
    attributes: Vec<Attribute>,
}

impl AttributeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().rev().find(|a| a.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|a| a.value.as_str())
    }

    pub fn as_integer(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_integer()
    }

    pub fn as_float(&self, name: &str) -> Option<f32> {
        self.get(name)?.as_float()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Extend<Attribute> for AttributeList {
    fn extend<T: IntoIterator<Item = Attribute>>(&mut self, iter: T) {
        self.attributes.extend(iter);
    }
}

impl<'a> Extend<&'a Attribute> for AttributeList {
    fn extend<T: IntoIterator<Item = &'a Attribute>>(&mut self, iter: T) {
        self.attributes.extend(iter.into_iter().cloned());
    }
}

impl FromIterator<Attribute> for AttributeList {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parsing_takes_leading_digits() {
        assert_eq!(Attribute::new("width", "60").as_integer(), Some(60));
        assert_eq!(Attribute::new("width", " 60px").as_integer(), Some(60));
        assert_eq!(Attribute::new("width", "-3").as_integer(), Some(-3));
        assert_eq!(Attribute::new("width", "12.9").as_integer(), Some(12));
        assert_eq!(Attribute::new("width", "px60").as_integer(), None);
        assert_eq!(Attribute::new("width", "").as_integer(), None);
    }

    #[test]
    fn test_float_parsing() {
        assert_eq!(Attribute::new("scale", "1.5em").as_float(), Some(1.5));
        assert_eq!(Attribute::new("scale", ".25").as_float(), Some(0.25));
        assert_eq!(Attribute::new("scale", "wide").as_float(), None);
    }

    #[test]
    fn test_lookup_is_last_wins() {
        let list: AttributeList = [
            Attribute::new("class", "outer"),
            Attribute::new("href", "x"),
            Attribute::new("class", "inner"),
        ]
        .into_iter()
        .collect();

        assert_eq!(list.len(), 3);
        assert_eq!(list.value("class"), Some("inner"));
        assert_eq!(list.value("href"), Some("x"));
        assert!(list.get("id").is_none());
        assert_eq!(list.as_integer("href"), None);
    }
}
