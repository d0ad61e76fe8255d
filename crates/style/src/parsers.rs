//! Low-level nom parser functions for style values.
//!
//! This module provides composable parser functions for lengths, dimensions
//! and colors, plus the dispatcher that applies `key:value` declarations from
//! an inline `style="..."` attribute to a [`Style`].

use crate::dimension::Dimension;
use crate::font::{FontStyle, FontWeight};
use crate::style::Style;
use leaftext_types::Color;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1, take_while_m_n};
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{map, map_opt, map_res, opt, recognize, value};
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};
use thiserror::Error;

/// Errors that can occur during style parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Unknown style property: '{0}'")]
    UnknownProperty(String),

    #[error("Invalid style table JSON: {0}")]
    Json(String),
}

// --- Helper Parsers ---

/// Parses a signed decimal number ("12", "-0.5", ".75").
pub fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(pair(
            opt(alt((char('+'), char('-')))),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit1)))),
                recognize(pair(char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

// --- Unit & Dimension Parsers ---

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        value(1.0, tag_no_case("px")),
        value(96.0 / 72.0, tag_no_case("pt")),
        value(96.0, tag_no_case("in")),
        value(96.0 / 2.54, tag_no_case("cm")),
        value(96.0 / 25.4, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length in pixels with an optional unit (e.g., "12", "12px", "9pt").
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    let (input, number) = parse_f32(input)?;
    let (input, unit_multiplier) = opt(parse_unit).parse(input)?;
    Ok((input, number * unit_multiplier.unwrap_or(1.0)))
}

/// Parses a dimension value (length, percentage, or "auto").
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        value(Dimension::Auto, tag_no_case("auto")),
        map(pair(parse_f32, char('%')), |(val, _)| Dimension::Percent(val)),
        map(parse_length, Dimension::Px),
    ))
    .parse(input)
}

// --- Color Parsers ---

fn parse_hex_color(input: &str) -> IResult<&str, Color> {
    map_res(
        preceded(char('#'), take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit())),
        |hex: &str| format!("#{}", hex).parse::<Color>(),
    )
    .parse(input)
}

fn parse_channel(input: &str) -> IResult<&str, u8> {
    map_res(delimited(space0, digit1, space0), |s: &str| s.parse::<u8>()).parse(input)
}

fn parse_rgb_function(input: &str) -> IResult<&str, Color> {
    let (input, has_alpha) = alt((
        value(true, tag_no_case("rgba(")),
        value(false, tag_no_case("rgb(")),
    ))
    .parse(input)?;
    let (input, (r, _, g, _, b)) =
        (parse_channel, char(','), parse_channel, char(','), parse_channel).parse(input)?;
    let (input, a) = if has_alpha {
        preceded(char(','), delimited(space0, parse_f32, space0)).parse(input)?
    } else {
        (input, 1.0)
    };
    let (input, _) = tag(")").parse(input)?;
    Ok((
        input,
        Color {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        },
    ))
}

fn parse_named_color(input: &str) -> IResult<&str, Color> {
    map_opt(take_while1(|c: char| c.is_ascii_alphabetic()), Color::named).parse(input)
}

/// Parses a color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` or a keyword.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((parse_hex_color, parse_rgb_function, parse_named_color)).parse(input)
}

/// Helper to run a nom parser and convert its result to a `Result<T, StyleParseError>`.
pub fn run_parser<'a, T, F>(mut parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>>,
{
    match parser.parse(input.trim()) {
        Ok(("", result)) => Ok(result),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Parser did not consume all input. Remainder: '{}'",
            rem
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

// --- High-level Parse Functions ---

/// Parses a font weight string (e.g., "bold", "400").
pub fn parse_font_weight(s: &str) -> Result<FontWeight, StyleParseError> {
    FontWeight::parse(s).map_err(|_| StyleParseError::InvalidValue {
        property: "font-weight".to_string(),
        value: s.to_string(),
    })
}

/// Parses a font style string (e.g., "normal", "italic").
pub fn parse_font_style(s: &str) -> Result<FontStyle, StyleParseError> {
    FontStyle::parse(s).map_err(|_| StyleParseError::InvalidValue {
        property: "font-style".to_string(),
        value: s.to_string(),
    })
}

/// Folds `fontSize`, `font-size` and `font_size` onto one lookup key.
fn normalize_property(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Applies a single style declaration to a `Style`.
/// This is the central dispatcher for every property an inline style may set.
pub fn apply_style_property(
    style: &mut Style,
    property: &str,
    value: &str,
) -> Result<(), StyleParseError> {
    match normalize_property(property).as_str() {
        "fontfamily" => style.font_family = Some(value.to_string()),
        "fontname" => style.font_name = Some(value.to_string()),
        "fontsize" => style.font_size = Some(run_parser(parse_length, value)?),
        "fontweight" => style.font_weight = Some(parse_font_weight(value)?),
        "fontstyle" => style.font_style = Some(parse_font_style(value)?),
        "color" => style.color = Some(run_parser(parse_color, value)?),
        "stroke" => style.stroke = Some(run_parser(parse_color, value)?),
        "strokewidth" => style.stroke_width = Some(run_parser(parse_length, value)?),
        "shadowcolor" => style.shadow_color = Some(run_parser(parse_color, value)?),
        "shadowblur" => style.shadow_blur = Some(run_parser(parse_length, value)?),
        "shadowoffsetx" => style.shadow_offset_x = Some(run_parser(parse_length, value)?),
        "shadowoffsety" => style.shadow_offset_y = Some(run_parser(parse_length, value)?),
        "underlineweight" => style.underline_weight = Some(run_parser(parse_length, value)?),
        "underlinedistance" => style.underline_distance = Some(run_parser(parse_length, value)?),
        "lineheight" => style.line_height = Some(run_parser(parse_length, value)?),
        "letterspacing" => style.letter_spacing = Some(run_parser(parse_length, value)?),
        "width" => style.width = Some(run_parser(parse_dimension, value)?),
        "height" => style.height = Some(run_parser(parse_dimension, value)?),
        _ => return Err(StyleParseError::UnknownProperty(property.to_string())),
    };
    Ok(())
}

/// Parses an inline `style="key:value;..."` attribute.
///
/// All spaces are stripped before splitting, so `font-family:Open Sans`
/// names the family `OpenSans`. Declarations that fail to parse are skipped;
/// the remaining ones still apply.
pub fn parse_inline_style(declarations: &str) -> Style {
    let compact: String = declarations.chars().filter(|c| *c != ' ').collect();
    let mut style = Style::default();
    for declaration in compact.split(';') {
        let Some((key, value)) = declaration.split_once(':') else {
            continue;
        };
        if let Err(e) = apply_style_property(&mut style, key, value) {
            log::debug!("Ignoring inline style declaration '{}': {}", declaration, e);
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(run_parser(parse_length, "12px").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, " 12 ").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, "1in").unwrap(), 96.0);
        assert_eq!(run_parser(parse_length, "-.5").unwrap(), -0.5);
        assert!((run_parser(parse_length, "9pt").unwrap() - 12.0).abs() < 1e-4);
        assert!(run_parser(parse_length, "abc").is_err());
        assert!(run_parser(parse_length, "12furlongs").is_err());
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(run_parser(parse_dimension, "60").unwrap(), Dimension::Px(60.0));
        assert_eq!(
            run_parser(parse_dimension, "50%").unwrap(),
            Dimension::Percent(50.0)
        );
        assert_eq!(run_parser(parse_dimension, "AUTO").unwrap(), Dimension::Auto);
        assert!(run_parser(parse_dimension, "50p").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(run_parser(parse_color, "#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(run_parser(parse_color, "#f00").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(run_parser(parse_color, "blue").unwrap(), Color::BLUE);
        assert_eq!(
            run_parser(parse_color, "rgb(1, 2,3)").unwrap(),
            Color::rgb(1, 2, 3)
        );
        let c = run_parser(parse_color, "rgba(10,20,30,0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 0.5));
        assert!(run_parser(parse_color, "rgb(300,0,0)").is_err());
        assert!(run_parser(parse_color, "chartreusish").is_err());
    }

    #[test]
    fn test_apply_property_accepts_both_spellings() {
        let mut style = Style::default();
        apply_style_property(&mut style, "fontSize", "20").unwrap();
        apply_style_property(&mut style, "letter-spacing", "2px").unwrap();
        assert_eq!(style.font_size, Some(20.0));
        assert_eq!(style.letter_spacing, Some(2.0));

        assert!(matches!(
            apply_style_property(&mut style, "flexGrow", "1"),
            Err(StyleParseError::UnknownProperty(_))
        ));
        assert!(matches!(
            apply_style_property(&mut style, "fontWeight", "heavy-ish"),
            Err(StyleParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_inline_style() {
        let style = parse_inline_style(concat!(
            "color: red; font-size: 18px;",
            "fontWeight:Bold; bogus:1;width:50%",
        ));
        assert_eq!(style.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(style.font_size, Some(18.0));
        assert_eq!(style.font_weight, Some(FontWeight::Bold));
        assert_eq!(style.width, Some(Dimension::Percent(50.0)));
    }

    #[test]
    fn test_parse_inline_style_skips_malformed_declarations() {
        let style = parse_inline_style(";;fontSize;color:nocolor;fontStyle:italic");
        assert_eq!(style.font_size, None);
        assert_eq!(style.color, None);
        assert_eq!(style.font_style, Some(FontStyle::Italic));
    }
}
