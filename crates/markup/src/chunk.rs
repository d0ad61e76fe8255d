//! nom matchers for the pieces of markup the tokenizer recognizes.
//!
//! Each matcher is anchored at the start of its input and returns the
//! unconsumed remainder, so the tokenizer advances by the consumed length.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_while1};
use nom::character::complete::{char, multispace0, multispace1, one_of};
use nom::combinator::{opt, recognize, value};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_attribute_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// `([a-z0-9-]+:)?[a-z0-9-]+`, falling back to the unprefixed form when a
/// prefix is not followed by a local name.
fn qualified_name(input: &str, is_name_char: fn(char) -> bool) -> IResult<&str, &str> {
    alt((
        recognize((take_while1(is_name_char), char(':'), take_while1(is_name_char))),
        take_while1(is_name_char),
    ))
    .parse(input)
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    qualified_name(input, is_tag_name_char)
}

fn attribute_name_token(input: &str) -> IResult<&str, &str> {
    qualified_name(input, is_attribute_name_char)
}

/// `<name`: the start of an opening tag. Returns the tag name.
pub fn opening_tag(input: &str) -> IResult<&str, &str> {
    preceded(char('<'), tag_name).parse(input)
}

/// `</name>`. Returns the tag name.
pub fn closing_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("</"), tag_name, char('>')).parse(input)
}

/// A run of characters up to the next `<`.
pub fn text(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == '<').parse(input)
}

/// `\s*>` or `\s*/>`. Returns whether the tag closed itself.
pub fn tag_end(input: &str) -> IResult<&str, bool> {
    preceded(
        multispace0,
        alt((value(true, tag("/>")), value(false, tag(">")))),
    )
    .parse(input)
}

/// Leading whitespace, an attribute name and an optional `\s*=\s*`.
/// Returns the name and whether a value follows.
pub fn attribute_name(input: &str) -> IResult<&str, (&str, bool)> {
    let (input, (_, name, eq)) = (
        multispace1,
        attribute_name_token,
        opt((multispace0, char('='), multispace0)),
    )
        .parse(input)?;
    Ok((input, (name, eq.is_some())))
}

fn quoted_value(input: &str) -> IResult<&str, &str> {
    let (input, quote) = one_of("\"'").parse(input)?;
    let (input, value) = take_till(|c: char| c == quote).parse(input)?;
    // An unterminated quote runs to the end of the input.
    let (input, _) = opt(char(quote)).parse(input)?;
    Ok((input, value))
}

/// The value after `=`: quoted with `"` or `'`, or bare up to whitespace or `>`.
pub fn attribute_value(input: &str) -> IResult<&str, &str> {
    alt((
        quoted_value,
        take_till(|c: char| c == '>' || c.is_whitespace()),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_tag() {
        assert_eq!(opening_tag("<b>x"), Ok((">x", "b")));
        assert_eq!(opening_tag("<svg:rect x"), Ok((" x", "svg:rect")));
        assert_eq!(opening_tag("<H1 "), Ok((" ", "H1")));
        // A dangling prefix still yields the bare name.
        assert_eq!(opening_tag("<a:>"), Ok((":>", "a")));
        assert!(opening_tag("< b>").is_err());
        assert!(opening_tag("</b>").is_err());
    }

    #[test]
    fn test_closing_tag() {
        assert_eq!(closing_tag("</b>rest"), Ok(("rest", "b")));
        assert!(closing_tag("</b >").is_err());
        assert!(closing_tag("</b").is_err());
    }

    #[test]
    fn test_text_stops_at_bracket() {
        assert_eq!(text("hello <b>"), Ok(("<b>", "hello ")));
        assert!(text("<b>").is_err());
    }

    #[test]
    fn test_tag_end() {
        assert_eq!(tag_end(">x"), Ok(("x", false)));
        assert_eq!(tag_end("  />x"), Ok(("x", true)));
        assert!(tag_end(" / >").is_err());
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(attribute_name(" src = \"a\""), Ok(("\"a\"", ("src", true))));
        assert_eq!(attribute_name(" data_x>"), Ok((">", ("data_x", false))));
        assert_eq!(
            attribute_name("\n xlink:href=x"),
            Ok(("x", ("xlink:href", true)))
        );
        // Leading whitespace is required.
        assert!(attribute_name("src=x").is_err());
    }

    #[test]
    fn test_attribute_value() {
        assert_eq!(attribute_value("\"a b\" c"), Ok((" c", "a b")));
        assert_eq!(attribute_value("'it\"s'>"), Ok((">", "it\"s")));
        assert_eq!(attribute_value("60 height"), Ok((" height", "60")));
        assert_eq!(attribute_value("60>"), Ok((">", "60")));
        assert_eq!(attribute_value("\"open"), Ok(("", "open")));
        assert_eq!(attribute_value(">"), Ok((">", "")));
    }
}
