//! Character reference decoding: `&name;`, `&#N;` and `&#xN;`.

use nom::bytes::complete::take_while1;
use nom::character::complete::char;
use nom::combinator::opt;
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};
use std::borrow::Cow;
use std::collections::HashMap;

const DEFAULT_ENTITIES: [(&str, &str); 6] = [
    ("quot", "\u{22}"),
    ("amp", "\u{26}"),
    ("apos", "\u{27}"),
    ("lt", "\u{3C}"),
    ("gt", "\u{3E}"),
    ("nbsp", "\u{A0}"),
];

/// Named entities known to the decoder. Lookups are case-sensitive, as in HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMap {
    entities: HashMap<String, String>,
}

impl Default for EntityMap {
    fn default() -> Self {
        Self {
            entities: DEFAULT_ENTITIES
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EntityMap {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

/// `&` `#`? `[a-z0-9]+` `;`. Returns whether the reference is numeric and its body.
fn reference(input: &str) -> IResult<&str, (bool, &str)> {
    let (input, (hash, body)) = delimited(
        char('&'),
        pair(
            opt(char('#')),
            take_while1(|c: char| c.is_ascii_alphanumeric()),
        ),
        char(';'),
    )
    .parse(input)?;
    Ok((input, (hash.is_some(), body)))
}

fn numeric_reference(body: &str) -> Option<char> {
    let code = match body.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with no named entities; numeric references still decode.
    pub fn empty() -> Self {
        Self {
            entities: HashMap::new(),
        }
    }

    /// Adds or replaces a named entity.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entities.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    /// Replaces every recognized reference in `text`.
    ///
    /// Unknown names and numeric references that are not Unicode scalar
    /// values are left as written.
    pub fn decode<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('&') {
            return Cow::Borrowed(text);
        }

        let mut decoded = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(amp) = rest.find('&') {
            decoded.push_str(&rest[..amp]);
            let candidate = &rest[amp..];
            match reference(candidate) {
                Ok((remaining, (numeric, body))) => {
                    let consumed = &candidate[..candidate.len() - remaining.len()];
                    let replaced = if numeric {
                        numeric_reference(body).map(|c| decoded.push(c))
                    } else {
                        self.get(body).map(|s| decoded.push_str(s))
                    };
                    if replaced.is_none() {
                        log::debug!("Leaving unknown character reference '{}'", consumed);
                        decoded.push_str(consumed);
                    }
                    rest = remaining;
                }
                Err(_) => {
                    decoded.push('&');
                    rest = &candidate[1..];
                }
            }
        }
        decoded.push_str(rest);
        Cow::Owned(decoded)
    }
}
