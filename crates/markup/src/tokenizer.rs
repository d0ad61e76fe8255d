//! The markup scanner.
//!
//! [`Tokenizer::tokenize`] returns a lazy [`Tokens`] iterator. The scanner is
//! a small state machine over three states:
//!
//! - in text: `<name` opens a tag, `</name>` closes one, everything else is text
//! - in a tag: attributes until `>` or `/>`; anything else drops back to text
//! - in raw text: tags are not recognized until the raw-text element closes
//!
//! Adjacent text pieces are joined before character references are decoded,
//! so a stray `<` in the middle of a sentence does not split it.

use crate::chunk;
use crate::entities::EntityMap;

/// The element whose content is passed through as text.
pub const DEFAULT_RAW_TEXT_ELEMENT: &str = "script";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<name`
    OpeningTag(String),
    /// `>` or `/>` closing an opening tag; the flag is set for `/>`.
    OpeningTagEnd(String, bool),
    /// `</name>`
    ClosingTag(String),
    /// `name="value"` inside an opening tag. A bare `name` has an empty value.
    Attribute(String, String),
    /// Decoded text, never empty.
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InText,
    InTag,
    InRawText,
}

/// Undecoded scanner output borrowing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken<'a> {
    OpeningTag(&'a str),
    OpeningTagEnd(&'a str, bool),
    ClosingTag(&'a str),
    Attribute(&'a str, &'a str),
    Text(&'a str),
}

#[derive(Debug)]
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    state: State,
    current_tag: &'a str,
    raw_text_element: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, raw_text_element: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: State::InText,
            current_tag: "",
            raw_text_element,
        }
    }

    fn advance_to(&mut self, remaining: &'a str) {
        self.pos = self.input.len() - remaining.len();
    }

    fn scan_text(&mut self, rest: &'a str) -> RawToken<'a> {
        if rest.starts_with('<') {
            if let Ok((remaining, name)) = chunk::opening_tag(rest) {
                self.advance_to(remaining);
                self.current_tag = name;
                self.state = State::InTag;
                return RawToken::OpeningTag(name);
            }
            if let Ok((remaining, name)) = chunk::closing_tag(rest) {
                self.advance_to(remaining);
                return RawToken::ClosingTag(name);
            }
            // A lone '<' is literal text.
            self.pos += 1;
            return RawToken::Text(&rest[..1]);
        }

        match chunk::text(rest) {
            Ok((remaining, text)) => {
                self.advance_to(remaining);
                RawToken::Text(text)
            }
            // Unreachable for non-empty input that does not start with '<'.
            Err(_) => {
                self.pos = self.input.len();
                RawToken::Text(rest)
            }
        }
    }

    /// Returns `None` when the tag is abandoned; the state is then back to text.
    fn scan_tag(&mut self, rest: &'a str) -> Option<RawToken<'a>> {
        if let Ok((remaining, (name, has_value))) = chunk::attribute_name(rest) {
            if !has_value {
                self.advance_to(remaining);
                return Some(RawToken::Attribute(name, ""));
            }
            let (remaining, value) = chunk::attribute_value(remaining).unwrap_or((remaining, ""));
            self.advance_to(remaining);
            return Some(RawToken::Attribute(name, value));
        }

        if let Ok((remaining, self_closing)) = chunk::tag_end(rest) {
            self.advance_to(remaining);
            let enters_raw_text =
                !self_closing && self.current_tag.eq_ignore_ascii_case(self.raw_text_element);
            self.state = if enters_raw_text {
                State::InRawText
            } else {
                State::InText
            };
            return Some(RawToken::OpeningTagEnd(self.current_tag, self_closing));
        }

        log::debug!(
            "Abandoning unterminated <{}> at byte {}",
            self.current_tag,
            self.pos
        );
        self.state = State::InText;
        None
    }

    /// Everything up to the closing tag of the raw-text element is text.
    fn scan_raw_text(&mut self, rest: &'a str) -> Option<RawToken<'a>> {
        self.state = State::InText;
        let end = rest
            .match_indices("</")
            .map(|(i, _)| i)
            .find(|&i| {
                chunk::closing_tag(&rest[i..])
                    .is_ok_and(|(_, name)| name.eq_ignore_ascii_case(self.raw_text_element))
            })
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(RawToken::Text(&rest[..end]))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = RawToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input;
        while self.pos < input.len() {
            let rest = &input[self.pos..];
            let token = match self.state {
                State::InText => Some(self.scan_text(rest)),
                State::InTag => self.scan_tag(rest),
                State::InRawText => self.scan_raw_text(rest),
            };
            if token.is_some() {
                return token;
            }
        }
        None
    }
}

/// Markup tokenizer configured with an entity map and a raw-text element.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    entities: EntityMap,
    raw_text_element: String,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            entities: EntityMap::default(),
            raw_text_element: DEFAULT_RAW_TEXT_ELEMENT.to_string(),
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(mut self, entities: EntityMap) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_raw_text_element(mut self, name: impl Into<String>) -> Self {
        self.raw_text_element = name.into();
        self
    }

    /// Adds named entities on top of the configured ones.
    pub fn add_entities<K, V>(&mut self, entities: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entities.extend(entities);
    }

    pub fn entities(&self) -> &EntityMap {
        &self.entities
    }

    /// Scans `input` lazily. Never fails; markup that does not form a tag
    /// comes back as text.
    pub fn tokenize<'a>(&'a self, input: &'a str) -> Tokens<'a> {
        Tokens {
            scanner: Scanner::new(input, &self.raw_text_element),
            entities: &self.entities,
            pending: None,
        }
    }
}

/// Iterator over the tokens of one input.
#[derive(Debug)]
pub struct Tokens<'a> {
    scanner: Scanner<'a>,
    entities: &'a EntityMap,
    pending: Option<Token>,
}

impl Tokens<'_> {
    fn convert(&self, raw: RawToken<'_>) -> Token {
        match raw {
            RawToken::OpeningTag(name) => Token::OpeningTag(name.to_string()),
            RawToken::OpeningTagEnd(name, self_closing) => {
                Token::OpeningTagEnd(name.to_string(), self_closing)
            }
            RawToken::ClosingTag(name) => Token::ClosingTag(name.to_string()),
            RawToken::Attribute(name, value) => {
                Token::Attribute(name.to_string(), self.entities.decode(value).into_owned())
            }
            RawToken::Text(text) => Token::Text(text.to_string()),
        }
    }

    fn decoded_text(&self, text: &str) -> Option<Token> {
        let decoded = self.entities.decode(text);
        (!decoded.is_empty()).then(|| Token::Text(decoded.into_owned()))
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        let mut text = String::new();
        while let Some(raw) = self.scanner.next() {
            match raw {
                RawToken::Text(piece) => text.push_str(piece),
                other => {
                    let token = self.convert(other);
                    match self.decoded_text(&text) {
                        Some(text_token) => {
                            self.pending = Some(token);
                            return Some(text_token);
                        }
                        None => return Some(token),
                    }
                }
            }
        }
        self.decoded_text(&text)
    }
}
