//! Turns tokens into styled runs.
//!
//! The resolver keeps one level per open tag. Every text token, and every
//! finished image element, is emitted as a [`ResolvedRun`] carrying the
//! cascaded style and the attributes of all open levels.

use crate::attributes::{Attribute, AttributeList};
use leaftext_markup::Token;
use leaftext_style::parsers::parse_inline_style;
use leaftext_style::{Style, StyleTable};

#[derive(Debug, Clone, PartialEq)]
pub enum RunContent {
    Text(String),
    Image,
}

/// A piece of content with everything the leaf builder needs to know about
/// its context.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    /// The innermost open tag, `None` at top level.
    pub tag: Option<String>,
    pub content: RunContent,
    pub style: Style,
    pub attributes: AttributeList,
}

#[derive(Debug)]
struct Level {
    tag: String,
    tag_style: Option<Style>,
    inline: Style,
    attributes: AttributeList,
}

#[derive(Debug)]
pub struct StyleResolver<'a> {
    table: &'a StyleTable,
    image_element: &'a str,
    levels: Vec<Level>,
}

impl<'a> StyleResolver<'a> {
    pub fn new(table: &'a StyleTable, image_element: &'a str) -> Self {
        Self {
            table,
            image_element,
            levels: Vec::new(),
        }
    }

    /// Open tag names, outermost first.
    pub fn open_tags(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.tag.as_str())
    }

    /// Default style, then each level's tag style and inline style, outermost
    /// first.
    pub fn merged_style(&self) -> Style {
        let layers = self
            .levels
            .iter()
            .flat_map(|level| level.tag_style.iter().chain(std::iter::once(&level.inline)));
        self.table.default_style().cascade(layers)
    }

    pub fn merged_attributes(&self) -> AttributeList {
        let mut merged = AttributeList::new();
        for level in &self.levels {
            merged.extend(level.attributes.iter());
        }
        merged
    }

    fn is_image(&self, tag: &str) -> bool {
        tag.eq_ignore_ascii_case(self.image_element)
    }

    fn top_is_image(&self) -> bool {
        self.levels.last().is_some_and(|l| self.is_image(&l.tag))
    }

    fn run(&self, content: RunContent) -> ResolvedRun {
        ResolvedRun {
            tag: self.levels.last().map(|l| l.tag.clone()),
            content,
            style: self.merged_style(),
            attributes: self.merged_attributes(),
        }
    }

    /// Emits the image for the innermost level and closes it.
    fn finish_image(&mut self) -> ResolvedRun {
        let run = self.run(RunContent::Image);
        self.levels.pop();
        run
    }

    /// Feeds one token. Returns a run for text and for completed images.
    pub fn feed(&mut self, token: Token) -> Option<ResolvedRun> {
        match token {
            Token::OpeningTag(tag) => {
                let tag_style = self.table.get(&tag).cloned();
                self.levels.push(Level {
                    tag,
                    tag_style,
                    inline: Style::default(),
                    attributes: AttributeList::new(),
                });
                None
            }
            Token::Attribute(name, value) => {
                if let Some(level) = self.levels.last_mut() {
                    if name.eq_ignore_ascii_case("style") {
                        level.inline.merge(&parse_inline_style(&value));
                    }
                    level.attributes.push(Attribute::new(name, value));
                }
                None
            }
            Token::OpeningTagEnd(_, self_closing) => {
                if self.top_is_image() {
                    return Some(self.finish_image());
                }
                if self_closing {
                    self.levels.pop();
                }
                None
            }
            Token::ClosingTag(tag) => {
                if self.top_is_image() {
                    return Some(self.finish_image());
                }
                if self.is_image(&tag) {
                    log::debug!("Ignoring stray </{}>", tag);
                    return None;
                }
                if self.levels.pop().is_none() {
                    log::debug!("Ignoring </{}> with no open tag", tag);
                }
                None
            }
            Token::Text(text) => Some(self.run(RunContent::Text(text))),
        }
    }

    /// Feeds every token and collects the runs.
    pub fn resolve(mut self, tokens: impl IntoIterator<Item = Token>) -> Vec<ResolvedRun> {
        tokens.into_iter().filter_map(|t| self.feed(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaftext_markup::Tokenizer;
    use leaftext_style::{FontStyle, FontWeight};
    use leaftext_types::Color;

    fn resolve(table: &StyleTable, markup: &str) -> Vec<ResolvedRun> {
        let tokenizer = Tokenizer::new();
        StyleResolver::new(table, "img").resolve(tokenizer.tokenize(markup))
    }

    fn text(run: &ResolvedRun) -> &str {
        match &run.content {
            RunContent::Text(t) => t,
            RunContent::Image => "",
        }
    }

    #[test]
    fn test_nested_styles_cascade() {
        let table = StyleTable::new();
        let runs = resolve(&table, "plain <b>bold <i>both</i></b> end");
        let texts: Vec<_> = runs.iter().map(text).collect();
        assert_eq!(texts, vec!["plain ", "bold ", "both", " end"]);

        assert_eq!(runs[0].tag, None);
        assert_eq!(runs[0].style.font_weight, None);
        assert_eq!(runs[0].style.color, Some(Color::BLACK));

        assert_eq!(runs[1].tag.as_deref(), Some("b"));
        assert_eq!(runs[1].style.font_weight, Some(FontWeight::Bold));

        assert_eq!(runs[2].tag.as_deref(), Some("i"));
        assert_eq!(runs[2].style.font_weight, Some(FontWeight::Bold));
        assert_eq!(runs[2].style.font_style, Some(FontStyle::Italic));

        assert_eq!(runs[3].style.font_weight, None);
    }

    #[test]
    fn test_inline_style_overrides_tag_style() {
        let table = StyleTable::new();
        let runs = resolve(
            &table,
            r#"<a href="x" style="color: red; font-size: 20px">link</a>"#,
        );
        assert_eq!(runs.len(), 1);
        let style = &runs[0].style;
        assert_eq!(style.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(style.font_size, Some(20.0));
        assert_eq!(style.underline_weight, Some(1.0));
        assert_eq!(runs[0].attributes.value("href"), Some("x"));
    }

    #[test]
    fn test_attributes_accumulate_outermost_first() {
        let table = StyleTable::new();
        let runs = resolve(&table, r#"<p class="outer" id="p"><span class="inner">x</span></p>"#);
        let attributes = &runs[0].attributes;
        let names: Vec<_> = attributes.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(names, vec!["outer", "p", "inner"]);
        assert_eq!(attributes.value("class"), Some("inner"));
    }

    #[test]
    fn test_unknown_tag_is_empty_override() {
        let table = StyleTable::new();
        let runs = resolve(&table, "<blink>x</blink>");
        assert_eq!(runs[0].style, table.default_style());
        assert_eq!(runs[0].tag.as_deref(), Some("blink"));
    }

    #[test]
    fn test_image_is_void_element() {
        let table = StyleTable::new();
        for markup in [
            r#"<img src="logo" width=60>after"#,
            r#"<img src="logo" width=60/>after"#,
            r#"<img src="logo" width=60></img>after"#,
        ] {
            let runs = resolve(&table, markup);
            assert_eq!(runs.len(), 2, "{}", markup);
            assert_eq!(runs[0].content, RunContent::Image);
            assert_eq!(runs[0].tag.as_deref(), Some("img"));
            assert_eq!(runs[0].attributes.as_integer("width"), Some(60));
            assert_eq!(runs[1].tag, None);
            assert!(runs[1].attributes.is_empty());
        }
    }

    #[test]
    fn test_image_inside_styled_tag() {
        let table = StyleTable::new();
        let runs = resolve(&table, r#"<b><img src="x">y</b>z"#);
        assert_eq!(runs[0].content, RunContent::Image);
        assert_eq!(runs[0].style.font_weight, Some(FontWeight::Bold));
        assert_eq!(runs[1].tag.as_deref(), Some("b"));
        assert_eq!(runs[2].tag, None);
    }

    #[test]
    fn test_closing_tags_pop_innermost_level() {
        let table = StyleTable::new();
        // Mismatched names still close the innermost tag.
        let runs = resolve(&table, "<b><i>x</b>y</i>z</b>w");
        assert_eq!(runs[0].tag.as_deref(), Some("i"));
        assert_eq!(runs[1].tag.as_deref(), Some("b"));
        assert_eq!(runs[2].tag, None);
        assert_eq!(runs[3].tag, None);
    }

    #[test]
    fn test_self_closing_tag_pops_its_level() {
        let table = StyleTable::new();
        let runs = resolve(&table, "<b/>x");
        assert_eq!(runs[0].tag, None);
        assert_eq!(runs[0].style.font_weight, None);
    }

    #[test]
    fn test_open_tags() {
        let table = StyleTable::new();
        let tokenizer = Tokenizer::new();
        let mut resolver = StyleResolver::new(&table, "img");
        for token in tokenizer.tokenize("<a><b>") {
            resolver.feed(token);
        }
        assert_eq!(resolver.open_tags().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
