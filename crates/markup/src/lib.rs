//! Markup tokenizer for the leaftext dialect.
//!
//! The dialect is a forgiving subset of HTML: nested tags with attributes,
//! `/>` self-closing tags, text and character references. Nothing is ever
//! rejected; markup that does not form a tag is returned as text.

pub mod chunk;
pub mod entities;
pub mod tokenizer;

pub use entities::EntityMap;
pub use tokenizer::{Token, Tokenizer, Tokens};
