pub mod dimension;
pub mod font;
pub mod parsers;
pub mod style;
pub mod table;

pub use dimension::Dimension;
pub use font::{FontStyle, FontWeight};
pub use parsers::StyleParseError;
pub use style::Style;
pub use table::{StyleInput, StyleTable};
