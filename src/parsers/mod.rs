//! # Parsers module
//!
//! Everything needed to turn directive lines and fetched bodies into text:
//!
//! - `locator` - directive lines and Xanadu charrange locators
//! - `literal` - inline `data:` literals
//! - `charset` - charset detection and decoding
//! - `entities` - character reference decoding
//! - `sanitizer` - markup stripping, titles and whitespace

pub mod charset;
pub mod entities;
pub mod literal;
pub mod locator;
pub mod sanitizer;

// Re-export commonly used items for convenience
pub use charset::{decode_body, find_charset, resolve_encoding};
pub use entities::{decode_named_entities, decode_numeric_entities};
pub use literal::{parse_literal, render_literal, Literal};
pub use locator::{is_ignored_line, parse_directive, CharRange, Directive};
pub use sanitizer::{extract_title, normalize_whitespace, strip_markup};
