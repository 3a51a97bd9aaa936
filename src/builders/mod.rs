//! # Builders module
//!
//! Produce the rendered output:
//!
//! - `link` - context links wrapping transcluded content
//! - `html_builder` - the HTML page the fragments are embedded in

pub mod html_builder;
pub mod link;

// Re-export commonly used items for convenience
pub use html_builder::{build_document, HtmlBuilder};
pub use link::{render_anchor, render_error_fragment, render_transclusion};
