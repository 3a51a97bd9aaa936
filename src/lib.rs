//! # Transquoter Library
//!
//! Renders virtual stream lists: line-oriented lists of URLs and `data:`
//! literals, each transcluded into one HTML page as a colored link back to
//! its original context.
//!
//! ## Module organization
//!
//! - `core` - error types and the render pass driving everything else
//! - `parsers` - directive, literal, charset, entity and markup parsing
//! - `network` - transports and content fetching
//! - `transclusion` - per-pass document cache and color assignment
//! - `builders` - context links and the output page
//! - `config` - render configuration
//! - `env` - environment variable accessors

pub mod builders;
pub mod config;
pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod transclusion;

// Re-export commonly used items for convenience
pub use builders::{build_document, render_anchor};
pub use config::RenderConfig;
pub use self::core::{
    render_directive, render_stream_list, split_stream_list, TransquoterError, TransquoterResult,
    TRANSQUOTER_HOME,
};
pub use network::{Content, RawResource, Session, Transport};
pub use parsers::{parse_directive, CharRange, Directive};
pub use transclusion::{ColorClass, ResolutionContext, ResolvedDocument};
