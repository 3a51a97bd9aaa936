//! # Network module
//!
//! Everything that touches a transport:
//!
//! - `session` - the `Transport` trait and its HTTP(S)/file implementation
//! - `fetcher` - turns a retrieved resource into decoded, sanitized content

pub mod fetcher;
pub mod session;

// Re-export commonly used items for convenience
pub use fetcher::{fetch, Content, Fetched};
pub use session::{RawResource, Session, Transport};
