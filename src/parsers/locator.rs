//! Directive parsing
//!
//! A directive line is either a `data:` literal or a URL, optionally ending
//! in a Xanadu locator suffix selecting a character range:
//!
//! ```text
//! http://example.com/doc.txt?xuversion=1.0&locspec=charrange:120/45
//! ```

use crate::core::{TransquoterError, TransquoterResult};
use crate::parsers::literal::{parse_literal, Literal};

/// Prefix shared by every Xanadu locator suffix
pub const LOCATOR_PREFIX: &str = "?xuversion=1.0&locspec=";
/// Locator suffix selecting a character range
pub const CHARRANGE_LOCATOR: &str = "?xuversion=1.0&locspec=charrange:";
/// Locator suffix selecting an area; passed through untouched
pub const AREA_LOCATOR: &str = "?xuversion=1.0&locspec=area:";

/// A window of `length` characters starting at character `start`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharRange {
    pub start: usize,
    pub length: usize,
}

impl CharRange {
    /// Parses the `<start>/<length>` tail of a charrange locator
    fn parse(tail: &str) -> Option<Self> {
        let (start, length) = tail.split_once('/')?;
        Some(CharRange {
            start: start.parse().ok()?,
            length: length.parse().ok()?,
        })
    }
}

/// One parsed line of a virtual stream list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// A URL fetched and transcluded whole
    PlainUrl(String),
    /// A URL with a charrange locator
    RangedUrl {
        /// The URL with the locator removed; the cache and color key
        base: String,
        /// The URL actually requested from the origin
        request: String,
        range: CharRange,
    },
    /// An inline `data:` literal
    LiteralData(Literal),
}

impl Directive {
    /// The cache and color key of a URL directive
    pub fn base_url(&self) -> Option<&str> {
        match self {
            Directive::PlainUrl(url) => Some(url),
            Directive::RangedUrl { base, .. } => Some(base),
            Directive::LiteralData(_) => None,
        }
    }

    /// The URL handed to the transport for a URL directive
    pub fn request_url(&self) -> Option<&str> {
        match self {
            Directive::PlainUrl(url) => Some(url),
            Directive::RangedUrl { request, .. } => Some(request),
            Directive::LiteralData(_) => None,
        }
    }

    pub fn range(&self) -> Option<CharRange> {
        match self {
            Directive::RangedUrl { range, .. } => Some(*range),
            _ => None,
        }
    }
}

/// Returns true for lines that are blank or comments
pub fn is_ignored_line(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Whether the request should keep the locator so the origin can answer
/// with just the slice. Schemes other than http(s) and URLs that already
/// carry a query string are fetched bare and sliced locally.
fn origin_understands_locator(line: &str) -> bool {
    let scheme = line.split(':').next().unwrap_or_default();
    scheme.to_ascii_lowercase().contains("http") && line.matches('?').count() <= 1
}

/// Parses a trimmed, non-comment directive line
pub fn parse_directive(line: &str) -> TransquoterResult<Directive> {
    if line
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    {
        return parse_literal(line).map(Directive::LiteralData);
    }

    let Some(position) = line.rfind(CHARRANGE_LOCATOR) else {
        return Ok(Directive::PlainUrl(line.to_string()));
    };

    let base = &line[..position];
    let range = CharRange::parse(&line[position + CHARRANGE_LOCATOR.len()..])
        .ok_or_else(|| TransquoterError::Format(line.to_string()))?;

    let request = if origin_understands_locator(line) {
        line
    } else {
        base
    };

    Ok(Directive::RangedUrl {
        base: base.to_string(),
        request: request.to_string(),
        range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_url() {
        assert_eq!(
            parse_directive("http://example.com/a.txt").unwrap(),
            Directive::PlainUrl("http://example.com/a.txt".to_string())
        );
    }

    #[test]
    fn test_http_range_keeps_locator_in_request() {
        let line = "http://example.com/a.txt?xuversion=1.0&locspec=charrange:10/20";
        let directive = parse_directive(line).unwrap();
        assert_eq!(directive.base_url(), Some("http://example.com/a.txt"));
        assert_eq!(directive.request_url(), Some(line));
        assert_eq!(
            directive.range(),
            Some(CharRange {
                start: 10,
                length: 20
            })
        );
    }

    #[test]
    fn test_non_http_scheme_requests_base() {
        let directive =
            parse_directive("file:///tmp/a.txt?xuversion=1.0&locspec=charrange:0/5").unwrap();
        assert_eq!(directive.request_url(), Some("file:///tmp/a.txt"));
    }

    #[test]
    fn test_existing_query_requests_base() {
        let directive =
            parse_directive("https://example.com/q?id=7?xuversion=1.0&locspec=charrange:0/5")
                .unwrap();
        assert_eq!(directive.base_url(), Some("https://example.com/q?id=7"));
        assert_eq!(directive.request_url(), Some("https://example.com/q?id=7"));
    }

    #[test]
    fn test_last_locator_wins() {
        let line = "http://a/?xuversion=1.0&locspec=charrange:1/2?xuversion=1.0&locspec=charrange:3/4";
        let directive = parse_directive(line).unwrap();
        assert_eq!(
            directive.base_url(),
            Some("http://a/?xuversion=1.0&locspec=charrange:1/2")
        );
        assert_eq!(directive.range(), Some(CharRange { start: 3, length: 4 }));
    }

    #[test]
    fn test_malformed_range() {
        for line in [
            "http://a/?xuversion=1.0&locspec=charrange:x/2",
            "http://a/?xuversion=1.0&locspec=charrange:12",
            "http://a/?xuversion=1.0&locspec=charrange:1/2/3",
            "http://a/?xuversion=1.0&locspec=charrange:-1/2",
        ] {
            match parse_directive(line) {
                Err(TransquoterError::Format(text)) => assert_eq!(text, line),
                other => panic!("{line}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_area_locator_is_plain() {
        let line = "http://a/doc?xuversion=1.0&locspec=area:1,2";
        assert_eq!(
            parse_directive(line).unwrap(),
            Directive::PlainUrl(line.to_string())
        );
    }

    #[test]
    fn test_data_scheme_is_case_insensitive() {
        assert!(matches!(
            parse_directive("DATA:,x").unwrap(),
            Directive::LiteralData(_)
        ));
    }

    #[test]
    fn test_ignored_lines() {
        assert!(is_ignored_line(""));
        assert!(is_ignored_line("   "));
        assert!(is_ignored_line("# a comment"));
        assert!(!is_ignored_line("http://example.com/"));
    }
}
