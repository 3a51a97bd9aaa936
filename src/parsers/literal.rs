//! Inline `data:` literals
//!
//! Literals never touch the network or the transclusion cache; they render
//! straight to a markup fragment.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;

use crate::builders::link::render_anchor;
use crate::config::RenderConfig;
use crate::core::{TransquoterError, TransquoterResult};

/// A parsed `data:<media type>[;params],<payload>` directive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal {
    /// The directive as written
    pub source: String,
    /// Lowercased media type, without parameters; may be empty
    pub media_type: String,
    /// Whether the payload carried the `;base64` parameter
    pub is_base64: bool,
    /// The payload, still escaped
    pub payload: String,
}

/// Splits a `data:` directive at its first comma
pub fn parse_literal(line: &str) -> TransquoterResult<Literal> {
    let body = line
        .get(5..)
        .ok_or_else(|| TransquoterError::Format(line.to_string()))?;
    let (header, payload) = body
        .split_once(',')
        .ok_or_else(|| TransquoterError::Format(line.to_string()))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default().trim().to_lowercase();
    let is_base64 = params.any(|param| param.trim().eq_ignore_ascii_case("base64"));

    Ok(Literal {
        source: line.to_string(),
        media_type,
        is_base64,
        payload: payload.to_string(),
    })
}

/// Decodes `%XX` escapes, then base64 when flagged
pub fn decode_payload(literal: &Literal) -> TransquoterResult<String> {
    let unescaped = percent_decode_str(&literal.payload).decode_utf8_lossy();

    if literal.is_base64 {
        let bytes = STANDARD
            .decode(unescaped.trim())
            .map_err(|_| TransquoterError::Format(literal.source.clone()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Ok(unescaped.into_owned())
    }
}

/// Renders a literal: HTML verbatim, plain text preformatted, anything else
/// as an error-class link showing the unrecognized media type.
pub fn render_literal(literal: &Literal, config: &RenderConfig) -> TransquoterResult<String> {
    match literal.media_type.as_str() {
        "text/html" => decode_payload(literal),
        "" | "text/plain" => Ok(format!("<pre>{}</pre>", decode_payload(literal)?)),
        media_type => {
            tracing::warn!("Unsupported literal type {}", media_type);
            Ok(render_anchor(
                &literal.source,
                Some(&config.error_class),
                None,
                &html_escape::encode_text(media_type),
                config,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(line: &str) -> String {
        let literal = parse_literal(line).unwrap();
        render_literal(&literal, &RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_plain_text_is_preformatted() {
        assert_eq!(render("data:text/plain,Hello%20World"), "<pre>Hello World</pre>");
    }

    #[test]
    fn test_untyped_is_plain_text() {
        assert_eq!(render("data:,raw"), "<pre>raw</pre>");
    }

    #[test]
    fn test_html_is_verbatim() {
        assert_eq!(render("data:text/html,%3Cbr%3E"), "<br>");
        assert_eq!(render("data:TEXT/HTML,<p>"), "<p>");
    }

    #[test]
    fn test_media_type_parameters() {
        assert_eq!(render("data:text/plain;charset=utf-8,x"), "<pre>x</pre>");
        assert_eq!(render("data:text/html;base64,PGhyPg=="), "<hr>");
    }

    #[test]
    fn test_unknown_type_renders_error_anchor() {
        assert_eq!(
            render("data:image/png,xx"),
            "<a\nhref=\"data:image/png,xx\" class=\"error\" target=\"context\" rev=\"original context\">image/png</a>"
        );
    }

    #[test]
    fn test_payload_keeps_later_commas() {
        assert_eq!(render("data:,a,b"), "<pre>a,b</pre>");
    }

    #[test]
    fn test_missing_comma_is_format_error() {
        assert!(matches!(
            parse_literal("data:text/plain"),
            Err(TransquoterError::Format(_))
        ));
    }

    #[test]
    fn test_bad_base64_is_format_error() {
        let literal = parse_literal("data:;base64,!!!").unwrap();
        assert!(matches!(
            decode_payload(&literal),
            Err(TransquoterError::Format(_))
        ));
    }
}
