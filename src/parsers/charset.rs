//! Document charset discovery and decoding

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::Regex;

use crate::core::{TransquoterError, TransquoterResult};

const META_CONTENT_TYPE: &str = r#"<meta http-equiv="content-type" content=""#;

static CHARSET_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"charset=([^;]+)").expect("valid charset regex"));

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+charset\s*=\s*["']?([^"'\s/>]+)"#).expect("valid meta charset regex")
});

/// Finds the charset a markup document declares for itself.
///
/// The value of a `<meta http-equiv="content-type" content="...">` tag wins;
/// a document without one may carry an HTML5 `<meta charset="...">`. Only
/// when neither tag is present is the transport's Content-Type consulted.
pub fn find_charset(body: &[u8], content_type_header: Option<&str>) -> Option<String> {
    let lowered = String::from_utf8_lossy(body).to_ascii_lowercase();

    let declaration = match lowered.find(META_CONTENT_TYPE) {
        Some(position) => {
            let value = &lowered[position + META_CONTENT_TYPE.len()..];
            let value = value.split('"').next().unwrap_or_default();
            Some(value.to_string())
        }
        None => {
            if let Some(captures) = META_CHARSET.captures(&lowered) {
                return Some(captures[1].to_string());
            }
            content_type_header.map(|header| header.to_ascii_lowercase())
        }
    };

    charset_from_content_type(&declaration?)
}

/// Extracts the `charset=` parameter of a Content-Type value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    let lowered = content_type.to_ascii_lowercase();
    let captures = CHARSET_PARAM.captures(&lowered)?;
    let charset = captures[1].trim().trim_matches(|c| c == '"' || c == '\'');

    if charset.is_empty() {
        None
    } else {
        Some(charset.to_string())
    }
}

/// Resolves `charset`, or `default_charset` when none was found, to an
/// encoding. Fails when the label names no known encoding.
pub fn resolve_encoding(
    charset: Option<&str>,
    default_charset: &str,
) -> TransquoterResult<&'static Encoding> {
    let label = charset.unwrap_or(default_charset);

    Encoding::for_label(label.as_bytes()).ok_or_else(|| TransquoterError::Decode {
        charset: label.to_string(),
    })
}

/// Decodes `body` with `encoding`, replacing malformed sequences with U+FFFD
pub fn decode_with(body: &[u8], encoding: &'static Encoding) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        tracing::warn!("Malformed {} sequences replaced", encoding.name());
    }

    text.into_owned()
}

/// Decodes `body` as `charset`, or as `default_charset` when none was found
pub fn decode_body(
    body: &[u8],
    charset: Option<&str>,
    default_charset: &str,
) -> TransquoterResult<String> {
    let encoding = resolve_encoding(charset, default_charset)?;
    Ok(decode_with(body, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_charset_from_http_equiv_meta() {
        let body = br#"<HTML><HEAD><META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=ISO-8859-1"></HEAD>"#;
        assert_eq!(
            find_charset(body, Some("text/html; charset=utf-8")),
            Some("iso-8859-1".to_string())
        );
    }

    #[test]
    fn test_find_charset_meta_without_charset_ignores_header() {
        let body = br#"<meta http-equiv="content-type" content="text/html">"#;
        assert_eq!(find_charset(body, Some("text/html; charset=utf-8")), None);
    }

    #[test]
    fn test_find_charset_from_html5_meta() {
        let body = br#"<head><meta charset="UTF-8"></head>"#;
        assert_eq!(find_charset(body, None), Some("utf-8".to_string()));
    }

    #[test]
    fn test_find_charset_falls_back_to_header() {
        assert_eq!(
            find_charset(b"<p>no meta</p>", Some("text/html; charset=Shift_JIS")),
            Some("shift_jis".to_string())
        );
    }

    #[test]
    fn test_find_charset_none() {
        assert_eq!(find_charset(b"<p>x</p>", Some("text/html")), None);
        assert_eq!(find_charset(b"<p>x</p>", None), None);
    }

    #[test]
    fn test_charset_from_content_type_strips_quotes() {
        assert_eq!(
            charset_from_content_type("text/html; charset=\"utf-8\"; foo=bar"),
            Some("utf-8".to_string())
        );
    }

    #[test]
    fn test_decode_body_default_charset() {
        // 0x93/0x94 are curly quotes in windows-1252
        let decoded = decode_body(b"\x93hi\x94", None, "windows-1252").unwrap();
        assert_eq!(decoded, "\u{201c}hi\u{201d}");
    }

    #[test]
    fn test_decode_body_declared_charset() {
        let decoded = decode_body("caf\u{e9}".as_bytes(), Some("utf-8"), "windows-1252").unwrap();
        assert_eq!(decoded, "caf\u{e9}");
    }

    #[test]
    fn test_resolve_encoding_aliases() {
        assert_eq!(resolve_encoding(None, "windows-1252").unwrap(), encoding_rs::WINDOWS_1252);
        assert_eq!(resolve_encoding(Some("latin1"), "utf-8").unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_decode_body_unknown_charset() {
        match decode_body(b"x", Some("klingon"), "windows-1252") {
            Err(TransquoterError::Decode { charset }) => assert_eq!(charset, "klingon"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
