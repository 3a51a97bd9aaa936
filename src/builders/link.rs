//! Context link rendering

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::RenderConfig;
use crate::core::TransquoterError;
use crate::network::fetcher::Content;
use crate::parsers::locator::{CharRange, Directive, AREA_LOCATOR, CHARRANGE_LOCATOR};
use crate::transclusion::{ColorClass, ResolvedDocument};

/// Marker appended to links whose request carried a charrange locator
const CONTEXT_MODE: &str = "&mode=context";
/// Marker appended to links whose request carried an area locator
const HUMAN_MODE: &str = "&mode=human";

/// Composes a context link. `inner` must already be valid markup; `href`,
/// `class` and `title` are attribute-escaped here. Empty classes and titles
/// are omitted.
pub fn render_anchor(
    href: &str,
    class: Option<&str>,
    title: Option<&str>,
    inner: &str,
    config: &RenderConfig,
) -> String {
    let mut anchor = format!("<a\nhref=\"{}\"", encode_double_quoted_attribute(href));

    if let Some(class) = class.filter(|class| !class.is_empty()) {
        anchor.push_str(&format!(" class=\"{}\"", encode_double_quoted_attribute(class)));
    }

    if let Some(title) = title.filter(|title| !title.is_empty()) {
        anchor.push_str(&format!(" title=\"{}\"", encode_double_quoted_attribute(title)));
    }

    anchor.push_str(&format!(
        " target=\"{}\" rev=\"{}\">{}</a>",
        encode_double_quoted_attribute(&config.context_target),
        encode_double_quoted_attribute(&config.context_rev),
        inner
    ));

    anchor
}

/// Cuts `[start, start + length)` characters out of `text`, but only when
/// the text is longer than the window; shorter text is already the slice.
pub fn slice_window(text: &str, range: CharRange) -> &str {
    if text.chars().count() <= range.length {
        return text;
    }

    let byte_offset = |chars: usize| {
        text.char_indices()
            .nth(chars)
            .map_or(text.len(), |(offset, _)| offset)
    };

    let start = byte_offset(range.start);
    let end = byte_offset(range.start.saturating_add(range.length));
    &text[start..end]
}

/// Wraps a resolved document in its context link
pub fn render_transclusion(
    directive: &Directive,
    document: &ResolvedDocument,
    color: ColorClass,
    title: Option<&str>,
    config: &RenderConfig,
) -> String {
    let request = directive.request_url().unwrap_or_default();
    let mut href = request.to_string();

    let (color, inner) = if document.is_error {
        let text = match &document.content {
            Content::Text(text) | Content::Image(text) => text,
        };
        (ColorClass::Error, encode_text(text).into_owned())
    } else {
        let inner = match &document.content {
            Content::Text(text) => {
                let shown = match directive.range() {
                    Some(range) => slice_window(text, range),
                    None => text,
                };
                encode_text(shown).into_owned()
            }
            // Images are never sliced
            Content::Image(markup) => markup.clone(),
        };

        if directive.range().is_some() && request.contains(CHARRANGE_LOCATOR) {
            href.push_str(CONTEXT_MODE);
        } else if request.contains(AREA_LOCATOR) {
            href.push_str(HUMAN_MODE);
        }

        (color, inner)
    };

    render_anchor(&href, Some(config.class_name(color)), title, &inner, config)
}

/// Renders a directive that failed before resolution, showing the error's
/// display text in an error-class link to the directive itself
pub fn render_error_fragment(line: &str, error: &TransquoterError, config: &RenderConfig) -> String {
    render_anchor(
        line,
        Some(&config.error_class),
        None,
        &encode_text(&error.display_text()),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parsers::locator::parse_directive;

    fn document(content: Content, is_error: bool) -> ResolvedDocument {
        ResolvedDocument {
            content,
            title: String::new(),
            is_error,
        }
    }

    #[test]
    fn test_anchor_attributes() {
        let config = RenderConfig::default();
        assert_eq!(
            render_anchor("http://a/?x=1&y=2", Some("red"), Some("A \"quoted\" title"), "body", &config),
            "<a\nhref=\"http://a/?x=1&amp;y=2\" class=\"red\" title=\"A &quot;quoted&quot; title\" \
             target=\"context\" rev=\"original context\">body</a>"
        );
    }

    #[test]
    fn test_anchor_omits_empty_class_and_title() {
        let config = RenderConfig::default();
        assert_eq!(
            render_anchor("http://a/", Some(""), Some(""), "body", &config),
            "<a\nhref=\"http://a/\" target=\"context\" rev=\"original context\">body</a>"
        );
    }

    #[test]
    fn test_slice_window() {
        let range = CharRange { start: 2, length: 3 };
        assert_eq!(slice_window("abcdefg", range), "cde");
        assert_eq!(slice_window("abc", range), "abc");
        assert_eq!(slice_window("abcd", CharRange { start: 3, length: 3 }), "d");
        assert_eq!(slice_window("abcd", CharRange { start: 9, length: 1 }), "");
        assert_eq!(slice_window("\u{e9}t\u{e9} long", range), "\u{e9} l");
    }

    #[test]
    fn test_ranged_transclusion_marks_context_mode() {
        let config = RenderConfig::default();
        let directive =
            parse_directive("http://a/doc?xuversion=1.0&locspec=charrange:4/5").unwrap();
        let fragment = render_transclusion(
            &directive,
            &document(Content::Text("The quick brown fox".to_string()), false),
            ColorClass::Palette(1),
            Some("Foxes"),
            &config,
        );
        assert_eq!(
            fragment,
            "<a\nhref=\"http://a/doc?xuversion=1.0&amp;locspec=charrange:4/5&amp;mode=context\" \
             class=\"green\" title=\"Foxes\" target=\"context\" rev=\"original context\">quick</a>"
        );
    }

    #[test]
    fn test_locally_sliced_transclusion_has_no_mode() {
        let config = RenderConfig::default();
        let directive =
            parse_directive("file:///tmp/doc.txt?xuversion=1.0&locspec=charrange:0/3").unwrap();
        let fragment = render_transclusion(
            &directive,
            &document(Content::Text("abcdef".to_string()), false),
            ColorClass::Unclassed,
            None,
            &config,
        );
        assert_eq!(
            fragment,
            "<a\nhref=\"file:///tmp/doc.txt\" target=\"context\" rev=\"original context\">abc</a>"
        );
    }

    #[test]
    fn test_area_locator_marks_human_mode() {
        let config = RenderConfig::default();
        let directive = parse_directive("http://a/doc?xuversion=1.0&locspec=area:1,1").unwrap();
        let fragment = render_transclusion(
            &directive,
            &document(Content::Text("x".to_string()), false),
            ColorClass::Palette(0),
            None,
            &config,
        );
        assert!(fragment.contains("area:1,1&amp;mode=human\""));
    }

    #[test]
    fn test_error_document_uses_error_class() {
        let config = RenderConfig::default();
        let directive = parse_directive("http://down/").unwrap();
        let fragment = render_transclusion(
            &directive,
            &document(Content::Text("http://down/".to_string()), true),
            ColorClass::Palette(3),
            None,
            &config,
        );
        assert_eq!(
            fragment,
            "<a\nhref=\"http://down/\" class=\"error\" target=\"context\" rev=\"original context\">http://down/</a>"
        );
    }

    #[test]
    fn test_text_is_escaped_after_slicing() {
        let config = RenderConfig::default();
        let directive = parse_directive("http://a/doc").unwrap();
        let fragment = render_transclusion(
            &directive,
            &document(Content::Text("a < b & c".to_string()), false),
            ColorClass::Unclassed,
            None,
            &config,
        );
        assert!(fragment.ends_with(">a &lt; b &amp; c</a>"));
    }

    #[test]
    fn test_image_is_not_escaped() {
        let config = RenderConfig::default();
        let directive = parse_directive("http://a/pic.png").unwrap();
        let fragment = render_transclusion(
            &directive,
            &document(Content::Image("<img src=\"http://a/pic.png\">".to_string()), false),
            ColorClass::Unclassed,
            None,
            &config,
        );
        assert!(fragment.ends_with("><img src=\"http://a/pic.png\"></a>"));
    }

    #[test]
    fn test_error_fragment_for_format_error() {
        let config = RenderConfig::default();
        let line = "http://a/?xuversion=1.0&locspec=charrange:x/y";
        let error = TransquoterError::Format(line.to_string());
        assert_eq!(
            render_error_fragment(line, &error, &config),
            "<a\nhref=\"http://a/?xuversion=1.0&amp;locspec=charrange:x/y\" class=\"error\" \
             target=\"context\" rev=\"original context\">http://a/?xuversion=1.0&amp;locspec=charrange:x/y</a>"
        );
    }
}
