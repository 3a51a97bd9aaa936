use crate::config::RenderConfig;
use crate::core::{parse_content_type, TransquoterError, TransquoterResult};
use crate::network::session::{is_text_media_type, Transport};
use crate::parsers::charset::{decode_body, decode_with, find_charset, resolve_encoding};
use crate::parsers::entities::{decode_named_entities, decode_numeric_entities};
use crate::parsers::sanitizer::{extract_title, normalize_whitespace, strip_markup};

/// Resolved content of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Decoded, sanitized text; escaped only when rendered
    Text(String),
    /// A ready markup fragment embedding an image
    Image(String),
}

impl Content {
    /// Length in characters, the unit of charrange locators
    pub fn char_len(&self) -> usize {
        match self {
            Content::Text(text) | Content::Image(text) => text.chars().count(),
        }
    }
}

/// A successfully fetched resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub content: Content,
    pub title: String,
}

/// Retrieves `url` and turns it into displayable content.
///
/// Markup types are charset-decoded, stripped and entity-decoded; every
/// text type is whitespace-normalized. Images become an `<img>` fragment.
/// Anything else is an [`TransquoterError::UnsupportedMediaType`].
pub fn fetch<T: Transport + ?Sized>(
    transport: &mut T,
    url: &str,
    config: &RenderConfig,
) -> TransquoterResult<Fetched> {
    tracing::info!("Resolving {}", url);

    let resource = transport.retrieve(url)?;
    let media_type = resource.media_type.as_str();

    if is_text_media_type(media_type) {
        let body = resource.body.as_deref().unwrap_or_default();

        let (text, title) = if config.is_markup_media_type(media_type) {
            sanitize_markup(body, resource.content_type.as_deref(), config)?
        } else {
            (decode_plain_text(body, resource.content_type.as_deref(), config)?, String::new())
        };

        Ok(Fetched {
            content: Content::Text(normalize_whitespace(&text)),
            title,
        })
    } else if media_type.starts_with("image/") {
        Ok(Fetched {
            content: Content::Image(format!(
                "<img src=\"{}\">",
                html_escape::encode_double_quoted_attribute(url)
            )),
            title: String::new(),
        })
    } else {
        Err(TransquoterError::UnsupportedMediaType(media_type.to_string()))
    }
}

/// Decodes a markup body and reduces it to its visible text and title
fn sanitize_markup(
    body: &[u8],
    content_type: Option<&str>,
    config: &RenderConfig,
) -> TransquoterResult<(String, String)> {
    let charset = find_charset(body, content_type);
    let encoding = resolve_encoding(charset.as_deref(), &config.default_charset)?;
    let decoded = decode_with(body, encoding);

    // Numeric references may hide markup, so they go before stripping.
    // Low references are bytes of the document's own charset.
    let decoded = decode_numeric_entities(&decoded, encoding);

    let title = normalize_whitespace(&decode_named_entities(extract_title(&decoded)));
    let text = decode_named_entities(&strip_markup(&decoded)).into_owned();

    Ok((text, title))
}

/// Plain text honors a charset parameter on the transport's Content-Type
fn decode_plain_text(
    body: &[u8],
    content_type: Option<&str>,
    config: &RenderConfig,
) -> TransquoterResult<String> {
    let charset = content_type
        .map(parse_content_type)
        .map(|(_, charset)| charset)
        .filter(|charset| !charset.is_empty());

    decode_body(body, charset.as_deref(), &config.default_charset)
}
