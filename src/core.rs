use thiserror::Error;

use crate::builders::link::{render_error_fragment, render_transclusion};
use crate::config::RenderConfig;
use crate::network::session::Transport;
use crate::parsers::literal::render_literal;
use crate::parsers::locator::{is_ignored_line, parse_directive, Directive};
use crate::transclusion::ResolutionContext;

/// Errors that can occur while resolving a directive or setting up a run
#[derive(Error, Debug)]
pub enum TransquoterError {
    /// The transport could not retrieve the resource
    #[error("failed to retrieve {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The document's charset names no known encoding
    #[error("Unable to decode charset {charset}")]
    Decode { charset: String },

    /// A malformed locator or literal; carries the directive line
    #[error("invalid directive {0}")]
    Format(String),

    /// A non-text, non-image media type
    #[error("unsupported media type {0}")]
    UnsupportedMediaType(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TransquoterError {
    /// Text shown inside the error-class link rendered for this error
    pub fn display_text(&self) -> String {
        match self {
            TransquoterError::Fetch { url, .. } => url.clone(),
            TransquoterError::Decode { .. } => self.to_string(),
            TransquoterError::Format(line) => line.clone(),
            TransquoterError::UnsupportedMediaType(media_type) => media_type.clone(),
            TransquoterError::Config(message) => message.clone(),
            TransquoterError::Io(error) => error.to_string(),
        }
    }
}

pub type TransquoterResult<T> = Result<T, TransquoterError>;

/// Home page shown when no stream list is given
pub const TRANSQUOTER_HOME: &str = "http://www.xanadu.com.au/transquoter/";

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Parses a Content-Type value into its lowercased media type and charset
pub fn parse_content_type(content_type: &str) -> (String, String) {
    let mut parts = content_type.split(';');
    let media_type = parts.next().unwrap_or_default().trim().to_lowercase();
    let mut charset = String::new();

    for part in parts {
        let part = part.trim();
        if let Some(value) = part
            .get(..8)
            .filter(|key| key.eq_ignore_ascii_case("charset="))
            .map(|_| &part[8..])
        {
            charset = value.trim_matches('"').to_string();
        }
    }

    (media_type, charset)
}

/// Determines the media type of a local file from its extension
pub fn detect_media_type_by_file_name(filename: &str) -> String {
    let filename_lowercased = filename.to_lowercase();

    if filename_lowercased.ends_with(".html") || filename_lowercased.ends_with(".htm") {
        "text/html".to_string()
    } else if filename_lowercased.ends_with(".xml") || filename_lowercased.ends_with(".xhtml") {
        "text/xml".to_string()
    } else if filename_lowercased.ends_with(".sgml") || filename_lowercased.ends_with(".sgm") {
        "text/sgml".to_string()
    } else if filename_lowercased.ends_with(".css") {
        "text/css".to_string()
    } else if filename_lowercased.ends_with(".csv") {
        "text/csv".to_string()
    } else if filename_lowercased.ends_with(".png") {
        "image/png".to_string()
    } else if filename_lowercased.ends_with(".jpg") || filename_lowercased.ends_with(".jpeg") {
        "image/jpeg".to_string()
    } else if filename_lowercased.ends_with(".gif") {
        "image/gif".to_string()
    } else if filename_lowercased.ends_with(".svg") {
        "image/svg+xml".to_string()
    } else if filename_lowercased.ends_with(".webp") {
        "image/webp".to_string()
    } else if filename_lowercased.ends_with(".pdf") {
        "application/pdf".to_string()
    } else if filename_lowercased.ends_with(".zip") {
        "application/zip".to_string()
    } else if filename_lowercased.ends_with(".mp3") {
        "audio/mpeg".to_string()
    } else if filename_lowercased.ends_with(".mp4") {
        "video/mp4".to_string()
    } else {
        // Unknown local files are read as plain text
        "text/plain".to_string()
    }
}

/// Renders one directive line into a markup fragment.
///
/// Returns `None` for blank and comment lines. Every error is turned into an
/// error-class fragment here, so a bad directive never ends the pass.
pub fn render_directive<T: Transport + ?Sized>(
    line: &str,
    context: &mut ResolutionContext,
    transport: &mut T,
    config: &RenderConfig,
) -> Option<String> {
    if is_ignored_line(line) {
        return None;
    }
    let line = line.trim();

    let fragment = match parse_directive(line) {
        Ok(Directive::LiteralData(literal)) => render_literal(&literal, config),
        Ok(directive) => Ok(transclude(&directive, context, transport, config)),
        Err(error) => Err(error),
    };

    Some(fragment.unwrap_or_else(|error| {
        tracing::warn!("Invalid directive {}: {}", line, error);
        render_error_fragment(line, &error, config)
    }))
}

/// Resolves a URL directive through the context and wraps the result in a
/// context link
pub fn transclude<T: Transport + ?Sized>(
    directive: &Directive,
    context: &mut ResolutionContext,
    transport: &mut T,
    config: &RenderConfig,
) -> String {
    let (Some(base), Some(request)) = (directive.base_url(), directive.request_url()) else {
        return String::new();
    };

    let (document, _) = context.resolve_base(transport, config, base, request, directive.range());
    let color = context.color_of(base).unwrap_or_default();

    render_transclusion(directive, &document, color, context.title_of(base), config)
}

/// Splits a stream list into lines, accepting `\n`, `\r\n` and lone `\r`
/// terminators alike
pub fn split_stream_list(text: &str) -> impl Iterator<Item = &str> {
    text.lines().flat_map(|line| line.split('\r'))
}

/// Renders a whole virtual stream list in one pass.
///
/// The resolution context lives exactly as long as this call; nothing is
/// shared between passes.
pub fn render_stream_list<T, I, S>(lines: I, transport: &mut T, config: &RenderConfig) -> String
where
    T: Transport + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut context = ResolutionContext::new(config);
    let mut output = String::new();

    for line in lines {
        if let Some(fragment) = render_directive(line.as_ref(), &mut context, transport, config) {
            output.push_str(&fragment);
        }
    }

    output
}

/// Prints an error message to stderr, in red when stderr is a terminal
pub fn print_error_message(msg: &str) {
    use crate::env::{core::NoColor, EnvVar};

    if atty::is(atty::Stream::Stderr) && !NoColor::get_or_default(false) {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
