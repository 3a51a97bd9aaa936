use std::fs;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::RenderConfig;
use crate::core::{
    detect_media_type_by_file_name, parse_content_type, TransquoterError, TransquoterResult,
};

/// Media type assumed when the origin sends no Content-Type
const FALLBACK_MEDIA_TYPE: &str = "text/plain";

/// A retrieved resource, classified by media type.
///
/// Only `text/*` bodies are read; other types travel by tag alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResource {
    /// Lowercased media type without parameters
    pub media_type: String,
    /// The raw Content-Type value, when the transport had one
    pub content_type: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl RawResource {
    /// Builds a resource from a Content-Type value, keeping the body only
    /// for text media types
    pub fn new(content_type: Option<&str>, body: Vec<u8>) -> Self {
        let media_type = media_type_of(content_type);
        let body = is_text_media_type(&media_type).then_some(body);

        RawResource {
            media_type,
            content_type: content_type.map(str::to_string),
            body,
        }
    }
}

/// Anything able to retrieve a URL. One blocking call per retrieval.
pub trait Transport {
    fn retrieve(&mut self, url: &str) -> TransquoterResult<RawResource>;
}

pub fn is_text_media_type(media_type: &str) -> bool {
    media_type.starts_with("text/")
}

fn media_type_of(content_type: Option<&str>) -> String {
    match content_type.map(parse_content_type) {
        Some((media_type, _)) if !media_type.is_empty() => media_type,
        _ => FALLBACK_MEDIA_TYPE.to_string(),
    }
}

fn fetch_error(url: &str, reason: impl ToString) -> TransquoterError {
    TransquoterError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Blocking HTTP(S) and local file transport
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new(config: &RenderConfig) -> TransquoterResult<Self> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        let user_agent = config.user_agent.clone().unwrap_or_else(|| {
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        });

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransquoterError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Session { client })
    }

    fn retrieve_http(&self, url: &str) -> TransquoterResult<RawResource> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| fetch_error(url, e))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if !is_text_media_type(&media_type_of(content_type.as_deref())) {
            return Ok(RawResource::new(content_type.as_deref(), Vec::new()));
        }

        let body = response.bytes().map_err(|e| fetch_error(url, e))?;
        Ok(RawResource::new(content_type.as_deref(), body.to_vec()))
    }

    fn retrieve_file(&self, url: &Url) -> TransquoterResult<RawResource> {
        let path = url
            .to_file_path()
            .map_err(|_| fetch_error(url.as_str(), "not a local file path"))?;
        let media_type = detect_media_type_by_file_name(&path.to_string_lossy());

        let body = if is_text_media_type(&media_type) {
            fs::read(&path).map_err(|e| fetch_error(url.as_str(), e))?
        } else {
            fs::metadata(&path).map_err(|e| fetch_error(url.as_str(), e))?;
            Vec::new()
        };

        Ok(RawResource::new(Some(&media_type), body))
    }
}

impl Transport for Session {
    fn retrieve(&mut self, url: &str) -> TransquoterResult<RawResource> {
        let parsed = Url::parse(url).map_err(|e| fetch_error(url, e))?;

        match parsed.scheme() {
            "http" | "https" => self.retrieve_http(url),
            "file" => self.retrieve_file(&parsed),
            scheme => Err(fetch_error(url, format!("unsupported scheme {scheme}"))),
        }
    }
}
