// Shared integration test helpers
//
// A scripted transport that serves canned pages and records every request

use std::collections::HashMap;

use transquoter::config::RenderConfig;
use transquoter::core::{
    render_stream_list, split_stream_list, TransquoterError, TransquoterResult,
};
use transquoter::network::{RawResource, Transport};

/// Serves canned responses keyed by the exact requested URL
#[derive(Default)]
pub struct ScriptedTransport {
    pages: HashMap<String, (String, Vec<u8>)>,
    requests: Vec<String>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, content_type: &str, body: &[u8]) -> Self {
        self.pages
            .insert(url.to_string(), (content_type.to_string(), body.to_vec()));
        self
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.len()
    }
}

impl Transport for ScriptedTransport {
    fn retrieve(&mut self, url: &str) -> TransquoterResult<RawResource> {
        self.requests.push(url.to_string());

        match self.pages.get(url) {
            Some((content_type, body)) => Ok(RawResource::new(Some(content_type), body.clone())),
            None => Err(TransquoterError::Fetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

/// Renders `list` against `transport` with the default configuration
pub fn render(list: &str, transport: &mut ScriptedTransport) -> String {
    render_stream_list(split_stream_list(list), transport, &RenderConfig::default())
}

/// A context link as rendered with the default configuration
pub fn anchor(href: &str, attributes: &str, inner: &str) -> String {
    format!("<a\nhref=\"{href}\"{attributes} target=\"context\" rev=\"original context\">{inner}</a>")
}
