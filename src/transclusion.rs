//! Transclusion cache and colorer
//!
//! A [`ResolutionContext`] holds everything a render pass learns about its
//! base URLs: resolved documents, titles and assigned color classes. It is
//! created fresh for each pass and dropped at the end of it; nothing here is
//! shared between threads or passes.

use std::collections::HashMap;

use crate::config::RenderConfig;
use crate::network::fetcher::{fetch, Content};
use crate::network::session::Transport;
use crate::parsers::locator::CharRange;

/// Visual identity of a base URL
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorClass {
    /// Index into the configured cyclic palette
    Palette(usize),
    /// Reserved class for documents that failed to resolve
    Error,
    /// The "no class" sentinel; rendered without a class attribute
    #[default]
    Unclassed,
}

/// The outcome of resolving one base URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// Sanitized content, or the error text when `is_error` is set
    pub content: Content,
    pub title: String,
    pub is_error: bool,
}

/// Per-pass cache, title map and color assignment
#[derive(Debug)]
pub struct ResolutionContext {
    documents: HashMap<String, ResolvedDocument>,
    titles: HashMap<String, String>,
    colors: HashMap<String, ColorClass>,
    /// Next palette slot; `None` until the first document has been colored
    /// when that one is to stay unclassed
    cursor: Option<usize>,
    palette_len: usize,
}

impl ResolutionContext {
    pub fn new(config: &RenderConfig) -> Self {
        ResolutionContext {
            documents: HashMap::new(),
            titles: HashMap::new(),
            colors: HashMap::new(),
            cursor: (!config.first_document_unclassed).then_some(0),
            palette_len: config.palette.len().max(1),
        }
    }

    /// Resolves `base`, fetching `request` unless the base is already
    /// cached. Returns the document and whether this call admitted it to the
    /// cache as a full document.
    ///
    /// A ranged fetch is admitted only when it is known to hold the whole
    /// document: the bare base URL was requested, or the result is strictly
    /// longer than the requested window.
    pub fn resolve_base<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        config: &RenderConfig,
        base: &str,
        request: &str,
        range: Option<CharRange>,
    ) -> (ResolvedDocument, bool) {
        if let Some(document) = self.documents.get(base) {
            tracing::debug!("Cache hit for {}", base);
            return (document.clone(), false);
        }

        let document = match fetch(transport, request, config) {
            Ok(fetched) => ResolvedDocument {
                content: fetched.content,
                title: fetched.title,
                is_error: false,
            },
            Err(error) => {
                tracing::warn!("Unable to resolve {}: {}", request, error);
                ResolvedDocument {
                    content: Content::Text(error.display_text()),
                    title: String::new(),
                    is_error: true,
                }
            }
        };

        self.titles.insert(base.to_string(), document.title.clone());
        self.assign_color(base, document.is_error);

        let is_full_document = match range {
            None => true,
            Some(range) => request == base || document.content.char_len() > range.length,
        };

        if is_full_document {
            self.documents.insert(base.to_string(), document.clone());
        }

        (document, is_full_document)
    }

    /// Assigns a class the first time a base URL is seen; later calls keep it
    fn assign_color(&mut self, base: &str, is_error: bool) -> ColorClass {
        if let Some(&color) = self.colors.get(base) {
            return color;
        }

        let color = if is_error {
            ColorClass::Error
        } else {
            match self.cursor {
                None => {
                    self.cursor = Some(0);
                    ColorClass::Unclassed
                }
                Some(slot) => {
                    self.cursor = Some((slot + 1) % self.palette_len);
                    ColorClass::Palette(slot)
                }
            }
        };

        tracing::debug!("Assigned {:?} to {}", color, base);
        self.colors.insert(base.to_string(), color);
        color
    }

    pub fn color_of(&self, base: &str) -> Option<ColorClass> {
        self.colors.get(base).copied()
    }

    /// The title recorded for `base`, if it is non-empty
    pub fn title_of(&self, base: &str) -> Option<&str> {
        self.titles
            .get(base)
            .map(String::as_str)
            .filter(|title| !title.is_empty())
    }

    pub fn is_cached(&self, base: &str) -> bool {
        self.documents.contains_key(base)
    }
}
