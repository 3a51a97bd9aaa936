//! Render configuration
//!
//! Supports a TOML file, environment variable overrides and defaults. The
//! resulting [`RenderConfig`] is immutable for the length of a render pass.

use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::core::{TransquoterError, TransquoterResult};
use crate::transclusion::ColorClass;

/// Charset assumed for markup documents that declare none
pub const DEFAULT_CHARSET: &str = "windows-1252";
/// Media types whose bodies are sanitized as markup
pub const MARKUP_MEDIA_TYPES: &[&str] = &["text/html", "text/sgml", "text/xml"];
/// Class name of the "no class" sentinel
pub const NO_CLASS: &str = "";

/// A cyclic palette entry: CSS class name and its hover background
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteClass {
    pub name: String,
    pub hover: String,
}

impl PaletteClass {
    fn new(name: &str, hover: &str) -> Self {
        Self {
            name: name.to_string(),
            hover: hover.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Classes handed out round-robin to newly seen base URLs
    pub palette: Vec<PaletteClass>,
    /// Class of links whose content could not be resolved
    pub error_class: String,
    pub default_charset: String,
    pub markup_media_types: Vec<String>,
    /// `target` attribute of every context link
    pub context_target: String,
    /// `rev` attribute of every context link
    pub context_rev: String,
    /// The first document gets no class; the palette starts with the second
    pub first_document_unclassed: bool,
    /// Per-fetch timeout in seconds, 0 for none
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                PaletteClass::new("red", "#FF6666"),
                PaletteClass::new("green", "#66FF66"),
                PaletteClass::new("blue", "#6666FF"),
                PaletteClass::new("yellow", "#FFFF66"),
                PaletteClass::new("magenta", "#FF66FF"),
                PaletteClass::new("cyan", "#66FFFF"),
            ],
            error_class: "error".to_string(),
            default_charset: DEFAULT_CHARSET.to_string(),
            markup_media_types: MARKUP_MEDIA_TYPES.iter().map(|t| t.to_string()).collect(),
            context_target: "context".to_string(),
            context_rev: "original context".to_string(),
            first_document_unclassed: true,
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl RenderConfig {
    /// Loads a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> TransquoterResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> TransquoterResult<Self> {
        toml::from_str(text).map_err(|e| TransquoterError::Config(e.to_string()))
    }

    /// Applies overrides from the environment
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{render, EnvVar};

        if let Ok(timeout) = render::Timeout::get() {
            self.timeout_secs = timeout.as_secs();
        }

        if let Ok(user_agent) = render::UserAgent::get() {
            self.user_agent = Some(user_agent);
        }

        if let Ok(charset) = render::DefaultCharset::get() {
            tracing::info!("Default charset overridden by environment: {}", charset);
            self.default_charset = charset;
        }
    }

    pub fn validate(&self) -> TransquoterResult<()> {
        if self.palette.is_empty() {
            return Err(TransquoterError::Config(
                "palette must contain at least one class".to_string(),
            ));
        }

        for class in &self.palette {
            if class.name == NO_CLASS || class.name == self.error_class {
                return Err(TransquoterError::Config(format!(
                    "palette class \"{}\" collides with a reserved class",
                    class.name
                )));
            }
        }

        if Encoding::for_label(self.default_charset.as_bytes()).is_none() {
            return Err(TransquoterError::Config(format!(
                "unknown default charset \"{}\"",
                self.default_charset
            )));
        }

        Ok(())
    }

    /// The full ordered class list: the palette, then the error class,
    /// then the "no class" sentinel
    pub fn classes(&self) -> Vec<&str> {
        self.palette
            .iter()
            .map(|class| class.name.as_str())
            .chain([self.error_class.as_str(), NO_CLASS])
            .collect()
    }

    pub fn class_name(&self, color: ColorClass) -> &str {
        match color {
            ColorClass::Palette(index) => self
                .palette
                .get(index % self.palette.len().max(1))
                .map_or(NO_CLASS, |class| class.name.as_str()),
            ColorClass::Error => &self.error_class,
            ColorClass::Unclassed => NO_CLASS,
        }
    }

    pub fn is_markup_media_type(&self, media_type: &str) -> bool {
        self.markup_media_types.iter().any(|t| t == media_type)
    }
}
