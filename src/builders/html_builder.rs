//! HTML page builder
//!
//! Wraps the rendered fragments of a stream list in a standalone page whose
//! stylesheet carries one hover rule per palette class.

use html_escape::encode_text;

use crate::config::RenderConfig;

const DOCTYPE: &str = "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Transitional//EN\">";

pub struct HtmlBuilder<'a> {
    config: &'a RenderConfig,
}

impl<'a> HtmlBuilder<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Builds the page stylesheet
    pub fn build_stylesheet(&self) -> String {
        let mut css = String::from(
            "@media screen {body {background: white; color: black; margin: 20px;}}\n\
             :link, :visited {color: black; text-decoration: none;}\n",
        );

        css.push_str(&format!("a.{} {{color: red;}}\n", self.config.error_class));

        for class in &self.config.palette {
            css.push_str(&format!(
                "a.{}:hover {{background: {};}}\n",
                class.name, class.hover
            ));
        }

        css
    }

    /// Builds the complete page around an already rendered `body`
    pub fn build_document(&self, title: &str, body: &str) -> String {
        format!(
            "{doctype}\n\
             <html>\n\
             <head>\n\
             <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\">\n\
             <title>{title}</title>\n\
             <style type=\"text/css\">\n\
             {css}\
             </style>\n\
             </head>\n\
             <body>\n\
             <p>\n\
             {body}</p>\n\
             </body>\n\
             </html>\n",
            doctype = DOCTYPE,
            title = encode_text(title),
            css = self.build_stylesheet(),
            body = body,
        )
    }
}

/// Builds a page with the given configuration
pub fn build_document(title: &str, body: &str, config: &RenderConfig) -> String {
    HtmlBuilder::new(config).build_document(title, body)
}
