//! Renderers and format dispatch.

pub mod html;
pub mod json;

use crate::diagnostics::DiagnosticSink;
use crate::labels::LabelIndex;
use crate::model::SourceLocation;
use crate::registry::SymbolRegistry;
use anyhow::{anyhow, Result};

/// Output settings shared by all samples of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Appended to page identifiers to form link paths.
    pub link_suffix: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            link_suffix: ".html".to_string(),
        }
    }
}

/// Everything a renderer reads besides the sample itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub symbols: &'a SymbolRegistry,
    pub labels: &'a dyn LabelIndex,
    pub diagnostics: &'a dyn DiagnosticSink,
    pub options: &'a RenderOptions,
}

/// Renders one code sample in a specific output format.
pub trait Renderer {
    fn render(&self, source: &str, location: &SourceLocation) -> String;
}

/// Create a renderer for the given format name.
pub fn create_renderer<'a>(format: &str, ctx: RenderContext<'a>) -> Result<Box<dyn Renderer + 'a>> {
    match format {
        "html" => Ok(Box::new(html::HtmlFormatter::new(ctx))),
        "tokens" | "json" => Ok(Box::new(json::TokenDump)),
        _ => Err(anyhow!("unknown format: {}. Use html or tokens", format)),
    }
}
