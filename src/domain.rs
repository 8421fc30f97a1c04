//! `ts:type` role resolution for prose references to documented types.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::model::SourceLocation;
use crate::registry::{SymbolKind, SymbolRegistry};
use crate::render::html::escape_html;
use crate::render::RenderOptions;
use crate::uri;

/// Role name reported for references resolved through [`TypeDomain`].
pub const TYPE_ROLE: &str = "ts:type";

/// A resolved reference: relative link plus hover title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub href: String,
    pub title: String,
}

impl Reference {
    /// Anchor element around already-escaped `content`.
    pub fn to_html(&self, content: &str) -> String {
        format!(
            "<a class=\"reference internal\" href=\"{}\" title=\"{}\">{}</a>",
            escape_html(&self.href),
            escape_html(&self.title),
            content
        )
    }
}

pub struct TypeDomain<'a> {
    symbols: &'a SymbolRegistry,
    diagnostics: &'a dyn DiagnosticSink,
    options: &'a RenderOptions,
}

impl<'a> TypeDomain<'a> {
    pub fn new(
        symbols: &'a SymbolRegistry,
        diagnostics: &'a dyn DiagnosticSink,
        options: &'a RenderOptions,
    ) -> Self {
        TypeDomain {
            symbols,
            diagnostics,
            options,
        }
    }

    /// Resolve an explicit `ts:type` reference. A miss is a dangling
    /// reference and is reported at `location`.
    pub fn resolve_type_ref(&self, location: &SourceLocation, target: &str) -> Option<Reference> {
        let reference = self.lookup(&location.page, target);
        if reference.is_none() {
            tracing::debug!(page = %location.page, target, "type not found");
            self.diagnostics.emit(Diagnostic {
                page: location.page.clone(),
                line: location.line,
                kind: DiagnosticKind::DanglingTypeRef {
                    target: target.to_string(),
                },
            });
        }
        reference
    }

    /// Resolve a reference whose role is unknown. Returns every role that
    /// could have produced it; empty on a miss, without a warning.
    pub fn resolve_any_ref(&self, from_page: &str, target: &str) -> Vec<(&'static str, Reference)> {
        self.lookup(from_page, target)
            .map(|reference| (TYPE_ROLE, reference))
            .into_iter()
            .collect()
    }

    fn lookup(&self, from_page: &str, target: &str) -> Option<Reference> {
        let found = self.symbols.lookup(SymbolKind::Type, target)?;
        Some(Reference {
            href: uri::target_link(from_page, &found, &self.options.link_suffix),
            title: format!("{} {}", SymbolKind::Type.as_str().to_uppercase(), target),
        })
    }
}
