//! HTML renderer: escaped, highlighted, cross-linked code lines.
//!
//! Produces one unit per source line and no container markup; the caller
//! decides how lines are wrapped into a block.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::filter;
use crate::lexer;
use crate::model::{AnnotatedToken, SourceLocation};
use crate::registry::{SymbolKind, Target};
use crate::render::{RenderContext, Renderer};
use crate::uri;

/// Type names that are never link targets.
const BUILTIN_TYPES: &[&str] = &[
    "number",
    "object",
    "string",
    "boolean",
    "any",
    "true",
    "false",
    "null",
    "undefined",
    "Array",
    "unknown",
];

const LINK_STYLE: &str = "color:inherit;text-decoration:underline";
const LITERAL_STYLE: &str = "font-weight: bolder";

/// How the text of one token is presented, decided once per token.
enum Presentation {
    Plain,
    Literal,
    Link { href: String },
}

pub struct HtmlFormatter<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> HtmlFormatter<'a> {
    pub fn new(ctx: RenderContext<'a>) -> Self {
        HtmlFormatter { ctx }
    }

    /// Render annotated tokens; every line of the result ends with `\n`.
    pub fn render_tokens<'t, I>(&self, tokens: I, location: &SourceLocation) -> String
    where
        I: IntoIterator<Item = AnnotatedToken<'t>>,
    {
        self.render_lines(tokens, location).concat()
    }

    /// Render annotated tokens into one string per source line.
    pub fn render_lines<'t, I>(&self, tokens: I, location: &SourceLocation) -> Vec<String>
    where
        I: IntoIterator<Item = AnnotatedToken<'t>>,
    {
        let mut lines = Vec::new();
        let mut line = String::new();
        let mut line_offset = 0;

        for token in tokens {
            let presentation = self.present(&token, location, location.line + line_offset);
            // A caption stands in for the whole token, so it only fits a
            // token on a single line.
            let caption = if token.text.contains('\n') {
                None
            } else {
                token.annotation.caption.map(escape_html)
            };
            let escaped = escape_html(token.text);
            let mut parts = escaped.split('\n');

            if let Some(first) = parts.next() {
                line.push_str(&format_part(first, &token, &presentation, caption.as_deref()));
            }
            for part in parts {
                line.push('\n');
                lines.push(std::mem::take(&mut line));
                line_offset += 1;
                line.push_str(&format_part(part, &token, &presentation, caption.as_deref()));
            }
        }

        if !line.is_empty() {
            line.push('\n');
            lines.push(line);
        }
        lines
    }

    fn present(&self, token: &AnnotatedToken<'_>, location: &SourceLocation, line: usize) -> Presentation {
        let ann = &token.annotation;

        if ann.is_literal {
            return Presentation::Literal;
        }
        if ann.is_identifier && ann.xref.is_some_and(is_never_linked) {
            return Presentation::Plain;
        }
        if ann.trailing_underscore {
            self.warn(
                location,
                line,
                DiagnosticKind::TrailingUnderscore {
                    target: ann.xref.unwrap_or(token.text).to_string(),
                },
            );
        }
        let Some(xref) = ann.xref else {
            return Presentation::Plain;
        };

        match self.resolve(xref) {
            Some(target) => Presentation::Link {
                href: escape_html(&uri::target_link(
                    &location.page,
                    &target,
                    &self.ctx.options.link_suffix,
                )),
            },
            None => {
                self.warn(
                    location,
                    line,
                    DiagnosticKind::UnresolvedXref {
                        target: xref.to_string(),
                    },
                );
                Presentation::Plain
            }
        }
    }

    /// Symbol registry first, then named labels, then anonymous labels.
    fn resolve(&self, xref: &str) -> Option<Target> {
        self.ctx.symbols.lookup(SymbolKind::Type, xref).or_else(|| {
            let folded = xref.to_lowercase();
            self.ctx
                .labels
                .label(&folded)
                .or_else(|| self.ctx.labels.anon_label(&folded))
        })
    }

    fn warn(&self, location: &SourceLocation, line: usize, kind: DiagnosticKind) {
        self.ctx.diagnostics.emit(Diagnostic {
            page: location.page.clone(),
            line,
            kind,
        });
    }
}

impl Renderer for HtmlFormatter<'_> {
    fn render(&self, source: &str, location: &SourceLocation) -> String {
        self.render_tokens(filter::filter(lexer::tokenize(source)), location)
    }
}

fn is_never_linked(xref: &str) -> bool {
    xref.starts_with('"')
        || (!xref.is_empty() && xref.bytes().all(|b| b.is_ascii_digit()))
        || BUILTIN_TYPES.contains(&xref)
}

fn format_part(
    part: &str,
    token: &AnnotatedToken<'_>,
    presentation: &Presentation,
    caption: Option<&str>,
) -> String {
    if part.is_empty() {
        return String::new();
    }
    let inner = match presentation {
        Presentation::Plain => part.to_string(),
        Presentation::Literal => format!("<span style=\"{LITERAL_STYLE}\">{part}</span>"),
        Presentation::Link { href } => format!(
            "<a style=\"{LINK_STYLE}\" href=\"{href}\">{}</a>",
            caption.unwrap_or(part)
        ),
    };
    match token.class.css_class() {
        Some(class) => format!("<span class=\"{class}\">{inner}</span>"),
        None => inner,
    }
}

/// Escape the five HTML-reserved characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
