//! Cross-referencing TypeScript highlighter for documentation.
//!
//! Code samples are lexed into classified tokens, annotated with
//! cross-reference candidates (type names, links written inside comments)
//! and rendered to HTML in which every resolvable type name links to the
//! page that defines it.
//!
//! ```
//! use tsref::{CollectingSink, HtmlFormatter, RenderContext, RenderOptions, Renderer,
//!             SourceLocation, StandardLabels, SymbolRegistry};
//!
//! let symbols = SymbolRegistry::new();
//! symbols.register_type("Foo", "page1");
//! let labels = StandardLabels::new();
//! let sink = CollectingSink::new();
//! let options = RenderOptions { link_suffix: String::new() };
//! let ctx = RenderContext { symbols: &symbols, labels: &labels, diagnostics: &sink, options: &options };
//!
//! let html = HtmlFormatter::new(ctx).render("let x: Foo;", &SourceLocation::new("index", 1));
//! assert!(html.contains("href=\"page1#tsref-type-Foo\""));
//! ```

pub mod block;
pub mod build;
pub mod diagnostics;
pub mod domain;
pub mod filter;
pub mod labels;
pub mod lexer;
pub mod model;
pub mod registry;
pub mod render;
pub mod uri;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use domain::{Reference, TypeDomain};
pub use labels::{LabelIndex, StandardLabels};
pub use model::{AnnotatedToken, Annotation, SourceLocation, Token, TokenClass};
pub use registry::{SymbolKind, SymbolRegistry, Target};
pub use render::html::HtmlFormatter;
pub use render::{RenderContext, RenderOptions, Renderer};
