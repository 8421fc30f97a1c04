//! Two-phase documentation build from a JSON manifest.
//!
//! Phase one registers every defined type so that phase two can link to it
//! from any page, whatever the page order. Pages then render in parallel.

use crate::block::{render_block, BlockOptions};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::model::SourceLocation;
use crate::render::html::escape_html;
use crate::render::RenderContext;
use crate::uri;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct BuildManifest {
    pub pages: Vec<PageSpec>,
}

#[derive(Debug, Deserialize)]
pub struct PageSpec {
    /// Page identifier, e.g. `api/wallet`
    pub page: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub samples: Vec<SampleSpec>,
}

#[derive(Debug, Deserialize)]
pub struct SampleSpec {
    /// Line of the sample in the page source
    pub line: usize,
    pub source: String,
    #[serde(flatten)]
    pub options: BlockOptions,
}

impl BuildManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let input = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::from_json(&input)
            .with_context(|| format!("invalid manifest {}", path.display()))
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub samples: usize,
    pub definitions: usize,
}

/// Register every `define` in the manifest. A type defined twice keeps
/// the later definition and is reported.
pub fn register_definitions(manifest: &BuildManifest, ctx: RenderContext<'_>) -> usize {
    let mut count = 0;
    for page in &manifest.pages {
        for sample in &page.samples {
            let Some(name) = sample.options.define.as_deref() else {
                continue;
            };
            count += 1;
            if let Some(previous) = ctx.symbols.register_type(name, &page.page) {
                ctx.diagnostics.emit(Diagnostic {
                    page: page.page.clone(),
                    line: sample.line,
                    kind: DiagnosticKind::DuplicateDefinition {
                        name: name.to_string(),
                        previous_page: previous.page,
                    },
                });
            }
        }
    }
    count
}

/// Render all samples of one page into a standalone HTML document.
pub fn render_page(page: &PageSpec, ctx: RenderContext<'_>) -> String {
    let title = page.title.as_deref().unwrap_or(&page.page);
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str("<style>\n");
    out.push_str("pre { background: #f8f8f8; padding: 0.5em 1em; line-height: 125%; }\n");
    out.push_str(".hll { background-color: #ffffcc; }\n");
    out.push_str(".linenos { color: #999; padding-right: 1em; user-select: none; }\n");
    out.push_str(".c1, .cm { color: #408080; font-style: italic; }\n");
    out.push_str(".k, .kd, .kr, .kc { color: #008000; font-weight: bold; }\n");
    out.push_str(".kt { color: #b00040; }\n");
    out.push_str(".nb { color: #008000; }\n");
    out.push_str(".m { color: #666; }\n");
    out.push_str(".s, .sr { color: #ba2121; }\n");
    out.push_str(".o { color: #666; }\n");
    out.push_str("</style>\n");
    out.push_str("</head>\n<body>\n");

    for sample in &page.samples {
        let location = SourceLocation::new(page.page.as_str(), sample.line);
        out.push_str(&render_block(ctx, &sample.source, &sample.options, &location));
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Output file of a page under `out_dir`.
pub fn page_path(out_dir: &Path, page: &str, suffix: &str) -> PathBuf {
    out_dir.join(uri::page_uri(page, suffix))
}

/// Run both phases and write one file per page.
pub fn build(manifest: &BuildManifest, ctx: RenderContext<'_>, out_dir: &Path) -> Result<BuildSummary> {
    tracing::info!(pages = manifest.pages.len(), "registering definitions");
    let definitions = register_definitions(manifest, ctx);

    tracing::info!(definitions, out_dir = %out_dir.display(), "rendering pages");
    manifest
        .pages
        .par_iter()
        .map(|page| {
            tracing::debug!(page = %page.page, samples = page.samples.len(), "render page");
            let html = render_page(page, ctx);
            let path = page_path(out_dir, &page.page, &ctx.options.link_suffix);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))
        })
        .collect::<Result<Vec<()>>>()?;

    Ok(BuildSummary {
        pages: manifest.pages.len(),
        samples: manifest.pages.iter().map(|p| p.samples.len()).sum(),
        definitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::labels::StandardLabels;
    use crate::registry::{SymbolKind, SymbolRegistry};
    use crate::render::RenderOptions;

    const MANIFEST: &str = r#"{
        "pages": [
            {
                "page": "api/wallet",
                "samples": [
                    { "line": 12, "source": "let balance: Amount;\n" }
                ]
            },
            {
                "page": "api/common",
                "title": "Common types",
                "samples": [
                    { "line": 3, "source": "type Amount = string;\n", "define": "Amount" }
                ]
            }
        ]
    }"#;

    struct Fixture {
        symbols: SymbolRegistry,
        labels: StandardLabels,
        sink: CollectingSink,
        options: RenderOptions,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                symbols: SymbolRegistry::new(),
                labels: StandardLabels::new(),
                sink: CollectingSink::new(),
                options: RenderOptions::default(),
            }
        }

        fn ctx(&self) -> RenderContext<'_> {
            RenderContext {
                symbols: &self.symbols,
                labels: &self.labels,
                diagnostics: &self.sink,
                options: &self.options,
            }
        }
    }

    #[test]
    fn parses_sample_options() {
        let manifest = BuildManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.pages.len(), 2);
        let sample = &manifest.pages[1].samples[0];
        assert_eq!(sample.options.define.as_deref(), Some("Amount"));
        assert!(!sample.options.linenos);
    }

    #[test]
    fn later_page_definitions_resolve() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let manifest = BuildManifest::from_json(MANIFEST).unwrap();
        let summary = build(&manifest, fx.ctx(), dir.path()).unwrap();

        assert_eq!(
            summary,
            BuildSummary {
                pages: 2,
                samples: 2,
                definitions: 1
            }
        );
        let wallet = fs::read_to_string(dir.path().join("api/wallet.html")).unwrap();
        assert!(wallet.contains("href=\"common.html#tsref-type-Amount\""));
        let common = fs::read_to_string(dir.path().join("api/common.html")).unwrap();
        assert!(common.contains("<title>Common types</title>"));
        assert!(common.contains("id=\"tsref-type-Amount\""));
        assert!(fx.sink.is_empty());
    }

    #[test]
    fn duplicate_definition_reported() {
        let fx = Fixture::new();
        let manifest = BuildManifest::from_json(
            r#"{"pages": [
                {"page": "a", "samples": [{"line": 1, "source": "x", "define": "T"}]},
                {"page": "b", "samples": [{"line": 5, "source": "y", "define": "T"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(register_definitions(&manifest, fx.ctx()), 2);
        assert_eq!(fx.symbols.lookup(SymbolKind::Type, "T").unwrap().page, "b");
        let diags = fx.sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].page, "b");
        assert_eq!(diags[0].line, 5);
        assert_eq!(
            diags[0].kind,
            DiagnosticKind::DuplicateDefinition {
                name: "T".into(),
                previous_page: "a".into()
            }
        );
    }

    #[test]
    fn unresolved_types_warn_with_page_line() {
        let fx = Fixture::new();
        let manifest = BuildManifest::from_json(
            r#"{"pages": [{"page": "p", "samples": [{"line": 40, "source": "\n  x: Nope\n"}]}]}"#,
        )
        .unwrap();
        render_page(&manifest.pages[0], fx.ctx());
        let diags = fx.sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].to_string(), "p:41: code block contains unresolved xref 'Nope'");
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let err = BuildManifest::load(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read manifest"));
    }
}
