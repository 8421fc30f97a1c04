//! Code block assembly: dedent, emphasized lines, line numbers, caption and
//! definition anchor around the highlighted lines of one sample.

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::filter;
use crate::lexer;
use crate::model::SourceLocation;
use crate::registry::type_anchor;
use crate::render::html::{escape_html, HtmlFormatter};
use crate::render::RenderContext;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeSet;

/// Presentation settings of one code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockOptions {
    /// Type defined by this block; the block becomes its link target.
    #[serde(default)]
    pub define: Option<String>,
    #[serde(default)]
    pub linenos: bool,
    /// First line number; implies `linenos`.
    #[serde(default)]
    pub lineno_start: Option<usize>,
    /// 1-based lines to highlight.
    #[serde(default)]
    pub emphasize_lines: Vec<usize>,
    /// Columns removed from the start of every line.
    #[serde(default)]
    pub dedent: Option<usize>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Extra CSS classes on the block container.
    #[serde(default)]
    pub classes: Vec<String>,
}

impl BlockOptions {
    fn show_linenos(&self) -> bool {
        self.linenos || self.lineno_start.is_some()
    }
}

/// Render one sample as a complete HTML code block.
pub fn render_block(
    ctx: RenderContext<'_>,
    source: &str,
    options: &BlockOptions,
    location: &SourceLocation,
) -> String {
    let emphasized = emphasized_lines(
        &options.emphasize_lines,
        source.lines().count(),
        ctx.diagnostics,
        location,
    );

    let source = match options.dedent {
        Some(columns) => Cow::Owned(dedent(source, columns, ctx.diagnostics, location)),
        None => Cow::Borrowed(source),
    };

    let lines = HtmlFormatter::new(ctx)
        .render_lines(filter::filter(lexer::tokenize(&source)), location);

    let first = options.lineno_start.unwrap_or(1);
    let width = (first + lines.len().saturating_sub(1)).to_string().len();

    let mut body = String::new();
    for (i, line) in lines.iter().enumerate() {
        if options.show_linenos() {
            body.push_str(&format!(
                "<span class=\"linenos\">{:>width$}</span>",
                first + i
            ));
        }
        if emphasized.contains(&(i + 1)) {
            body.push_str(&format!("<span class=\"hll\">{line}</span>"));
        } else {
            body.push_str(line);
        }
    }

    let id = options
        .define
        .as_deref()
        .map(|name| format!(" id=\"{}\"", escape_html(&type_anchor(name))))
        .unwrap_or_default();
    let mut classes = String::from("highlight-ts notranslate");
    for class in &options.classes {
        classes.push(' ');
        classes.push_str(&escape_html(class));
    }
    let block = format!(
        "<div class=\"{classes}\"><div class=\"highlight\"><pre{id}><span></span>{body}</pre></div>\n</div>\n"
    );

    match &options.caption {
        Some(caption) => format!(
            "<div class=\"literal-block-wrapper docutils container\">\n\
             <div class=\"code-block-caption\"><span class=\"caption-text\">{}</span></div>\n\
             {block}</div>\n",
            escape_html(caption)
        ),
        None => block,
    }
}

/// Remove `columns` characters from the start of every line. Warns once
/// when anything but whitespace is removed.
pub fn dedent(
    source: &str,
    columns: usize,
    diagnostics: &dyn DiagnosticSink,
    location: &SourceLocation,
) -> String {
    let mut stripped_text = false;
    let lines: Vec<&str> = source
        .split('\n')
        .map(|line| {
            let cut = line
                .char_indices()
                .nth(columns)
                .map_or(line.len(), |(i, _)| i);
            if line[..cut].chars().any(|c| !c.is_whitespace()) {
                stripped_text = true;
            }
            &line[cut..]
        })
        .collect();

    if stripped_text {
        diagnostics.emit(Diagnostic {
            page: location.page.clone(),
            line: location.line,
            kind: DiagnosticKind::DedentStrippedText,
        });
    }
    lines.join("\n")
}

/// Valid 1-based emphasized lines. Entries outside `1..=total` are dropped
/// with a warning.
fn emphasized_lines(
    requested: &[usize],
    total: usize,
    diagnostics: &dyn DiagnosticSink,
    location: &SourceLocation,
) -> BTreeSet<usize> {
    let mut lines = BTreeSet::new();
    for &line in requested {
        if (1..=total).contains(&line) {
            lines.insert(line);
        } else {
            diagnostics.emit(Diagnostic {
                page: location.page.clone(),
                line: location.line,
                kind: DiagnosticKind::LineOutOfRange { line, lines: total },
            });
        }
    }
    lines
}
