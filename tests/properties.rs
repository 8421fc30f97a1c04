use proptest::prelude::*;
use tsref::filter::filter;
use tsref::lexer::tokenize;
use tsref::render::html::escape_html;
use tsref::{
    CollectingSink, HtmlFormatter, RenderContext, RenderOptions, Renderer, SourceLocation,
    StandardLabels, SymbolRegistry,
};

/// Source-like text: identifiers, operators, comments, quotes, line breaks.
const SOURCE_LIKE: &str = "[a-zA-Z0-9_$ \t\n:;,.|&=<>+*/\\\\!?(){}\\[\\]'\"`-]*";

fn strip_tags(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn render(source: &str) -> String {
    let symbols = SymbolRegistry::new();
    let labels = StandardLabels::new();
    let sink = CollectingSink::new();
    let options = RenderOptions::default();
    let ctx = RenderContext {
        symbols: &symbols,
        labels: &labels,
        diagnostics: &sink,
        options: &options,
    };
    HtmlFormatter::new(ctx).render(source, &SourceLocation::new("index", 1))
}

proptest! {
    #[test]
    fn lexing_is_lossless(text in "\\PC*") {
        let joined: String = tokenize(&text).map(|t| t.text).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn lexing_source_like_text_is_lossless(text in SOURCE_LIKE) {
        let tokens: Vec<_> = tokenize(&text).collect();
        prop_assert!(tokens.iter().all(|t| !t.text.is_empty()));
        let joined: String = tokens.iter().map(|t| t.text).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn filter_preserves_text_without_backticks(text in SOURCE_LIKE) {
        let text = text.replace('`', "");
        let joined: String = filter(tokenize(&text)).map(|t| t.text).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn rendering_unlinked_text_round_trips(text in SOURCE_LIKE) {
        let text = text.replace('`', "");
        let mut expected = escape_html(&text);
        if !text.is_empty() && !text.ends_with('\n') {
            expected.push('\n');
        }
        prop_assert_eq!(strip_tags(&render(&text)), expected);
    }
}
