//! Link filter: annotate type names and comment-embedded references.
//!
//! Runs over the lexer output one token at a time. Type keywords become
//! cross-reference candidates. Comments are re-split around two inline
//! syntaxes:
//!
//! - `` `Caption <target>`_ ``: a link, target defaults to the caption
//! - ``` ``text`` ```: a literal span, rendered bold and never linked
//!
//! Everything outside those spans passes through unchanged and in order.

use crate::model::{AnnotatedToken, Annotation, Token, TokenClass};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

/// `` `caption <target>`_ ``. Matches preceded by a backtick are rejected
/// by the caller.
static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`<]+)\s*(?:<([^>]+)>)?\s*`_?").unwrap());

static RE_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"``([^`]+)``").unwrap());

/// Streaming annotator over a token sequence.
pub struct LinkFilter<'a, I> {
    tokens: I,
    pending: VecDeque<AnnotatedToken<'a>>,
}

/// Annotate a token stream.
pub fn filter<'a, I>(tokens: I) -> LinkFilter<'a, I::IntoIter>
where
    I: IntoIterator<Item = Token<'a>>,
{
    LinkFilter {
        tokens: tokens.into_iter(),
        pending: VecDeque::new(),
    }
}

impl<'a, I> Iterator for LinkFilter<'a, I>
where
    I: Iterator<Item = Token<'a>>,
{
    type Item = AnnotatedToken<'a>;

    fn next(&mut self) -> Option<AnnotatedToken<'a>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            let token = self.tokens.next()?;
            annotate(token, &mut self.pending);
        }
    }
}

fn annotate<'a>(token: Token<'a>, out: &mut VecDeque<AnnotatedToken<'a>>) {
    match token.class {
        TokenClass::TypeKeyword => out.push_back(AnnotatedToken {
            class: token.class,
            text: token.text,
            annotation: Annotation {
                xref: Some(token.text.trim()),
                is_identifier: true,
                ..Annotation::default()
            },
        }),
        class if class.is_comment() => split_links(class, token.text, out),
        _ => out.push_back(token.into()),
    }
}

fn split_links<'a>(class: TokenClass, text: &'a str, out: &mut VecDeque<AnnotatedToken<'a>>) {
    let mut last = 0;
    let mut search = 0;

    while let Some(caps) = RE_LINK.captures_at(text, search) {
        let Some(whole) = caps.get(0) else { break };
        // ``literal`` spans must not be read as links
        if text[..whole.start()].ends_with('`') {
            search = whole.start() + 1;
            continue;
        }

        split_literals(class, &text[last..whole.start()], out);

        let raw_caption = caps.get(1).map_or("", |m| m.as_str());
        let caption = raw_caption.trim();
        let target = caps.get(2).map_or(caption, |m| m.as_str().trim());
        out.push_back(AnnotatedToken {
            class,
            text: raw_caption,
            annotation: Annotation {
                xref: Some(target),
                caption: Some(caption),
                trailing_underscore: whole.as_str().ends_with('_'),
                ..Annotation::default()
            },
        });

        // Keep line breaks that sat inside the dropped link markup.
        let caption_end = caps.get(1).map_or(whole.start(), |m| m.end());
        for (i, _) in text[caption_end..whole.end()].match_indices('\n') {
            let at = caption_end + i;
            out.push_back(AnnotatedToken::plain(TokenClass::Whitespace, &text[at..at + 1]));
        }

        last = whole.end();
        search = whole.end();
    }

    split_literals(class, &text[last..], out);
}

fn split_literals<'a>(class: TokenClass, text: &'a str, out: &mut VecDeque<AnnotatedToken<'a>>) {
    let mut last = 0;
    for caps in RE_LITERAL.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push_back(AnnotatedToken::plain(class, &text[last..whole.start()]));
        }
        out.push_back(AnnotatedToken {
            class,
            text: inner.as_str(),
            annotation: Annotation {
                is_literal: true,
                ..Annotation::default()
            },
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push_back(AnnotatedToken::plain(class, &text[last..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn comment(text: &str) -> Vec<AnnotatedToken<'_>> {
        filter([Token::new(TokenClass::LineComment, text)]).collect()
    }

    #[test]
    fn type_keyword_becomes_xref() {
        let out: Vec<_> = filter(tokenize("let x: Foo;")).collect();
        let foo = out.iter().find(|t| t.text == "Foo").unwrap();
        assert_eq!(foo.annotation.xref, Some("Foo"));
        assert!(foo.annotation.is_identifier);
        assert!(out
            .iter()
            .filter(|t| t.text != "Foo")
            .all(|t| t.annotation.is_empty()));
    }

    #[test]
    fn literal_and_link_in_one_comment() {
        let out = comment("// see ``raw`` and `Widget`_");
        let texts: Vec<_> = out.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["// see ", "raw", " and ", "Widget"]);

        assert!(out[1].annotation.is_literal);
        assert_eq!(out[1].annotation.xref, None);

        let link = out[3].annotation;
        assert_eq!(link.xref, Some("Widget"));
        assert_eq!(link.caption, Some("Widget"));
        assert!(link.trailing_underscore);
        assert!(out.iter().all(|t| t.class == TokenClass::LineComment));
    }

    #[test]
    fn explicit_target() {
        let out = comment("// `Foo <bar>`_");
        let link = &out[1];
        assert_eq!(link.text, "Foo ");
        assert_eq!(link.annotation.caption, Some("Foo"));
        assert_eq!(link.annotation.xref, Some("bar"));
        assert!(link.annotation.trailing_underscore);
    }

    #[test]
    fn link_without_underscore() {
        let out = comment("// uses `Amount`.");
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].annotation.xref, Some("Amount"));
        assert!(!out[1].annotation.trailing_underscore);
        assert_eq!(out[2].text, ".");
    }

    #[test]
    fn double_backticks_are_not_links() {
        let out = comment("// ``a`` ``b``");
        assert!(out.iter().all(|t| t.annotation.xref.is_none()));
        let literals: Vec<_> = out
            .iter()
            .filter(|t| t.annotation.is_literal)
            .map(|t| t.text)
            .collect();
        assert_eq!(literals, vec!["a", "b"]);
    }

    #[test]
    fn unmatched_backtick_passes_through() {
        let out = comment("// a ` b");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "// a ` b");
        assert!(out[0].annotation.is_empty());
    }

    #[test]
    fn newline_inside_target_is_kept() {
        let out: Vec<_> = filter([Token::new(TokenClass::BlockComment, "/* `A <b\nc>` */")]).collect();
        let newlines = out.iter().filter(|t| t.text == "\n").count();
        assert_eq!(newlines, 1);
        assert_eq!(out[1].annotation.xref, Some("b\nc"));
    }

    #[test]
    fn other_tokens_pass_through() {
        let out: Vec<_> = filter([Token::new(TokenClass::StringLiteral, "\"`x`\"")]).collect();
        assert_eq!(out, vec![AnnotatedToken::plain(TokenClass::StringLiteral, "\"`x`\"")]);
    }
}
