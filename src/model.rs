//! Token data model shared by the lexer, the link filter and the renderers.

use serde::Serialize;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenClass {
    Whitespace,
    /// Unclassified input emitted by the lexer's fallback.
    Text,
    LineComment,
    BlockComment,
    Operator,
    Punctuation,
    ControlKeyword,
    DeclarationKeyword,
    ReservedKeyword,
    ConstantKeyword,
    BuiltinName,
    TypeKeyword,
    TypeIdentifier,
    Identifier,
    NumberLiteral,
    StringLiteral,
    Regex,
}

impl TokenClass {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenClass::LineComment | TokenClass::BlockComment)
    }

    /// Short CSS class used for highlighting, `None` for unstyled text.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            TokenClass::Whitespace | TokenClass::Text => None,
            TokenClass::LineComment => Some("c1"),
            TokenClass::BlockComment => Some("cm"),
            TokenClass::Operator => Some("o"),
            TokenClass::Punctuation => Some("p"),
            TokenClass::ControlKeyword => Some("k"),
            TokenClass::DeclarationKeyword => Some("kd"),
            TokenClass::ReservedKeyword => Some("kr"),
            TokenClass::ConstantKeyword => Some("kc"),
            TokenClass::BuiltinName => Some("nb"),
            TokenClass::TypeKeyword => Some("kt"),
            TokenClass::TypeIdentifier | TokenClass::Identifier => Some("nx"),
            TokenClass::NumberLiteral => Some("m"),
            TokenClass::StringLiteral => Some("s"),
            TokenClass::Regex => Some("sr"),
        }
    }
}

/// A classified span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub class: TokenClass,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(class: TokenClass, text: &'a str) -> Self {
        Token { class, text }
    }
}

/// Cross-reference metadata attached by the link filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Annotation<'a> {
    /// Symbol name to resolve
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xref: Option<&'a str>,
    /// Display text override for links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
    /// Lexically a type name
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_identifier: bool,
    /// Inside a ``literal`` span: bold, never linked
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_literal: bool,
    /// Link written as `name`_
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub trailing_underscore: bool,
}

impl Annotation<'_> {
    pub fn is_empty(&self) -> bool {
        *self == Annotation::default()
    }
}

/// A token together with its (possibly empty) annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnnotatedToken<'a> {
    pub class: TokenClass,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Annotation::is_empty")]
    pub annotation: Annotation<'a>,
}

impl<'a> AnnotatedToken<'a> {
    pub fn plain(class: TokenClass, text: &'a str) -> Self {
        AnnotatedToken {
            class,
            text,
            annotation: Annotation::default(),
        }
    }
}

impl<'a> From<Token<'a>> for AnnotatedToken<'a> {
    fn from(token: Token<'a>) -> Self {
        AnnotatedToken::plain(token.class, token.text)
    }
}

/// Where a code sample came from, used for diagnostics and link paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Page identifier, e.g. `api/wallet`
    pub page: String,
    /// Line of the first sample line in the page source (1-based)
    pub line: usize,
}

impl SourceLocation {
    pub fn new(page: impl Into<String>, line: usize) -> Self {
        SourceLocation {
            page: page.into(),
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_classes() {
        assert!(TokenClass::LineComment.is_comment());
        assert!(TokenClass::BlockComment.is_comment());
        assert!(!TokenClass::StringLiteral.is_comment());
    }

    #[test]
    fn plain_text_has_no_css() {
        assert_eq!(TokenClass::Whitespace.css_class(), None);
        assert_eq!(TokenClass::Text.css_class(), None);
        assert_eq!(TokenClass::TypeKeyword.css_class(), Some("kt"));
    }

    #[test]
    fn empty_annotation_skipped_in_json() {
        let tok = AnnotatedToken::plain(TokenClass::Identifier, "x");
        let json = serde_json::to_string(&tok).unwrap();
        assert_eq!(json, r#"{"class":"Identifier","text":"x"}"#);
    }
}
