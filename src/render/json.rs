//! Token dump renderer, for inspecting lexer and filter output.

use crate::filter;
use crate::lexer;
use crate::model::{AnnotatedToken, SourceLocation};
use crate::render::Renderer;

pub struct TokenDump;

impl Renderer for TokenDump {
    fn render(&self, source: &str, _location: &SourceLocation) -> String {
        let tokens: Vec<AnnotatedToken<'_>> = filter::filter(lexer::tokenize(source)).collect();
        // Serializing borrowed strings and plain enums cannot fail.
        serde_json::to_string_pretty(&tokens).unwrap_or_default() + "\n"
    }
}
