//! TypeScript lexer for documentation code samples.
//!
//! A rule-table state machine: every mode owns an ordered list of rules and
//! the first rule that matches at the current position wins. Rules may emit
//! one token per capture group and move the mode stack. The lexer never
//! fails: input no rule accepts is emitted one character at a time as
//! [`TokenClass::Text`].

use crate::model::{Token, TokenClass};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

use TokenClass::*;

/// Lexing context on top of the mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Root,
    /// After an operator or keyword: a `/` may open a regex literal.
    ExpectRegexOrDivide,
    /// Inside a type annotation or alias body.
    TypeExpression,
    /// A `/` that is not a valid regex literal; plain text up to the newline.
    BadRegex,
}

/// Zero-width transitions allowed at one position before forcing progress.
const MAX_STALL: u8 = 8;

// -- Rule tables --------------------------------------------------------------

enum Matcher {
    /// Regex anchored at the current position.
    Pattern(Regex),
    /// Zero-width: at line start, followed by whitespace, `/` or `<!--`.
    LineStart,
    /// Zero-width: the rest of the input starts with this text.
    Peek(&'static str),
    /// `literal` immediately followed by `next`, which is not consumed.
    Before { literal: &'static str, next: char },
    /// Zero-width, always matches.
    Empty,
}

enum Emit {
    Nothing,
    Single(TokenClass),
    /// One class per capture group; the groups cover the whole match.
    Groups(&'static [TokenClass]),
}

#[derive(Clone, Copy)]
enum Transition {
    Stay,
    Push(Mode),
    Pop,
    /// Pop, then push.
    Replace(Mode),
}

struct Rule {
    matcher: Matcher,
    emit: Emit,
    next: Transition,
    /// Only match when the previous character is not a word character.
    word_start: bool,
}

impl Rule {
    fn new(matcher: Matcher, emit: Emit) -> Self {
        Rule {
            matcher,
            emit,
            next: Transition::Stay,
            word_start: false,
        }
    }

    fn token(pattern: &str, class: TokenClass) -> Self {
        Rule::new(Matcher::Pattern(anchored(pattern)), Emit::Single(class))
    }

    fn groups(pattern: &str, classes: &'static [TokenClass]) -> Self {
        Rule::new(Matcher::Pattern(anchored(pattern)), Emit::Groups(classes))
    }

    fn push(mut self, mode: Mode) -> Self {
        self.next = Transition::Push(mode);
        self
    }

    fn pop(mut self) -> Self {
        self.next = Transition::Pop;
        self
    }

    fn replace(mut self, mode: Mode) -> Self {
        self.next = Transition::Replace(mode);
        self
    }

    fn at_word_start(mut self) -> Self {
        self.word_start = true;
        self
    }
}

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})")).unwrap()
}

fn comments_and_whitespace() -> Vec<Rule> {
    vec![
        Rule::token(r"\s+", Whitespace),
        Rule::token(r"<!--", BlockComment),
        Rule::token(r"//[^\n]*\n?", LineComment),
        Rule::token(r"(?s)/\*.*?\*/", BlockComment),
    ]
}

static ROOT: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    use Mode::{ExpectRegexOrDivide as Slash, TypeExpression as TypeExp};

    let mut rules = vec![Rule::new(Matcher::LineStart, Emit::Nothing).push(Slash)];
    rules.extend(comments_and_whitespace());
    rules.extend([
        Rule::token(
            r"\+\+|--|~|&&|\?|:|\|\||(?:<<|>>>?|==?|!=?|[-<>+*%&|\^/])=?",
            Operator,
        )
        .push(Slash),
        Rule::new(
            Matcher::Before {
                literal: "\\",
                next: '\n',
            },
            Emit::Single(Operator),
        )
        .push(Slash),
        Rule::token(r"[{(\[;,]", Punctuation).push(Slash),
        Rule::token(r"[})\].]", Punctuation),
        Rule::token(
            r"(?:for|in|while|do|break|return|continue|switch|case|default|if|else|throw|try|catch|finally|new|delete|typeof|instanceof|void|this)\b",
            ControlKeyword,
        )
        .push(Slash),
        Rule::token(r"(?:var|let|const|with|function)\b", DeclarationKeyword).push(Slash),
        Rule::token(
            r"(?:abstract|boolean|byte|char|class|const|debugger|double|enum|export|extends|final|float|goto|implements|import|int|interface|long|native|package|private|protected|public|short|static|super|synchronized|throws|transient|volatile)\b",
            ReservedKeyword,
        ),
        Rule::token(r"(?:true|false|null|NaN|Infinity|undefined)\b", ConstantKeyword),
        Rule::token(
            r"(?:Array|Boolean|Date|Error|Function|Math|netscape|Number|Object|Packages|RegExp|String|sun|decodeURI|decodeURIComponent|encodeURI|encodeURIComponent|eval|isFinite|isNaN|parseFloat|parseInt|document|this|window)\b",
            BuiltinName,
        ),
        // module name {...}
        Rule::groups(
            r"(module)(\s*)(\s*[a-zA-Z0-9_?.$][\w?.$]*)(\s*)",
            &[ReservedKeyword, Whitespace, Identifier, Whitespace],
        )
        .at_word_start()
        .push(Slash),
        Rule::token(r"(?:string|bool|number)\b", TypeKeyword).at_word_start(),
        Rule::token(r"(?:constructor|declare|interface|as|AS)\b", ReservedKeyword)
            .at_word_start(),
        // super(argument, list)
        Rule::groups(
            r"(super)(\s*)(\()([a-zA-Z0-9,_?.$\s]+\s*)(\))",
            &[ReservedKeyword, Whitespace, Punctuation, Identifier, Punctuation],
        )
        .push(Slash),
        // name() {
        Rule::groups(
            r"([a-zA-Z_?.$][\w?.$]*)(\(\))( )(\{)",
            &[Identifier, Punctuation, Whitespace, Punctuation],
        )
        .push(Slash),
        // name: Type
        Rule::groups(
            r"([a-zA-Z0-9_?.$][\w?.$]*)(\s*)(:)(\s*)",
            &[Identifier, Whitespace, Punctuation, Whitespace],
        )
        .push(TypeExp),
        // type Name = A | B
        Rule::groups(
            r"(type)(\s*)([a-zA-Z0-9_?.$]+)(\s*)(=)(\s*)",
            &[
                ReservedKeyword,
                Whitespace,
                TypeIdentifier,
                Whitespace,
                Operator,
                Whitespace,
            ],
        )
        .at_word_start()
        .push(TypeExp),
        Rule::token(r"[$a-zA-Z_][a-zA-Z0-9_]*", Identifier),
        Rule::token(r"[0-9][0-9]*\.[0-9]+(?:[eE][0-9]+)?[fd]?", NumberLiteral),
        Rule::token(r"0x[0-9a-fA-F]+", NumberLiteral),
        Rule::token(r"[0-9]+", NumberLiteral),
        Rule::token(r#""(?:\\\\|\\"|[^"])*""#, StringLiteral),
        Rule::token(r"'(?:\\\\|\\'|[^'])*'", StringLiteral),
    ]);
    rules
});

static EXPECT_REGEX: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = comments_and_whitespace();
    rules.extend([
        Rule::token(
            r"(?s)/(?:\\.|[^\[/\\\n]|\[(?:\\.|[^\]\\\n])*\])+/(?:[gim]+\b|\B)",
            TokenClass::Regex,
        )
        .pop(),
        Rule::new(Matcher::Peek("/"), Emit::Nothing).replace(Mode::BadRegex),
        Rule::new(Matcher::Empty, Emit::Nothing).pop(),
    ]);
    rules
});

static BAD_REGEX: LazyLock<Vec<Rule>> =
    LazyLock::new(|| vec![Rule::token(r"\n", Whitespace).pop()]);

static TYPE_EXPRESSION: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::token(r"[a-zA-Z0-9_?.$]+", TypeKeyword),
        Rule::token(r"[^\S\n]+", Whitespace),
        Rule::token(r"\|", Operator),
        Rule::token(r"\n", Whitespace).pop(),
        Rule::token(r";", Punctuation).pop(),
        Rule::new(Matcher::Empty, Emit::Nothing).pop(),
    ]
});

fn rules_for(mode: Mode) -> &'static [Rule] {
    match mode {
        Mode::Root => &ROOT,
        Mode::ExpectRegexOrDivide => &EXPECT_REGEX,
        Mode::TypeExpression => &TYPE_EXPRESSION,
        Mode::BadRegex => &BAD_REGEX,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// -- Lexer --------------------------------------------------------------------

/// Lazy token stream over one source text.
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    stack: Vec<Mode>,
    queue: VecDeque<Token<'a>>,
    stalled: u8,
}

/// Tokenize a code sample. The concatenated token text equals `source`.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Lexer {
            text,
            pos: 0,
            stack: vec![Mode::Root],
            queue: VecDeque::new(),
            stalled: 0,
        }
    }

    /// Current mode stack, bottom first.
    pub fn modes(&self) -> &[Mode] {
        &self.stack
    }

    fn mode(&self) -> Mode {
        self.stack.last().copied().unwrap_or(Mode::Root)
    }

    fn step(&mut self) {
        if self.stalled < MAX_STALL {
            for rule in rules_for(self.mode()) {
                if let Some(len) = self.apply(rule) {
                    self.pos += len;
                    self.stalled = if len == 0 { self.stalled + 1 } else { 0 };
                    self.transition(rule.next);
                    return;
                }
            }
        }
        self.fallback();
    }

    /// Try one rule at the current position; on a match, queue its tokens
    /// and return the consumed length.
    fn apply(&mut self, rule: &Rule) -> Option<usize> {
        let text = self.text;
        let rest = &text[self.pos..];

        if rule.word_start && text[..self.pos].chars().next_back().is_some_and(is_word_char) {
            return None;
        }

        match &rule.matcher {
            Matcher::Pattern(re) => match rule.emit {
                Emit::Groups(classes) => {
                    let caps = re.captures(rest)?;
                    for (i, class) in classes.iter().enumerate() {
                        if let Some(m) = caps.get(i + 1) {
                            self.emit(*class, m.as_str());
                        }
                    }
                    Some(caps.get(0).map_or(0, |m| m.end()))
                }
                Emit::Single(class) => {
                    let m = re.find(rest)?;
                    self.emit(class, m.as_str());
                    Some(m.end())
                }
                Emit::Nothing => re.find(rest).map(|m| m.end()),
            },
            Matcher::LineStart => {
                let at_line_start = self.pos == 0 || text[..self.pos].ends_with('\n');
                let ahead = rest.starts_with(char::is_whitespace)
                    || rest.starts_with('/')
                    || rest.starts_with("<!--");
                (at_line_start && ahead).then_some(0)
            }
            Matcher::Peek(prefix) => rest.starts_with(prefix).then_some(0),
            Matcher::Before { literal, next } => {
                let after = rest.strip_prefix(literal)?;
                if !after.starts_with(*next) {
                    return None;
                }
                if let Emit::Single(class) = rule.emit {
                    self.emit(class, &rest[..literal.len()]);
                }
                Some(literal.len())
            }
            Matcher::Empty => Some(0),
        }
    }

    fn emit(&mut self, class: TokenClass, text: &'a str) {
        if !text.is_empty() {
            self.queue.push_back(Token::new(class, text));
        }
    }

    fn transition(&mut self, next: Transition) {
        match next {
            Transition::Stay => {}
            Transition::Push(mode) => self.stack.push(mode),
            Transition::Pop => self.pop(),
            Transition::Replace(mode) => {
                self.pop();
                self.stack.push(mode);
            }
        }
    }

    fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// No rule matched: consume one character. A newline also resets the
    /// mode stack.
    fn fallback(&mut self) {
        self.stalled = 0;
        let text = self.text;
        let Some(ch) = text[self.pos..].chars().next() else {
            return;
        };
        let piece = &text[self.pos..self.pos + ch.len_utf8()];
        if ch == '\n' {
            self.stack.truncate(1);
            self.emit(Whitespace, piece);
        } else {
            self.emit(Text, piece);
        }
        self.pos += piece.len();
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.pos >= self.text.len() {
                return None;
            }
            self.step();
        }
    }
}
