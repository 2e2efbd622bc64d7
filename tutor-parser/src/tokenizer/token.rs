use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    #[token("−")]
    Sub,

    #[token("*")]
    #[token(r"\cdot")]
    #[token(r"\times")]
    #[token("·")]
    #[token("×")]
    Mul,

    /// A bare slash. Depending on the surrounding whitespace, this is either part of a fraction
    /// literal or a division operator.
    #[token("/")]
    Slash,

    #[token("÷")]
    #[token(r"\div")]
    #[token(":")]
    Divide,

    #[token("(")]
    #[token(r"\left(")]
    OpenParen,

    #[token(")")]
    #[token(r"\right)")]
    CloseParen,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[token(r"\frac")]
    Frac,

    /// Any other LaTeX command, such as `\sqrt`. These are not supported.
    #[regex(r"\\[a-zA-Z]+")]
    Command,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Name,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Returns true if the token is a number literal without a decimal point.
    pub fn is_integer(&self) -> bool {
        self.kind == TokenKind::Number && !self.lexeme.contains('.')
    }
}
