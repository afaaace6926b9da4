use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    /// Explicit spacing commands, such as `\,` or `\;`, and the non-breaking space `~`.
    #[regex(r"\\[,;:! ]")]
    #[token("~")]
    Space,

    /// A command, such as `\frac` or `\alpha`.
    #[regex(r"\\[a-zA-Z]+")]
    Command,

    #[token(r"\{")]
    OpenSetBrace,

    #[token(r"\}")]
    CloseSetBrace,

    #[token(r"\\")]
    RowBreak,

    #[token(r"\&")]
    LogicalAnd,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("^")]
    Exp,

    #[token("_")]
    Subscript,

    #[token("=")]
    Eq,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("!")]
    Factorial,

    #[token("|")]
    Bar,

    #[token("&")]
    Ampersand,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[token("{")]
    OpenCurly,

    #[token("}")]
    CloseCurly,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+")]
    Float,

    /// A single letter. Every letter is its own symbol, so `xy` is two tokens.
    #[regex(r"[a-zA-Z]")]
    Name,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Space)
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

    /// Returns the name of the command, without the leading backslash, if this token is a
    /// command.
    pub fn command_name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Command => self.lexeme.strip_prefix('\\'),
            _ => None,
        }
    }
}
