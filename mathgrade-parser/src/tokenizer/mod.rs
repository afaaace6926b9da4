pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Every character of the input lexes to some token (unknown characters become
/// [`TokenKind::Symbol`]), so the parser is the one to reject them.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2x",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Name, "x"),
            ],
        );
    }

    #[test]
    fn letters_are_separate_names() {
        compare_tokens(
            "xy3.5",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Name, "y"),
                (TokenKind::Float, "3.5"),
            ],
        );
    }

    #[test]
    fn commands_and_escapes() {
        compare_tokens(
            r"\frac{1}{2}\,\{x\}\\\&",
            [
                (TokenKind::Command, r"\frac"),
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Int, "1"),
                (TokenKind::CloseCurly, "}"),
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Int, "2"),
                (TokenKind::CloseCurly, "}"),
                (TokenKind::Space, r"\,"),
                (TokenKind::OpenSetBrace, r"\{"),
                (TokenKind::Name, "x"),
                (TokenKind::CloseSetBrace, r"\}"),
                (TokenKind::RowBreak, r"\\"),
                (TokenKind::LogicalAnd, r"\&"),
            ],
        );
    }

    #[test]
    fn subscripts_and_relations() {
        compare_tokens(
            r"x_{1}\le 5",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Subscript, "_"),
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Int, "1"),
                (TokenKind::CloseCurly, "}"),
                (TokenKind::Command, r"\le"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "5"),
            ],
        );
    }

    #[test]
    fn unknown_characters() {
        let tokens = tokenize_complete("2 $ 3");
        assert_eq!(tokens[2].kind, TokenKind::Symbol);
        assert_eq!(tokens[2].lexeme, "$");
    }
}
