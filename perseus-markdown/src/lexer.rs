//! Inline tokenization
//!
//! Raw tokenization of paragraph text using the logos lexer. This is the
//! entry point where inline source becomes a token stream; the parser in
//! [`crate::parser`] assembles the tokens into AST nodes.
//!
//! Unmatched delimiter characters (`$`, `!`, `[`) fall through as
//! single-character tokens or error spans; [`tokenize`] keeps both as
//! text, so degenerate input never loses characters. The parser folds
//! them back into plain text.

use logos::Logos;

/// Inline tokens recognized inside a paragraph.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum InlineToken {
    /// `[[☃ input-number 1]]`
    #[regex(r"\[\[☃ [a-zA-Z0-9-]+ [0-9]+\]\]")]
    Widget,

    /// `$...$` with backslash escapes allowed inside.
    #[regex(r"\$([^$\\\n]|\\.)*\$")]
    Math,

    /// `![alt](url)` or `![alt](url "title")`
    #[regex(r#"!\[[^\]\n]*\]\([^)\n]*\)"#)]
    Image,

    /// A run of characters containing no inline delimiters.
    #[regex(r"[^$!\[]+")]
    Text,

    #[token("$")]
    Dollar,
    #[token("!")]
    Bang,
    #[token("[")]
    OpenBracket,
}

/// Tokenize inline source with location information.
///
/// Spans the lexer cannot classify (an unclosed `$...` run, a stray
/// `[[`) are emitted as [`InlineToken::Text`], so the tokens always
/// cover the whole input.
pub fn tokenize(source: &str) -> Vec<(InlineToken, logos::Span)> {
    let mut lexer = InlineToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => tokens.push((InlineToken::Text, lexer.span())),
        }
    }

    tokens
}
