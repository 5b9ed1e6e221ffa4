//! Lexer for type annotations.
//!
//! Tokens borrow their text from the source; string literals keep their
//! quotes and escapes until the parser unescapes them.

use std::ops::Range;

use logos::Logos;

use crate::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token<'src> {
    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("=")]
    Eq,

    #[regex(r"-?[0-9]+", |lex| lex.slice())]
    Int(&'src str),

    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    Str(&'src str),

    // Names may contain dashes (`non-empty-list`) and namespace separators.
    #[regex(r"[A-Za-z_\\][A-Za-z0-9_\\-]*", |lex| lex.slice())]
    Ident(&'src str),
}

/// Tokenizes `input`, failing on the first character no token accepts.
pub fn lex(input: &str) -> Result<Vec<(Token<'_>, Range<usize>)>, ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ParseError::new(
                    format!("unexpected character: {:?}", &input[span.clone()]),
                    span,
                ));
            }
        }
    }
    Ok(tokens)
}

/// Strips the quotes of a string token and resolves backslash escapes.
///
/// Escapes are literal: `\x` always stands for `x`.
pub fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
