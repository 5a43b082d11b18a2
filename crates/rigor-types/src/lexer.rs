//! Annotation lexer
//!
//! Tokenizes annotation text such as `dict[str, list[int]] | None` using
//! logos. The parser in [`crate::parse`] consumes the token stream.

use crate::error::TypeError;
use logos::Logos;
use std::fmt;

/// Token of the annotation grammar
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'s> {
    /// Type name or keyword
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Ident(&'s str),

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `,`
    #[token(",")]
    Comma,

    /// `|`
    #[token("|")]
    Pipe,

    /// `...`
    #[token("...")]
    Ellipsis,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => f.write_str(name),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::Comma => f.write_str(","),
            Token::Pipe => f.write_str("|"),
            Token::Ellipsis => f.write_str("..."),
        }
    }
}

/// A token with its byte offset in the annotation text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<'s> {
    /// The token
    pub token: Token<'s>,
    /// Byte offset of the token start
    pub offset: usize,
}

/// Tokenize annotation text
pub fn tokenize(source: &str) -> Result<Vec<Spanned<'_>>, TypeError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let offset = lexer.span().start;
        match result {
            Ok(token) => tokens.push(Spanned { token, offset }),
            Err(()) => {
                return Err(TypeError::UnexpectedCharacter {
                    source_text: source.to_string(),
                    offset,
                })
            }
        }
    }

    Ok(tokens)
}
