//! Lexer for Lispy source text

mod tokens;

pub use tokens::{Token, TokenKind};

use logos::Logos;

use crate::common::Span;
use crate::diagnostics::{ReadError, SourceFile};

/// Tokenize `source`, always ending with an `Eof` token
pub fn lex(source: &str) -> Result<Vec<Token>, ReadError> {
    lex_source(&SourceFile::anonymous(source))
}

/// Tokenize a named source file
pub fn lex_source(file: &SourceFile) -> Result<Vec<Token>, ReadError> {
    let source: &str = &file.content;
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                span,
                text: lexer.slice().to_string(),
            }),
            Err(()) => {
                let found = lexer.slice().chars().next().unwrap_or('\0');
                return Err(ReadError::unexpected_char(found, span, file));
            }
        }
    }

    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
        text: String::new(),
    });
    tracing::trace!(count = tokens.len(), "lexed");
    Ok(tokens)
}
