//! Reader for Lispy source
//!
//! A recursive descent reader that turns a token stream into values. Numbers
//! that do not fit an `i64` are read as bad-number error values, so the
//! failure surfaces when the expression is evaluated.

use crate::diagnostics::{ReadError, SourceFile};
use crate::interp::{ErrorKind, Value};
use crate::lexer::{Token, TokenKind, lex_source};

/// Read every top-level expression in `source`
pub fn read_program(source: &str) -> Result<Vec<Value>, ReadError> {
    read_file(&SourceFile::anonymous(source))
}

/// Read a whole input line as a single call
///
/// `+ 1 2` reads as `(+ 1 2)`, and `(+ 1 2)` as `((+ 1 2))`, which evaluates
/// to the same thing.
pub fn read_line(source: &str) -> Result<Value, ReadError> {
    read_program(source).map(Value::List)
}

/// Read every top-level expression in a named source file
pub fn read_file(file: &SourceFile) -> Result<Vec<Value>, ReadError> {
    let tokens = lex_source(file)?;
    let mut reader = Reader::new(&tokens, file);
    reader.read_all()
}

/// Reader state
struct Reader<'a> {
    tokens: &'a [Token],
    pos: usize,
    file: &'a SourceFile,
}

impl<'a> Reader<'a> {
    fn new(tokens: &'a [Token], file: &'a SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            file,
        }
    }

    fn current(&self) -> &'a Token {
        let tokens = self.tokens;
        match tokens.get(self.pos) {
            Some(tok) => tok,
            None => &tokens[tokens.len() - 1],
        }
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) -> &'a Token {
        let tok = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn read_all(&mut self) -> Result<Vec<Value>, ReadError> {
        let mut values = Vec::new();
        while !self.at(TokenKind::Eof) {
            values.push(self.read_expr()?);
        }
        Ok(values)
    }

    fn read_expr(&mut self) -> Result<Value, ReadError> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::IntLit => Ok(read_number(&tok.text)),
            TokenKind::Symbol => Ok(Value::symbol(tok.text.as_str())),
            TokenKind::LParen | TokenKind::LBrace => {
                let items = self.read_seq(tok)?;
                if tok.kind == TokenKind::LBrace {
                    Ok(items.defer())
                } else {
                    Ok(items)
                }
            }
            TokenKind::Quote => {
                let next = self.peek();
                if next == TokenKind::Eof || next == TokenKind::RParen || next == TokenKind::RBrace
                {
                    return Err(ReadError::dangling_quote(tok.span, self.file));
                }
                Ok(self.read_expr()?.defer())
            }
            TokenKind::RParen | TokenKind::RBrace => Err(ReadError::unexpected_token(
                &tok.text, tok.span, self.file,
            )),
            TokenKind::Eof => Err(ReadError::unexpected_token(
                TokenKind::Eof.as_str(),
                tok.span,
                self.file,
            )),
        }
    }

    /// Read elements up to the delimiter closing `open`
    fn read_seq(&mut self, open: &Token) -> Result<Value, ReadError> {
        let closer = open.kind.closer().unwrap_or(TokenKind::RParen);
        let mut list = Value::list();

        loop {
            if self.at(closer) {
                self.advance();
                return Ok(list);
            }
            match self.peek() {
                TokenKind::Eof => {
                    return Err(ReadError::unclosed(
                        open.kind.as_str(),
                        closer.as_str(),
                        open.span,
                        self.file,
                    ));
                }
                TokenKind::RParen | TokenKind::RBrace => {
                    let tok = self.advance();
                    return Err(ReadError::unexpected_token(&tok.text, tok.span, self.file));
                }
                _ => {
                    list.append(self.read_expr()?);
                }
            }
        }
    }
}

fn read_number(text: &str) -> Value {
    match text.parse::<i64>() {
        Ok(n) => Value::number(n),
        Err(_) => Value::error(ErrorKind::BadNumber, "invalid number"),
    }
}
