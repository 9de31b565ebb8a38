//! Lexer tests

use lispy::lexer::{TokenKind, lex};

#[test]
fn test_lex_empty() {
    let tokens = lex("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_lex_whitespace() {
    let tokens = lex("   \t\n  ").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_lex_comment() {
    let tokens = lex("; nothing to see\n42 ; trailing").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::IntLit);
    assert_eq!(tokens[0].text, "42");
}

#[test]
fn test_lex_simple_call() {
    let tokens = lex("(+ 1 -2)").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LParen);
    assert_eq!(tokens[1].kind, TokenKind::Symbol);
    assert_eq!(tokens[1].text, "+");
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[3].kind, TokenKind::IntLit);
    assert_eq!(tokens[3].text, "-2");
    assert_eq!(tokens[4].kind, TokenKind::RParen);
    assert_eq!(tokens[5].kind, TokenKind::Eof);
}

#[test]
fn test_lex_minus_alone_is_symbol() {
    let tokens = lex("- 5").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Symbol);
    assert_eq!(tokens[1].kind, TokenKind::IntLit);
}

#[test]
fn test_lex_delimiters() {
    let tokens = lex("{ } ( ) '").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LBrace);
    assert_eq!(tokens[1].kind, TokenKind::RBrace);
    assert_eq!(tokens[2].kind, TokenKind::LParen);
    assert_eq!(tokens[3].kind, TokenKind::RParen);
    assert_eq!(tokens[4].kind, TokenKind::Quote);
}

#[test]
fn test_lex_symbols() {
    let source = "def = lambda \\ head tail eval join & <= snake_case x1";
    let tokens = lex(source).unwrap();
    let texts: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Symbol)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "def", "=", "lambda", "\\", "head", "tail", "eval", "join", "&", "<=", "snake_case",
            "x1"
        ]
    );
}

#[test]
fn test_lex_spans() {
    let tokens = lex("(head {1})").unwrap();
    assert_eq!(tokens[1].span.start, 1);
    assert_eq!(tokens[1].span.end, 5);
    assert_eq!(tokens[3].span.start, 7);
}

#[test]
fn test_lex_unexpected_char() {
    let err = lex("(+ 1 #)").unwrap_err();
    assert_eq!(err.to_string(), "Unexpected character `#`");
    assert_eq!(err.span().offset(), 5);
}
