//! Diagnostic reporting with source locations
//!
//! Language-level failures are values (see [`crate::interp::LispError`]).
//! This module covers the host side: source text that cannot be read.

use crate::common::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    /// Source typed at the prompt or passed on the command line
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self::new("<input>", content)
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Failure to turn source text into values
#[derive(Error, Debug, Diagnostic)]
pub enum ReadError {
    #[error("Unexpected character `{found}`")]
    #[diagnostic(code(read::unexpected_char))]
    UnexpectedChar {
        found: char,
        #[label("not valid in a number or symbol")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected `{found}`")]
    #[diagnostic(code(read::unexpected_token), help("remove the unmatched delimiter"))]
    UnexpectedToken {
        found: String,
        #[label("no matching opening delimiter")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unclosed `{delimiter}`")]
    #[diagnostic(code(read::unclosed_delimiter))]
    UnclosedDelimiter {
        delimiter: String,
        #[label("opened here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
        #[help]
        help: Option<String>,
    },

    #[error("Expected an expression after `'`")]
    #[diagnostic(code(read::dangling_quote))]
    DanglingQuote {
        #[label("nothing to quote")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

impl ReadError {
    pub fn unexpected_char(found: char, span: Span, source: &SourceFile) -> Self {
        ReadError::UnexpectedChar {
            found,
            span: span.into(),
            src: source.to_named_source(),
        }
    }

    pub fn unexpected_token(found: &str, span: Span, source: &SourceFile) -> Self {
        ReadError::UnexpectedToken {
            found: found.to_string(),
            span: span.into(),
            src: source.to_named_source(),
        }
    }

    pub fn unclosed(delimiter: &str, closer: &str, span: Span, source: &SourceFile) -> Self {
        ReadError::UnclosedDelimiter {
            delimiter: delimiter.to_string(),
            span: span.into(),
            src: source.to_named_source(),
            help: Some(format!("add a closing `{}`", closer)),
        }
    }

    pub fn dangling_quote(span: Span, source: &SourceFile) -> Self {
        ReadError::DanglingQuote {
            span: span.into(),
            src: source.to_named_source(),
        }
    }

    /// Location of the problem in the source
    pub fn span(&self) -> SourceSpan {
        match self {
            ReadError::UnexpectedChar { span, .. }
            | ReadError::UnexpectedToken { span, .. }
            | ReadError::UnclosedDelimiter { span, .. }
            | ReadError::DanglingQuote { span, .. } => *span,
        }
    }
}
