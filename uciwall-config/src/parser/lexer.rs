//! Line lexer for UCI configuration text
//!
//! Tokenizes a single (already trimmed) line of an OpenWrt UCI file.
//!
//! Key features:
//! - `config` and `option` keywords
//! - Everything else is a whitespace-delimited word
//! - Spans are byte offsets into the line, so callers can slice the raw
//!   remainder of a line (option values keep their inner whitespace)

use logos::{Logos, Span};
use std::fmt;

/// Source location for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

/// A token with its location in the line
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Location,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: impl Into<Location>) -> Self {
        Self {
            value,
            span: span.into(),
        }
    }
}

/// Token types for one UCI line
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"[ \t\f\r\n]+", logos::skip)]
    Whitespace,

    /// `config` keyword, opens a section
    #[token("config")]
    Config,

    /// `option` keyword, a key/value line inside a section
    #[token("option")]
    Option,

    /// Any whitespace-delimited run, quotes included
    #[regex(r"[^ \t\f\r\n]+", |lex| lex.slice().to_string())]
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Config => write!(f, "config"),
            Token::Option => write!(f, "option"),
            Token::Word(s) => write!(f, "{}", s),
            Token::Whitespace => write!(f, " "),
        }
    }
}

/// Lexer result type
pub type LexResult = Result<Vec<Spanned<Token>>, LexError>;

/// Lexer error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character at position {position}")]
    UnexpectedChar { position: usize },
}

/// Tokenize one line of UCI text
pub fn tokenize(line: &str) -> LexResult {
    let lexer = Token::lexer(line);
    let mut tokens = Vec::new();

    for (result, span) in lexer.spanned() {
        match result {
            Ok(Token::Whitespace) => continue,
            Ok(token) => tokens.push(Spanned::new(token, span)),
            Err(_) => return Err(LexError::UnexpectedChar { position: span.start }),
        }
    }

    Ok(tokens)
}

/// Strip one layer of surrounding quote characters.
///
/// Each end is handled on its own: a leading `'` or `"` is dropped, then a
/// trailing `'` or `"` is dropped. The two need not match.
pub fn unquote(raw: &str) -> &str {
    let s = raw.strip_prefix(['\'', '"']).unwrap_or(raw);
    s.strip_suffix(['\'', '"']).unwrap_or(s)
}

/// True for a non-empty run of word characters (alphanumeric or `_`)
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<Token> {
        tokenize(line).unwrap().into_iter().map(|s| s.value).collect()
    }

    #[test]
    fn test_config_header() {
        assert_eq!(
            values("config nodes 'abc'"),
            vec![
                Token::Config,
                Token::Word("nodes".to_string()),
                Token::Word("'abc'".to_string()),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_a_word() {
        assert_eq!(values("configure x"), vec![
            Token::Word("configure".to_string()),
            Token::Word("x".to_string()),
        ]);
        assert_eq!(values("options"), vec![Token::Word("options".to_string())]);
    }

    #[test]
    fn test_spans_allow_slicing_the_rest() {
        let line = "option remarks 'hello   world'";
        let tokens = tokenize(line).unwrap();
        assert_eq!(tokens[0].value, Token::Option);
        assert_eq!(tokens[1].value, Token::Word("remarks".to_string()));
        assert_eq!(&line[tokens[2].span.start..], "'hello   world'");
    }

    #[test]
    fn test_tabs_separate_tokens() {
        let tokens = tokenize("option\tport\t443").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].span, Location { start: 12, end: 15 });
    }

    #[test]
    fn test_unquote_one_layer() {
        assert_eq!(unquote("'abc'"), "abc");
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("'abc\""), "abc");
        assert_eq!(unquote("''abc''"), "'abc'");
        assert_eq!(unquote("abc'"), "abc");
        assert_eq!(unquote("'"), "");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("plain"), "plain");
    }

    #[test]
    fn test_is_word() {
        assert!(is_word("tcp_guise"));
        assert!(is_word("tcpMptcp"));
        assert!(!is_word(""));
        assert!(!is_word("foo-bar"));
        assert!(!is_word("k'"));
    }
}
