//! UCI Parser
//!
//! Line-oriented parser that turns UCI text into an ordered list of sections.

use crate::parser::lexer::{is_word, tokenize, unquote, LexError, Location, Spanned, Token};
use crate::section::Section;
use thiserror::Error;

/// Parser error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Lexer error on line {line}: {source}")]
    Lex {
        line: usize,
        #[source]
        source: LexError,
    },

    #[error("Malformed section header on line {line}: expected `config <type> [name]`")]
    MalformedSectionHeader { line: usize, span: Location },
}

impl ParseError {
    /// 1-based line number of the error
    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex { line, .. } | ParseError::MalformedSectionHeader { line, .. } => *line,
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// A trimmed physical line and where it sits in the source
#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    number: usize,
    offset: usize,
    text: &'a str,
}

impl SourceLine<'_> {
    fn span(&self) -> Location {
        Location {
            start: self.offset,
            end: self.offset + self.text.len(),
        }
    }
}

/// Parser state
pub struct Parser<'a> {
    source: &'a str,
    sections: Vec<Section>,
    current: Option<Section>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            sections: Vec::new(),
            current: None,
        }
    }

    /// Parse the whole source. Sections are committed when the next
    /// `config` line or the end of input is reached.
    pub fn parse(mut self) -> ParseResult<Vec<Section>> {
        for line in lines(self.source) {
            if line.text.is_empty() || line.text.starts_with('#') {
                continue;
            }

            let tokens = tokenize(line.text).map_err(|source| ParseError::Lex {
                line: line.number,
                source,
            })?;

            match tokens.first().map(|t| &t.value) {
                Some(Token::Config) => {
                    let section = parse_header(&line, &tokens)?;
                    if let Some(done) = self.current.replace(section) {
                        self.sections.push(done);
                    }
                }
                Some(Token::Option) => self.parse_option(&line, &tokens),
                _ => {
                    tracing::trace!(line = line.number, "ignoring unrecognized line");
                }
            }
        }

        self.sections.extend(self.current.take());
        Ok(self.sections)
    }

    fn parse_option(&mut self, line: &SourceLine<'_>, tokens: &[Spanned<Token>]) {
        let Some(section) = self.current.as_mut() else {
            tracing::debug!(line = line.number, "ignoring option outside of a section");
            return;
        };

        // option <key> <value...>
        let (Some(key), Some(value)) = (tokens.get(1), tokens.get(2)) else {
            tracing::debug!(line = line.number, "ignoring option line without key and value");
            return;
        };

        let key = slice(line.text, key.span);
        if !is_word(key) {
            tracing::debug!(line = line.number, key, "ignoring option with non-word key");
            return;
        }

        let value = unquote(&line.text[value.span.start..]);
        section.insert_raw(key.to_string(), value.to_string());
    }
}

fn parse_header(line: &SourceLine<'_>, tokens: &[Spanned<Token>]) -> ParseResult<Section> {
    let Some(section_type) = tokens.get(1) else {
        return Err(ParseError::MalformedSectionHeader {
            line: line.number,
            span: line.span(),
        });
    };

    let section_type = slice(line.text, section_type.span).to_string();
    let name = tokens
        .get(2)
        .map(|t| unquote(slice(line.text, t.span)).to_string())
        .unwrap_or_default();

    Ok(Section::from_parts(section_type, name))
}

fn slice(text: &str, span: Location) -> &str {
    &text[span.start..span.end]
}

/// Physical lines, trimmed, with 1-based numbers and byte offsets of the
/// trimmed text in the source.
fn lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    let mut offset = 0;
    source.split('\n').enumerate().map(move |(i, raw)| {
        let start = offset;
        offset += raw.len() + 1;

        let text = raw.trim();
        let lead = raw.len() - raw.trim_start().len();
        SourceLine {
            number: i + 1,
            offset: start + lead,
            text,
        }
    })
}

/// Parse UCI text into an ordered list of sections
pub fn parse(source: &str) -> ParseResult<Vec<Section>> {
    Parser::new(source).parse()
}
