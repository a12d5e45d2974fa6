//! Parser module for UCI configuration text
//!
//! This module provides the line lexer and the parser.

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, unquote, LexError, Location, Spanned, Token};
pub use parser::{parse, ParseError, Parser};
