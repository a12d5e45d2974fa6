//! UCI configuration codec for PassWall
//!
//! This crate parses OpenWrt UCI text into ordered sections, formats them
//! back, and applies the section-level edits used to manage PassWall nodes
//! and shunt rules.
//!
//! # Example
//!
//! ```rust
//! use uciwall_config::{Document, Section};
//!
//! let mut doc = Document::parse("config nodes 'A'\n\toption remarks 'x'").unwrap();
//! let rule = Section::new("shunt_rules", "R1")
//!     .unwrap()
//!     .with_option("network", "tcp,udp")
//!     .unwrap();
//! doc.append_section(rule);
//!
//! assert!(doc.to_string().ends_with("config shunt_rules 'R1'\n\toption network 'tcp,udp'"));
//! ```

pub mod adapter;
pub mod diagnostic;
pub mod document;
pub mod formatter;
pub mod parser;
pub mod section;

pub use adapter::JsonAdapter;
pub use diagnostic::render_parse_error;
pub use document::{Document, DocumentError, NodeSpec, ShuntBinding, NODE_SECTION_TYPE, SHUNT_PROXY_TAG};
pub use formatter::format;
pub use parser::{parse, unquote, LexError, Location, ParseError};
pub use section::{Options, Section, SectionError};

/// Any codec error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Section error: {0}")]
    Section(#[from] SectionError),

    #[error("{0}")]
    Document(#[from] DocumentError),
}
