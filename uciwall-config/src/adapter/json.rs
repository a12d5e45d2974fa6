//! JSON document adapter
//!
//! JSON shape is a list of `{ "type", "name", "options" }` objects, the same
//! shape the management API accepted for sections.

use crate::document::Document;
use crate::section::Section;

/// JSON document adapter
pub struct JsonAdapter;

impl JsonAdapter {
    /// Parse a JSON array of sections. Every section is validated.
    pub fn parse(input: &str) -> Result<Document, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Parse a single JSON section object
    pub fn parse_section(input: &str) -> Result<Section, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Serialize a document to pretty JSON
    pub fn serialize(document: &Document) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(document)
    }
}
