//! UCI section model
//!
//! One `config <type> [name]` block and its options.

use crate::parser::lexer::is_word;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered option map. Re-assigning a key keeps its first position.
pub type Options = IndexMap<String, String>;

/// Section validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("Invalid section type {section_type:?}: must be a non-empty token without whitespace or quotes")]
    InvalidSectionType { section_type: String },

    #[error("Invalid section name {name:?}: must not contain whitespace or quotes")]
    InvalidSectionName { name: String },

    #[error("Invalid option key {key:?}: must be word characters only")]
    InvalidOptionKey { key: String },
}

/// A single configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct Section {
    #[serde(rename = "type")]
    section_type: String,
    name: String,
    options: Options,
}

impl Section {
    /// Create an empty section, validating type and name.
    ///
    /// An empty `name` makes an anonymous section.
    pub fn new(
        section_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, SectionError> {
        let section_type = section_type.into();
        let name = name.into();

        if section_type.is_empty()
            || section_type.starts_with('#')
            || section_type.chars().any(is_reserved)
        {
            return Err(SectionError::InvalidSectionType { section_type });
        }
        if name.chars().any(is_reserved) {
            return Err(SectionError::InvalidSectionName { name });
        }

        Ok(Self::from_parts(section_type, name))
    }

    /// Build a section from tokens already split by the parser.
    pub(crate) fn from_parts(section_type: String, name: String) -> Self {
        Self {
            section_type,
            name,
            options: Options::new(),
        }
    }

    /// Builder-style [`Section::set_option`]
    pub fn with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, SectionError> {
        self.set_option(key, value)?;
        Ok(self)
    }

    pub fn section_type(&self) -> &str {
        &self.section_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Set an option, overwriting in place if the key already exists.
    /// Returns the previous value.
    pub fn set_option(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, SectionError> {
        let key = key.into();
        if !is_word(&key) {
            return Err(SectionError::InvalidOptionKey { key });
        }
        Ok(self.options.insert(key, value.into()))
    }

    /// Merge options into this section: existing keys are overwritten,
    /// new keys are appended in iteration order.
    pub fn merge_options(&mut self, options: &Options) -> Result<(), SectionError> {
        check_keys(options)?;
        for (key, value) in options {
            self.options.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    pub fn remove_option(&mut self, key: &str) -> Option<String> {
        self.options.shift_remove(key)
    }

    /// True when both type and name match exactly.
    pub fn matches(&self, section_type: &str, name: &str) -> bool {
        self.section_type == section_type && self.name == name
    }

    /// Parser path: no key validation, the raw text is taken as-is.
    pub(crate) fn insert_raw(&mut self, key: String, value: String) {
        self.options.insert(key, value);
    }
}

/// Reject the first key that is not a word
pub(crate) fn check_keys(options: &Options) -> Result<(), SectionError> {
    match options.keys().find(|k| !is_word(k)) {
        Some(bad) => Err(SectionError::InvalidOptionKey { key: bad.clone() }),
        None => Ok(()),
    }
}

fn is_reserved(c: char) -> bool {
    c.is_whitespace() || c == '\'' || c == '"'
}

/// Wire shape used for deserialization, checked on conversion
#[derive(Deserialize)]
struct RawSection {
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    options: Options,
}

impl TryFrom<RawSection> for Section {
    type Error = SectionError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let mut section = Section::new(raw.section_type, raw.name)?;
        section.merge_options(&raw.options)?;
        Ok(section)
    }
}
