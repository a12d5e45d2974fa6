//! Read-modify-write operations on a stored PassWall configuration
//!
//! Every operation reads the whole text, parses it, applies one edit and
//! writes the whole formatted text back. Nothing is written when parsing or
//! the edit fails.

use crate::error::Result;
use crate::store::ConfigStore;
use uciwall_config::{Document, NodeSpec, Options, Section, ShuntBinding};

/// PassWall configuration manager
pub struct ConfigManager<S> {
    store: S,
}

impl<S: ConfigStore> ConfigManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Raw stored text
    pub fn read_raw(&self) -> Result<String> {
        Ok(self.store.read()?)
    }

    /// Parsed document
    pub fn load(&self) -> Result<Document> {
        let content = self.store.read()?;
        Ok(Document::parse(&content)?)
    }

    /// Append a section, optionally binding a shunt rule on a node.
    ///
    /// Returns whether the shunt node was found (false when no binding was
    /// given).
    pub fn add_section(&self, section: Section, shunt: Option<&ShuntBinding>) -> Result<bool> {
        let mut doc = self.load()?;
        tracing::info!(
            section_type = section.section_type(),
            name = section.name(),
            store = %self.store.describe(),
            "adding section"
        );
        let bound = doc.append_with_shunt(section, shunt);
        self.save(&doc)?;
        Ok(bound)
    }

    /// Remove every section matching type and name
    pub fn delete_section(&self, section_type: &str, name: &str) -> Result<usize> {
        let mut doc = self.load()?;
        let removed = doc.delete_section(section_type, name)?;
        tracing::info!(section_type, name, removed, "deleted section");
        self.save(&doc)?;
        Ok(removed)
    }

    /// Merge options into every section matching type and name
    pub fn update_section(&self, section_type: &str, name: &str, options: &Options) -> Result<usize> {
        let mut doc = self.load()?;
        let updated = doc.update_section(section_type, name, options)?;
        tracing::info!(section_type, name, updated, "updated section");
        self.save(&doc)?;
        Ok(updated)
    }

    /// Append a trojan node; fails if the node name is taken
    pub fn add_node(&self, spec: &NodeSpec) -> Result<Section> {
        let mut doc = self.load()?;
        let node = doc.add_node(spec)?.clone();
        tracing::info!(name = %spec.name, address = %spec.address, "added node");
        self.save(&doc)?;
        Ok(node)
    }

    /// Rewrite the stored text in canonical form.
    ///
    /// Returns whether the text changed.
    pub fn reformat(&self) -> Result<bool> {
        let content = self.store.read()?;
        let doc = Document::parse(&content)?;
        let formatted = doc.to_string();

        if formatted == content.trim() {
            return Ok(false);
        }
        self.store.write(&formatted)?;
        Ok(true)
    }

    fn save(&self, doc: &Document) -> Result<()> {
        self.store.write(&doc.to_string())?;
        tracing::debug!(sections = doc.len(), store = %self.store.describe(), "configuration written");
        Ok(())
    }
}
