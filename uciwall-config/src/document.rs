//! Parsed configuration document and the section-level edits applied to it
//!
//! A [`Document`] is built fresh from text on every read, edited in memory,
//! and formatted back whole. Every edit either applies completely or leaves
//! the document untouched.

use crate::formatter::format;
use crate::parser::{parse, ParseError};
use crate::section::{check_keys, Options, Section, SectionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Section type PassWall uses for proxy nodes
pub const NODE_SECTION_TYPE: &str = "nodes";

/// Proxy tag written next to every shunt rule binding
pub const SHUNT_PROXY_TAG: &str = "main";

/// Document edit errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Section not found: type={section_type:?} name={name:?}")]
    SectionNotFound { section_type: String, name: String },

    #[error("Node name {name:?} already exists")]
    DuplicateNodeName { name: String },

    #[error(transparent)]
    Section(#[from] SectionError),
}

type DocumentResult<T> = Result<T, DocumentError>;

/// Binds a shunt rule to a proxy node on a shunt `nodes` section.
///
/// Applying it sets `fenliu_<suffix> = proxy_node` and
/// `fenliu_<suffix>_proxy_tag = main` on the first `nodes` section named
/// `node_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuntBinding {
    pub node_name: String,
    pub suffix: String,
    pub proxy_node: String,
}

impl ShuntBinding {
    pub fn option_key(&self) -> String {
        format!("fenliu_{}", self.suffix)
    }

    pub fn tag_key(&self) -> String {
        format!("fenliu_{}_proxy_tag", self.suffix)
    }
}

/// User-supplied fields of a new trojan node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub remarks: String,
    pub address: String,
    pub port: String,
    pub password: String,
}

impl NodeSpec {
    /// Build the `nodes` section with the fixed Xray/trojan template
    pub fn to_section(&self) -> Result<Section, SectionError> {
        Section::new(NODE_SECTION_TYPE, self.name.as_str())?
            .with_option("remarks", self.remarks.as_str())?
            .with_option("type", "Xray")?
            .with_option("protocol", "trojan")?
            .with_option("address", self.address.as_str())?
            .with_option("port", self.port.as_str())?
            .with_option("password", self.password.as_str())?
            .with_option("tls", "0")?
            .with_option("transport", "raw")?
            .with_option("tcp_guise", "none")?
            .with_option("tcpMptcp", "0")?
            .with_option("tcpNoDelay", "0")
    }
}

/// Ordered sequence of sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse UCI text
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            sections: parse(source)?,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// First section matching type and name
    pub fn find(&self, section_type: &str, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.matches(section_type, name))
    }

    /// All sections of one type, in document order
    pub fn of_type<'a>(&'a self, section_type: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections
            .iter()
            .filter(move |s| s.section_type() == section_type)
    }

    /// Append a section at the end. No duplicate check.
    pub fn append_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Append a section, then bind a shunt rule on the first matching
    /// `nodes` section. The scan runs after the append, so the new section
    /// itself can be the target.
    ///
    /// Returns whether a target node was found.
    pub fn append_with_shunt(&mut self, section: Section, shunt: Option<&ShuntBinding>) -> bool {
        self.append_section(section);

        let Some(shunt) = shunt else {
            return false;
        };

        let target = self
            .sections
            .iter_mut()
            .find(|s| s.matches(NODE_SECTION_TYPE, &shunt.node_name));

        match target {
            Some(node) => {
                tracing::info!(
                    node = %shunt.node_name,
                    rule = %shunt.option_key(),
                    proxy = %shunt.proxy_node,
                    "binding shunt rule"
                );
                node.insert_raw(shunt.option_key(), shunt.proxy_node.clone());
                node.insert_raw(shunt.tag_key(), SHUNT_PROXY_TAG.to_string());
                true
            }
            None => {
                tracing::warn!(node = %shunt.node_name, "shunt node not found, binding skipped");
                false
            }
        }
    }

    /// Remove every section matching type and name.
    ///
    /// Returns how many were removed.
    pub fn delete_section(&mut self, section_type: &str, name: &str) -> DocumentResult<usize> {
        let before = self.sections.len();
        self.sections.retain(|s| !s.matches(section_type, name));
        let removed = before - self.sections.len();

        if removed == 0 {
            return Err(not_found(section_type, name));
        }
        Ok(removed)
    }

    /// Merge `options` into every section matching type and name.
    ///
    /// Returns how many sections were updated.
    pub fn update_section(
        &mut self,
        section_type: &str,
        name: &str,
        options: &Options,
    ) -> DocumentResult<usize> {
        // A bad key must not leave some matches updated and others not.
        check_keys(options)?;

        let mut updated = 0;
        for section in self.sections.iter_mut().filter(|s| s.matches(section_type, name)) {
            section.merge_options(options)?;
            updated += 1;
        }

        if updated == 0 {
            return Err(not_found(section_type, name));
        }
        Ok(updated)
    }

    /// Append a new trojan node, refusing names already used by a `nodes`
    /// section.
    pub fn add_node(&mut self, spec: &NodeSpec) -> DocumentResult<&Section> {
        let section = spec.to_section()?;

        if self.find(NODE_SECTION_TYPE, &spec.name).is_some() {
            return Err(DocumentError::DuplicateNodeName {
                name: spec.name.clone(),
            });
        }

        self.append_section(section);
        Ok(&self.sections[self.sections.len() - 1])
    }
}

fn not_found(section_type: &str, name: &str) -> DocumentError {
    DocumentError::SectionNotFound {
        section_type: section_type.to_string(),
        name: name.to_string(),
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(&self.sections))
    }
}

impl From<Vec<Section>> for Document {
    fn from(sections: Vec<Section>) -> Self {
        Self { sections }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(section_type: &str, name: &str) -> Section {
        Section::new(section_type, name).unwrap()
    }

    fn options(pairs: &[(&str, &str)]) -> Options {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn spec(name: &str) -> NodeSpec {
        NodeSpec {
            name: name.to_string(),
            remarks: "HK 01".to_string(),
            address: "203.0.113.7".to_string(),
            port: "443".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_add_then_format() {
        let mut doc = Document::parse("config nodes 'A'\n\toption remarks 'x'").unwrap();
        let rule = section("shunt_rules", "R1").with_option("network", "tcp,udp").unwrap();
        doc.append_section(rule);

        assert_eq!(
            doc.to_string(),
            "config nodes 'A'\n\toption remarks 'x'\n\nconfig shunt_rules 'R1'\n\toption network 'tcp,udp'"
        );
    }

    #[test]
    fn test_append_allows_duplicates() {
        let mut doc = Document::new();
        doc.append_section(section("x", "y"));
        doc.append_section(section("x", "y"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_delete_all_matches() {
        let mut doc = Document::from(vec![section("x", "y"), section("x", "z"), section("x", "y")]);

        assert_eq!(doc.delete_section("x", "y").unwrap(), 2);
        assert_eq!(doc.len(), 1);
        assert!(doc.sections()[0].matches("x", "z"));

        assert_eq!(
            doc.delete_section("q", "r"),
            Err(DocumentError::SectionNotFound {
                section_type: "q".to_string(),
                name: "r".to_string(),
            })
        );
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_update_multiple_matches() {
        let mut doc = Document::from(vec![
            section("nodes", "N").with_option("a", "1").unwrap(),
            section("nodes", "M"),
            section("nodes", "N"),
        ]);

        let updated = doc.update_section("nodes", "N", &options(&[("k", "v"), ("a", "2")])).unwrap();
        assert_eq!(updated, 2);

        let first = &doc.sections()[0];
        let keys: Vec<&str> = first.options().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "k"]);
        assert_eq!(first.option("a"), Some("2"));
        assert_eq!(doc.sections()[2].option("k"), Some("v"));
        assert_eq!(doc.sections()[1].option("k"), None);
    }

    #[test]
    fn test_update_not_found() {
        let mut doc = Document::from(vec![section("nodes", "N")]);
        assert!(matches!(
            doc.update_section("nodes", "missing", &options(&[("k", "v")])),
            Err(DocumentError::SectionNotFound { .. })
        ));
    }

    #[test]
    fn test_update_bad_key_leaves_document_untouched() {
        let mut doc = Document::from(vec![section("nodes", "N"), section("nodes", "N")]);
        let before = doc.clone();
        assert!(matches!(
            doc.update_section("nodes", "N", &options(&[("ok", "1"), ("bad key", "2")])),
            Err(DocumentError::Section(SectionError::InvalidOptionKey { .. }))
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_add_node_template() {
        let mut doc = Document::new();
        let node = doc.add_node(&spec("n1")).unwrap();

        let pairs: Vec<(&str, &str)> = node
            .options()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("remarks", "HK 01"),
                ("type", "Xray"),
                ("protocol", "trojan"),
                ("address", "203.0.113.7"),
                ("port", "443"),
                ("password", "secret"),
                ("tls", "0"),
                ("transport", "raw"),
                ("tcp_guise", "none"),
                ("tcpMptcp", "0"),
                ("tcpNoDelay", "0"),
            ]
        );
    }

    #[test]
    fn test_add_node_duplicate_guard() {
        let mut doc = Document::new();
        doc.add_node(&spec("dup")).unwrap();
        let after_first = doc.clone();

        assert_eq!(
            doc.add_node(&spec("dup")).unwrap_err(),
            DocumentError::DuplicateNodeName { name: "dup".to_string() }
        );
        assert_eq!(doc, after_first);
    }

    #[test]
    fn test_add_node_ignores_other_section_types() {
        let mut doc = Document::from(vec![section("shunt_rules", "dup")]);
        assert!(doc.add_node(&spec("dup")).is_ok());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_shunt_binding_first_match_wins() {
        let mut doc = Document::from(vec![
            section("nodes", "other"),
            section("nodes", "Shunt").with_option("fenliu_ssh", "old").unwrap(),
            section("nodes", "Shunt"),
        ]);
        let binding = ShuntBinding {
            node_name: "Shunt".to_string(),
            suffix: "ssh".to_string(),
            proxy_node: "Dah2TR22".to_string(),
        };

        let rule = section("shunt_rules", "fenliu_ssh").with_option("network", "tcp,udp").unwrap();
        assert!(doc.append_with_shunt(rule, Some(&binding)));

        assert_eq!(doc.len(), 4);
        let first = &doc.sections()[1];
        assert_eq!(first.option("fenliu_ssh"), Some("Dah2TR22"));
        assert_eq!(first.option("fenliu_ssh_proxy_tag"), Some("main"));
        assert_eq!(doc.sections()[2].option("fenliu_ssh"), None);
        assert!(doc.sections()[3].matches("shunt_rules", "fenliu_ssh"));
    }

    #[test]
    fn test_shunt_binding_missing_node() {
        let mut doc = Document::from(vec![section("nodes", "a")]);
        let binding = ShuntBinding {
            node_name: "nope".to_string(),
            suffix: "x".to_string(),
            proxy_node: "p".to_string(),
        };
        assert!(!doc.append_with_shunt(section("shunt_rules", "r"), Some(&binding)));
        assert_eq!(doc.len(), 2);
        assert!(doc.sections()[0].options().is_empty());
    }

    #[test]
    fn test_shunt_binding_can_target_appended_section() {
        let mut doc = Document::new();
        let binding = ShuntBinding {
            node_name: "fresh".to_string(),
            suffix: "x".to_string(),
            proxy_node: "p".to_string(),
        };
        assert!(doc.append_with_shunt(section("nodes", "fresh"), Some(&binding)));
        assert_eq!(doc.sections()[0].option("fenliu_x"), Some("p"));
    }

    #[test]
    fn test_of_type() {
        let doc = Document::from(vec![section("nodes", "a"), section("acl", "b"), section("nodes", "c")]);
        let names: Vec<&str> = doc.of_type("nodes").map(Section::name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
