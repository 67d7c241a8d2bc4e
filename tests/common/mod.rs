//! Common test utilities for olap-schema tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use olap_schema::{Context, Options, RenderOptions, Result, Schema};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Define an unnamed schema with no root options.
pub fn define<F>(block: F) -> Schema
where
    F: FnOnce(&mut Context<'_>) -> Result<()>,
{
    Schema::build(None, Options::new(), block).expect("definition should succeed")
}

/// Render with default options, asserting the fixed declaration header.
pub fn render(schema: &Schema) -> String {
    render_with(schema, &RenderOptions::default())
}

pub fn render_with(schema: &Schema, options: &RenderOptions) -> String {
    let xml = schema.to_xml(options).expect("render should succeed");
    assert!(
        xml.starts_with(XML_DECLARATION),
        "document should start with the XML declaration: {}",
        xml
    );
    xml
}

/// Compare two documents element by element.
///
/// Child order and attribute values must match exactly; attribute order is
/// normalized and whitespace-only text between elements is ignored.
pub fn assert_xml_equivalent(actual: &str, expected: &str) {
    assert_eq!(canonical_lines(expected), canonical_lines(actual));
}

fn canonical_lines(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml.trim())
        .unwrap_or_else(|e| panic!("not well-formed XML ({}):\n{}", e, xml));
    let mut lines = Vec::new();
    push_element(doc.root_element(), 0, &mut lines);
    lines
}

fn push_element(node: roxmltree::Node<'_, '_>, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let mut attributes: Vec<String> = node
        .attributes()
        .map(|a| format!(" {}={:?}", a.name(), a.value()))
        .collect();
    attributes.sort();
    lines.push(format!(
        "{}<{}{}>",
        indent,
        node.tag_name().name(),
        attributes.concat()
    ));

    for child in node.children() {
        if child.is_element() {
            push_element(child, depth + 1, lines);
        } else if let Some(text) = child.text() {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(format!("{}  {:?}", indent, text));
            }
        }
    }
    lines.push(format!("{}</{}>", indent, node.tag_name().name()));
}

/// Temporary directory holding schema files for file-based tests
pub struct SchemaDir {
    /// Kept to prevent temp directory cleanup until SchemaDir is dropped
    _temp_dir: TempDir,
    pub path: PathBuf,
}

impl SchemaDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }

    /// Write a file and return its path
    pub fn write(&self, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path.join(name);
        fs::write(&path, content).expect("Failed to write schema file");
        path
    }

    pub fn pattern(&self, glob: &str) -> String {
        self.path.join(glob).to_string_lossy().into_owned()
    }
}
