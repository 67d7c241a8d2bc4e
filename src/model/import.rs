//! Read an existing schema document back into a node tree

use roxmltree::{Document, NodeType};
use tracing::{debug, instrument};

use crate::error::{Result, SchemaError};

use super::{Concept, Node, Value};

/// Parse `xml` into a tree rooted at `Schema`.
///
/// Every element must be a known concept allowed under its parent and every
/// attribute must be recognized for its element. Attribute values come back
/// as strings; whitespace-only text between elements is ignored.
#[instrument(skip_all, fields(bytes = xml.len()))]
pub(crate) fn import_document(xml: &str) -> Result<Node> {
    let doc = Document::parse(xml).map_err(|source| SchemaError::DocumentParse { source })?;
    let root = doc.root_element();
    let tag = root.tag_name().name();

    if Concept::from_tag(tag) != Some(Concept::Schema) {
        return Err(SchemaError::UnknownElement {
            tag: tag.to_string(),
            path: String::new(),
        });
    }

    let node = import_element(root, Concept::Schema, Concept::Schema.tag())?;
    debug!(children = node.children.len(), "imported schema document");
    Ok(node)
}

fn import_element(element: roxmltree::Node<'_, '_>, concept: Concept, path: &str) -> Result<Node> {
    let mut node = Node::new(concept.tag());

    for attr in element.attributes() {
        let spec = concept
            .attribute(attr.name())
            .ok_or_else(|| SchemaError::UnknownAttribute {
                tag: concept.tag().to_string(),
                attribute: attr.name().to_string(),
                path: path.to_string(),
            })?;
        node.set_attribute(spec.attribute.as_str(), Value::from(attr.value()));
    }

    let mut text = String::new();
    for child in element.children() {
        match child.node_type() {
            NodeType::Element => {
                let tag = child.tag_name().name();
                let child_concept =
                    Concept::from_tag(tag).ok_or_else(|| SchemaError::UnknownElement {
                        tag: tag.to_string(),
                        path: path.to_string(),
                    })?;
                if !concept.allows_child(child_concept) {
                    return Err(SchemaError::ChildNotAllowed {
                        parent: concept.tag(),
                        child: child_concept.tag(),
                        path: path.to_string(),
                    });
                }
                let child_path = match child.attribute("name") {
                    Some(name) => format!("{}/{}[{}]", path, tag, name),
                    None => format!("{}/{}", path, tag),
                };
                node.children
                    .push(import_element(child, child_concept, &child_path)?);
            }
            NodeType::Text => {
                let content = child.text().unwrap_or_default();
                if concept.spec().holds_text {
                    text.push_str(content);
                } else if !content.trim().is_empty() {
                    return Err(SchemaError::UnexpectedText {
                        tag: concept.tag().to_string(),
                        path: path.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    // Body text is kept verbatim; `<SQL/>` and `<SQL></SQL>` both import as empty
    if concept.spec().holds_text {
        node.text = Some(text);
    }
    Ok(node)
}
