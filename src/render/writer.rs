//! Low-level element writing

use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;

use crate::error::Result;
use crate::model::Node;
use crate::naming::canonical_attributes;

use super::fragment;

/// Escape a string for use in an XML attribute value.
///
/// - `&` becomes `&amp;`
/// - `<` becomes `&lt;`
/// - `>` becomes `&gt;`
/// - `"` becomes `&quot;`
/// - CR and LF become `&#xD;` and `&#xA;` so they survive attribute normalization
pub fn escape_attribute(s: &str) -> String {
    // & must be first
    let escaped = s
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
    escaped.replace('\r', "&#xD;").replace('\n', "&#xA;")
}

/// Escape character content: `&`, `<` and `>` only.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    partial_escape(s)
}

/// Write one node and its subtree.
///
/// Attributes come out in canonical order. A node without children, text or
/// raw fragment collapses to `<Name .../>`.
pub(crate) fn write_node<W: Write>(
    writer: &mut Writer<W>,
    node: &Node,
    path: &str,
) -> Result<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (name, value) in canonical_attributes(node) {
        // Pre-escaped, so push raw bytes to avoid double escaping
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(&value).into_bytes()),
        });
    }

    if !node.has_content() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(ref text) = node.text {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    }

    for child in &node.children {
        let child_path = format!("{}/{}", path, child.label());
        write_node(writer, child, &child_path)?;
    }

    if let Some(ref raw) = node.raw_fragment {
        fragment::splice(writer, raw, path)?;
    }

    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}
