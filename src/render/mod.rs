//! Serialize a node tree to XML text

mod fragment;
mod writer;

use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use tracing::debug;

use crate::casing::Driver;
use crate::error::Result;
use crate::model::Node;

pub use writer::{escape_attribute, escape_text};

/// Render-time configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target database driver; selects the default identifier casing
    pub driver: Option<Driver>,
    /// Explicit casing override, wins over `driver` in both directions
    pub upcase_data_dictionary: Option<bool>,
    /// Pretty-print with this many spaces per level; compact when `None`
    pub indent: Option<usize>,
}

impl RenderOptions {
    pub fn for_driver(driver: Driver) -> Self {
        Self {
            driver: Some(driver),
            ..Self::default()
        }
    }

    pub fn with_upcase_data_dictionary(mut self, upcase: bool) -> Self {
        self.upcase_data_dictionary = Some(upcase);
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
}

/// Render a complete document: declaration header followed by `root`.
///
/// Output is buffered and only returned once the whole tree has been written,
/// so a failure never yields a partial document.
pub fn render_document(root: &Node, indent: Option<usize>) -> Result<String> {
    let mut buffer = Vec::with_capacity(4096);
    {
        let mut xml_writer = match indent {
            Some(width) => Writer::new_with_indent(&mut buffer, b' ', width),
            None => Writer::new(&mut buffer),
        };

        // XML declaration
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

        writer::write_node(&mut xml_writer, root, &root.label())?;
    }

    debug!(bytes = buffer.len(), "rendered schema document");
    Ok(String::from_utf8(buffer)?)
}
