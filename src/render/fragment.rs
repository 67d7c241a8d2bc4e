//! Splice pre-formed XML fragments into the output stream

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use std::io::Write;

use crate::error::{Result, SchemaError};

fn fragment_error(path: &str, position: u64, message: impl std::fmt::Display) -> SchemaError {
    SchemaError::RawFragment {
        path: path.to_string(),
        message: format!("{} (at byte {})", message, position),
    }
}

/// Replay the events of `fragment` into `writer`.
///
/// The fragment must be a sequence of well-formed elements: text outside an
/// element, declarations and doctypes are rejected. Markup and entity
/// references are copied without re-escaping; whitespace between elements is
/// dropped so the output follows the writer's own formatting.
pub(crate) fn splice<W: Write>(writer: &mut Writer<W>, fragment: &str, path: &str) -> Result<()> {
    let mut reader = Reader::from_str(fragment);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| fragment_error(path, position, e))?;
        match event {
            Event::Eof => break,
            Event::Decl(_) => {
                return Err(fragment_error(path, position, "XML declaration not allowed"))
            }
            Event::DocType(_) => {
                return Err(fragment_error(path, position, "DOCTYPE not allowed"))
            }
            Event::Start(e) => {
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                if depth == 0 {
                    return Err(fragment_error(path, position, "unmatched end tag"));
                }
                depth -= 1;
                writer.write_event(Event::End(e))?;
            }
            Event::Text(e) if depth == 0 => {
                if e.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(fragment_error(path, position, "text outside of an element"));
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err(fragment_error(path, position, "CDATA outside of an element"));
            }
            other => writer.write_event(other)?,
        }
    }

    if depth != 0 {
        return Err(fragment_error(
            path,
            fragment.len() as u64,
            format!("{} unclosed element(s)", depth),
        ));
    }
    Ok(())
}
