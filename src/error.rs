//! Error types for olap-schema

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while defining, importing or rendering a schema
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unknown option `{key}` for {concept} at {path}")]
    UnknownOption {
        concept: &'static str,
        key: String,
        path: String,
    },

    #[error("Option `{key}` for {concept} at {path} expects {expected}")]
    InvalidOptionValue {
        concept: &'static str,
        key: String,
        expected: &'static str,
        path: String,
    },

    #[error("{child} is not allowed inside {parent} at {path}")]
    ChildNotAllowed {
        parent: &'static str,
        child: &'static str,
        path: String,
    },

    #[error("{concept} at {path} expects {expected} relation(s) (Table, View, InlineTable or Join), found {found}")]
    Cardinality {
        concept: &'static str,
        expected: String,
        found: usize,
        path: String,
    },

    #[error("Unknown element <{tag}> at {path}")]
    UnknownElement { tag: String, path: String },

    #[error("Unknown attribute `{attribute}` on <{tag}> at {path}")]
    UnknownAttribute {
        tag: String,
        attribute: String,
        path: String,
    },

    #[error("Unexpected text content in <{tag}> at {path}")]
    UnexpectedText { tag: String, path: String },

    #[error("Failed to parse schema document")]
    DocumentParse {
        #[source]
        source: roxmltree::Error,
    },

    #[error("Invalid raw XML fragment at {path}: {message}")]
    RawFragment { path: String, message: String },

    #[error("XML generation error")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to write XML output")]
    Io(#[from] std::io::Error),

    #[error("Rendered XML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to read schema file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl SchemaError {
    /// Errors raised while executing a definition or importing a document.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            SchemaError::UnknownOption { .. }
                | SchemaError::InvalidOptionValue { .. }
                | SchemaError::ChildNotAllowed { .. }
                | SchemaError::Cardinality { .. }
                | SchemaError::UnknownElement { .. }
                | SchemaError::UnknownAttribute { .. }
                | SchemaError::UnexpectedText { .. }
                | SchemaError::DocumentParse { .. }
        )
    }

    /// Errors raised while serializing an already defined tree.
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            SchemaError::RawFragment { .. }
                | SchemaError::Xml(_)
                | SchemaError::Io(_)
                | SchemaError::Utf8(_)
        )
    }
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
