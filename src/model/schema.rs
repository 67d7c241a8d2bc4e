//! Schema root: definition, validation and rendering entry point

use tracing::{debug, info, instrument};

use crate::casing::{should_upcase, upcase_identifiers};
use crate::error::{Result, SchemaError};
use crate::render::{render_document, RenderOptions};

use super::builder::{validate, Context};
use super::import::import_document;
use super::{Concept, Node, Options, Value};

/// Name emitted for a schema with content but no explicit name
pub const DEFAULT_SCHEMA_NAME: &str = "default";

/// Definition-time key that controls casing instead of becoming an attribute
const UPCASE_DATA_DICTIONARY: &str = "upcase_data_dictionary";

/// A schema definition: the root `Schema` node plus root-level options.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: Node,
    upcase_data_dictionary: Option<bool>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            root: Node::new(Concept::Schema.tag()),
            upcase_data_dictionary: None,
        }
    }
}

impl Schema {
    /// An empty schema; renders as `<Schema/>`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and define a schema in one step.
    pub fn build<F>(name: Option<&str>, options: Options, block: F) -> Result<Self>
    where
        F: FnOnce(&mut Context<'_>) -> Result<()>,
    {
        let mut schema = Self::new();
        schema.define(name, options, block)?;
        Ok(schema)
    }

    /// Run a definition pass against this schema.
    ///
    /// `options` may carry root attributes (`description`, ...) and the
    /// `upcase_data_dictionary` override. The pass is all-or-nothing: on error
    /// the schema is left as it was.
    #[instrument(skip_all, fields(name = name.unwrap_or(DEFAULT_SCHEMA_NAME)))]
    pub fn define<F>(&mut self, name: Option<&str>, mut options: Options, block: F) -> Result<()>
    where
        F: FnOnce(&mut Context<'_>) -> Result<()>,
    {
        let upcase = match options.take(UPCASE_DATA_DICTIONARY) {
            Some(Value::Bool(flag)) => Some(flag),
            Some(_) => {
                return Err(SchemaError::InvalidOptionValue {
                    concept: Concept::Schema.tag(),
                    key: UPCASE_DATA_DICTIONARY.to_string(),
                    expected: "a boolean",
                    path: root_path(),
                })
            }
            None => self.upcase_data_dictionary,
        };

        let mut root = self.root.clone();
        {
            let mut ctx = Context::new(&mut root, Concept::Schema, root_path());
            ctx.apply(options)?;
            if let Some(name) = name {
                ctx.set("name", name)?;
            }
            block(&mut ctx)?;
        }

        if root.attribute("name").is_none() && root.has_content() {
            root.set_attribute("name", Value::from(DEFAULT_SCHEMA_NAME));
        }

        validate(&root, Concept::Schema, &root_path())?;
        debug!(
            children = root.children.len(),
            upcase_data_dictionary = ?upcase,
            "schema defined"
        );

        self.root = root;
        self.upcase_data_dictionary = upcase;
        Ok(())
    }

    /// Parse an existing schema document into a definition.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = import_document(xml)?;
        validate(&root, Concept::Schema, &root_path())?;
        Ok(Self {
            root,
            upcase_data_dictionary: None,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn upcase_data_dictionary(&self) -> Option<bool> {
        self.upcase_data_dictionary
    }

    /// Whether identifiers will be upper-cased for these render options.
    pub fn upcases_for(&self, options: &RenderOptions) -> bool {
        let explicit = options
            .upcase_data_dictionary
            .or(self.upcase_data_dictionary);
        should_upcase(options.driver.as_ref(), explicit)
    }

    /// Render the schema to an XML document.
    ///
    /// Casing is applied to a copy of the tree, so rendering never changes
    /// the definition and repeated renders are independent.
    #[instrument(skip_all, fields(driver = ?options.driver))]
    pub fn to_xml(&self, options: &RenderOptions) -> Result<String> {
        if self.upcases_for(options) {
            let mut root = self.root.clone();
            let rewritten = upcase_identifiers(&mut root);
            info!(rewritten, "upper-cased identifier attributes");
            render_document(&root, options.indent)
        } else {
            render_document(&self.root, options.indent)
        }
    }
}

fn root_path() -> String {
    Concept::Schema.tag().to_string()
}
