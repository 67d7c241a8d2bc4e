//! Schema tree, concept registry and the declarative builder

mod builder;
mod concept;
mod import;
mod node;
mod options;
mod schema;

pub use builder::Context;
pub use concept::{AttributeSpec, Concept, ConceptSpec, RelationCount};
pub use node::{Node, Value};
pub use options::Options;
pub use schema::{Schema, DEFAULT_SCHEMA_NAME};
