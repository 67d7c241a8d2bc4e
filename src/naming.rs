//! Attribute name normalization.
//!
//! Definitions use logical, underscore- or space-separated option keys
//! (`default_measure`, `foreign_key`). The XML consumer expects lowerCamel
//! attribute names (`defaultMeasure`, `foreignKey`). A handful of keys do not
//! follow the mechanical rule and are registered in [`ATTRIBUTE_NAME_EXCEPTIONS`].

use inflector::Inflector;

use crate::model::Node;

/// Keys whose attribute name is not the mechanical lowerCamel form.
///
/// The consumer spells these attributes as single lower-case words.
pub const ATTRIBUTE_NAME_EXCEPTIONS: &[(&str, &str)] = &[
    ("ignore_case", "ignorecase"),
    ("data_type", "datatype"),
];

/// Convert a logical option key into its XML attribute name.
pub fn attribute_name(key: &str) -> String {
    let trimmed = key.trim();
    if let Some((_, name)) = ATTRIBUTE_NAME_EXCEPTIONS
        .iter()
        .find(|(exception, _)| *exception == trimmed)
    {
        return (*name).to_string();
    }
    trimmed.to_camel_case()
}

/// Attributes of a node in render order: ascending, case-sensitive ASCII by name.
pub fn canonical_attributes(node: &Node) -> Vec<(&str, String)> {
    // BTreeMap<String, _> already iterates in byte order
    node.attributes
        .iter()
        .map(|(name, value)| (name.as_str(), value.to_string()))
        .collect()
}
