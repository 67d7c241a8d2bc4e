//! Generic element tree

use std::collections::BTreeMap;
use std::fmt;

/// A scalar attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // Whole floats keep their `.0` so they stay distinct from integers
            Value::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// One XML element and its subtree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Element tag
    pub name: String,
    /// Attribute name -> value; iteration order is the render order
    pub attributes: BTreeMap<String, Value>,
    /// Child elements in declaration order
    pub children: Vec<Node>,
    /// Character content (SQL, formula bodies)
    pub text: Option<String>,
    /// Pre-formed XML written verbatim after `children`
    pub raw_fragment: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
            raw_fragment: None,
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.text = Some(text.into());
        node
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// Append literal XML to this node's raw fragment.
    pub fn push_raw_fragment(&mut self, fragment: &str) {
        match self.raw_fragment {
            Some(ref mut existing) => existing.push_str(fragment),
            None => self.raw_fragment = Some(fragment.to_string()),
        }
    }

    /// True when nothing would be written between start and end tags.
    pub fn has_content(&self) -> bool {
        !self.children.is_empty() || self.text.is_some() || self.raw_fragment.is_some()
    }

    /// Short label for error paths, e.g. `Cube[Sales]`
    pub fn label(&self) -> String {
        match self.attribute("name").and_then(Value::as_str) {
            Some(name) => format!("{}[{}]", self.name, name),
            None => self.name.clone(),
        }
    }
}
