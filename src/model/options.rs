//! Option lists passed to builder operations

use super::Value;

/// An ordered list of `key => value` options for one element.
///
/// Keys are logical option keys (`default_measure`, `foreign_key`); they are
/// validated and normalized when the element is appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    entries: Vec<(String, Value)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Add the option only when a value is present.
    pub fn with_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return the last value given for `key`.
    pub(crate) fn take(&mut self, key: &str) -> Option<Value> {
        let mut taken = None;
        self.entries.retain(|(k, v)| {
            if k == key {
                taken = Some(v.clone());
                false
            } else {
                true
            }
        });
        taken
    }
}

/// Build an [`Options`] list: `options! { "alias" => "sales", "cache" => false }`
#[macro_export]
macro_rules! options {
    () => {
        $crate::model::Options::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::model::Options::new()$(.with($key, $value))+
    };
}
