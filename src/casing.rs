//! Identifier casing policy
//!
//! Some database drivers store unquoted identifiers in upper case. When a
//! schema targets one of them, every identifier-class attribute (table,
//! alias, database schema, column and key names) is upper-cased before
//! rendering. Display names, formulas, SQL text and raw fragments are never
//! touched.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::model::{Concept, Node, Value};

/// Target database driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Driver {
    Oracle,
    LucidDb,
    Postgres,
    Mysql,
    SqlServer,
    Other(String),
}

/// Driver families that share identifier-casing behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFamily {
    /// Oracle: unquoted identifiers fold to upper case
    Oracle,
    /// Columnar appliances (LucidDB): upper-case data dictionary
    ColumnarAppliance,
    Generic,
}

impl FromStr for Driver {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "oracle" => Driver::Oracle,
            "luciddb" => Driver::LucidDb,
            "postgres" | "postgresql" => Driver::Postgres,
            "mysql" => Driver::Mysql,
            "sqlserver" | "mssql" => Driver::SqlServer,
            other => Driver::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Oracle => f.write_str("oracle"),
            Driver::LucidDb => f.write_str("luciddb"),
            Driver::Postgres => f.write_str("postgresql"),
            Driver::Mysql => f.write_str("mysql"),
            Driver::SqlServer => f.write_str("sqlserver"),
            Driver::Other(name) => f.write_str(name),
        }
    }
}

impl Driver {
    pub fn family(&self) -> DriverFamily {
        match self {
            Driver::Oracle => DriverFamily::Oracle,
            Driver::LucidDb => DriverFamily::ColumnarAppliance,
            _ => DriverFamily::Generic,
        }
    }
}

/// Decide whether identifier values must be upper-cased.
///
/// An explicit override wins in both directions; otherwise only the Oracle
/// and columnar appliance families upcase.
pub fn should_upcase(driver: Option<&Driver>, explicit_override: Option<bool>) -> bool {
    match explicit_override {
        Some(forced) => forced,
        None => matches!(
            driver.map(Driver::family),
            Some(DriverFamily::Oracle | DriverFamily::ColumnarAppliance)
        ),
    }
}

/// Upper-case identifier-class attribute values across a tree, in place.
///
/// Returns the number of attribute values rewritten.
pub fn upcase_identifiers(node: &mut Node) -> usize {
    let mut rewritten = 0;
    if let Some(concept) = Concept::from_tag(&node.name) {
        for (name, value) in node.attributes.iter_mut() {
            if !concept.is_identifier(name) {
                continue;
            }
            if let Value::Str(s) = value {
                s.make_ascii_uppercase();
                rewritten += 1;
            }
        }
    }
    for child in node.children.iter_mut() {
        rewritten += upcase_identifiers(child);
    }
    rewritten
}
