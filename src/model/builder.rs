//! Declarative builder vocabulary
//!
//! A [`Context`] is a cursor over the node currently being defined. Every
//! vocabulary operation validates its options against the concept registry,
//! appends exactly one child element in call order and hands back a
//! [`Context`] for that child, so nesting is expressed either with
//! `let` bindings or with [`Context::with`] blocks:
//!
//! ```
//! use olap_schema::{options, Options, RenderOptions, Schema};
//!
//! let schema = Schema::build(None, Options::new(), |s| {
//!     s.cube("Sales", Options::new())?.with(|c| {
//!         c.table("sales_fact", options! { "alias" => "sales" })?;
//!         c.measure("Unit Sales", options! { "column" => "unit_sales", "aggregator" => "sum" })?;
//!         Ok(())
//!     })
//! })
//! .unwrap();
//! assert!(schema.to_xml(&RenderOptions::default()).unwrap().contains("<Cube name=\"Sales\">"));
//! ```

use tracing::trace;

use crate::error::{Result, SchemaError};

use super::concept::{AttributeSpec, RelationCount};
use super::{Concept, Node, Options, Value};

/// Cursor over the node a declarative block appends to.
pub struct Context<'a> {
    node: &'a mut Node,
    concept: Concept,
    path: String,
}

/// Positional values are applied after explicit options so they take precedence.
fn positional(key: &str, value: &str, options: Options) -> Options {
    options.with(key, value)
}

fn expected_relations(count: RelationCount) -> String {
    if count.min == count.max {
        format!("exactly {}", count.min)
    } else if count.min == 0 {
        format!("at most {}", count.max)
    } else {
        format!("{} to {}", count.min, count.max)
    }
}

fn relation_count(node: &Node) -> usize {
    node.children
        .iter()
        .filter(|child| Concept::from_tag(&child.name).is_some_and(Concept::is_relation))
        .count()
}

impl<'a> Context<'a> {
    pub(crate) fn new(node: &'a mut Node, concept: Concept, path: String) -> Self {
        Self {
            node,
            concept,
            path,
        }
    }

    pub fn concept(&self) -> Concept {
        self.concept
    }

    pub fn node(&self) -> &Node {
        self.node
    }

    /// Slash-separated location of this node, e.g. `Schema/Cube[Sales]/Table`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run a nested definition block against this node.
    pub fn with<F>(mut self, block: F) -> Result<()>
    where
        F: FnOnce(&mut Context<'a>) -> Result<()>,
    {
        block(&mut self)
    }

    /// Set one option on the current node.
    ///
    /// Keys that the concept writes as text elements (`sql`, `formula`) append
    /// that element instead of setting an attribute.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let value = value.into();
        if let Some(text_concept) = self.concept.text_element(key) {
            self.append_text(text_concept, value.to_string(), Options::new())?;
            return Ok(self);
        }
        let attribute = self.resolve(key)?;
        self.node.set_attribute(attribute.attribute.as_str(), value);
        Ok(self)
    }

    /// Set an option only when a value is present.
    pub fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> Result<&mut Self> {
        match value {
            Some(value) => self.set(key, value),
            None => Ok(self),
        }
    }

    fn resolve(&self, key: &str) -> Result<&'static AttributeSpec> {
        self.concept
            .resolve_option(key)
            .ok_or_else(|| SchemaError::UnknownOption {
                concept: self.concept.tag(),
                key: key.to_string(),
                path: self.path.clone(),
            })
    }

    pub(crate) fn apply(&mut self, options: Options) -> Result<()> {
        for (key, value) in options.iter() {
            self.set(key, value.clone())?;
        }
        Ok(())
    }

    fn check_child(&self, child: Concept) -> Result<()> {
        if !self.concept.allows_child(child) {
            return Err(SchemaError::ChildNotAllowed {
                parent: self.concept.tag(),
                child: child.tag(),
                path: self.path.clone(),
            });
        }
        if child.is_relation() {
            if let Some(count) = self.concept.spec().relations {
                let found = relation_count(self.node);
                if found >= count.max {
                    return Err(SchemaError::Cardinality {
                        concept: self.concept.tag(),
                        expected: expected_relations(count),
                        found: found + 1,
                        path: self.path.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Append one element of `concept` with the given options.
    ///
    /// This is the generic operation behind every vocabulary method.
    pub fn append(&mut self, concept: Concept, options: Options) -> Result<Context<'_>> {
        self.check_child(concept)?;

        let mut node = Node::new(concept.tag());
        let label = options
            .iter()
            .filter(|(key, _)| *key == "name")
            .last()
            .and_then(|(_, value)| value.as_str())
            .map(|name| format!("{}[{}]", concept.tag(), name))
            .unwrap_or_else(|| concept.tag().to_string());
        let path = format!("{}/{}", self.path, label);

        Context::new(&mut node, concept, path.clone()).apply(options)?;
        trace!(path = %path, "appended element");

        self.node.children.push(node);
        let index = self.node.children.len() - 1;
        Ok(Context::new(&mut self.node.children[index], concept, path))
    }

    fn append_text(&mut self, concept: Concept, text: String, options: Options) -> Result<()> {
        let child = self.append(concept, options)?;
        child.node.text = Some(text);
        Ok(())
    }

    /// Splice literal XML after this node's declared children.
    ///
    /// The fragment bypasses option validation and identifier casing; it is
    /// checked for well-formedness when the schema is rendered.
    pub fn xml(&mut self, fragment: &str) -> Result<&mut Self> {
        self.node.push_raw_fragment(fragment);
        Ok(self)
    }

    // Cubes

    pub fn cube(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Cube, positional("name", name, options))
    }

    pub fn virtual_cube(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::VirtualCube, positional("name", name, options))
    }

    pub fn cube_usages(&mut self) -> Result<Context<'_>> {
        self.append(Concept::CubeUsages, Options::new())
    }

    pub fn cube_usage(&mut self, cube_name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::CubeUsage, positional("cube_name", cube_name, options))
    }

    pub fn virtual_cube_dimension(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(
            Concept::VirtualCubeDimension,
            positional("name", name, options),
        )
    }

    pub fn virtual_cube_measure(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::VirtualCubeMeasure, positional("name", name, options))
    }

    // Relations

    /// Append a `Table` relation. Without nested calls this is a leaf reference.
    pub fn table(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Table, positional("name", name, options))
    }

    pub fn view(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::View, options)
    }

    pub fn inline_table(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::InlineTable, options)
    }

    pub fn column_defs(&mut self) -> Result<Context<'_>> {
        self.append(Concept::ColumnDefs, Options::new())
    }

    pub fn column_def(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::ColumnDef, positional("name", name, options))
    }

    pub fn rows(&mut self) -> Result<Context<'_>> {
        self.append(Concept::Rows, Options::new())
    }

    pub fn row(&mut self) -> Result<Context<'_>> {
        self.append(Concept::Row, Options::new())
    }

    pub fn value(&mut self, column: &str, text: &str) -> Result<()> {
        self.append_text(
            Concept::RowValue,
            text.to_string(),
            Options::new().with("column", column),
        )
    }

    /// Append a `Join`. Its two relation children are, in order, the left
    /// and right side; either may be a nested join.
    pub fn join(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Join, options)
    }

    // Dimensions

    pub fn dimension(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Dimension, positional("name", name, options))
    }

    pub fn dimension_usage(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::DimensionUsage, positional("name", name, options))
    }

    pub fn hierarchy(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Hierarchy, options)
    }

    pub fn level(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Level, positional("name", name, options))
    }

    pub fn key_expression(&mut self) -> Result<Context<'_>> {
        self.append(Concept::KeyExpression, Options::new())
    }

    pub fn name_expression(&mut self) -> Result<Context<'_>> {
        self.append(Concept::NameExpression, Options::new())
    }

    pub fn caption_expression(&mut self) -> Result<Context<'_>> {
        self.append(Concept::CaptionExpression, Options::new())
    }

    pub fn ordinal_expression(&mut self) -> Result<Context<'_>> {
        self.append(Concept::OrdinalExpression, Options::new())
    }

    pub fn parent_expression(&mut self) -> Result<Context<'_>> {
        self.append(Concept::ParentExpression, Options::new())
    }

    pub fn closure(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Closure, options)
    }

    pub fn property(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Property, positional("name", name, options))
    }

    // Measures and calculations

    pub fn measure(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::Measure, positional("name", name, options))
    }

    pub fn measure_expression(&mut self) -> Result<Context<'_>> {
        self.append(Concept::MeasureExpression, Options::new())
    }

    pub fn calculated_member(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::CalculatedMember, positional("name", name, options))
    }

    pub fn calculated_member_property(
        &mut self,
        name: &str,
        options: Options,
    ) -> Result<Context<'_>> {
        self.append(
            Concept::CalculatedMemberProperty,
            positional("name", name, options),
        )
    }

    pub fn named_set(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::NamedSet, positional("name", name, options))
    }

    pub fn formula(&mut self, text: &str) -> Result<()> {
        self.append_text(Concept::Formula, text.to_string(), Options::new())
    }

    pub fn sql(&mut self, text: &str) -> Result<()> {
        self.append_text(Concept::Sql, text.to_string(), Options::new())
    }

    pub fn sql_dialect(&mut self, dialect: &str, text: &str) -> Result<()> {
        self.append_text(
            Concept::Sql,
            text.to_string(),
            Options::new().with("dialect", dialect),
        )
    }

    // Aggregate tables

    pub fn agg_name(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::AggName, positional("name", name, options))
    }

    pub fn agg_pattern(&mut self, pattern: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::AggPattern, positional("pattern", pattern, options))
    }

    pub fn agg_exclude(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::AggExclude, positional("name", name, options))
    }

    pub fn agg_fact_count(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::AggFactCount, options)
    }

    pub fn agg_ignore_column(&mut self, column: &str) -> Result<Context<'_>> {
        self.append(
            Concept::AggIgnoreColumn,
            Options::new().with("column", column),
        )
    }

    pub fn agg_foreign_key(&mut self, fact_column: &str, agg_column: &str) -> Result<Context<'_>> {
        self.append(
            Concept::AggForeignKey,
            Options::new()
                .with("fact_column", fact_column)
                .with("agg_column", agg_column),
        )
    }

    pub fn agg_measure(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::AggMeasure, positional("name", name, options))
    }

    pub fn agg_level(&mut self, name: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::AggLevel, positional("name", name, options))
    }

    // Annotations, access control, extensions

    pub fn annotations(&mut self) -> Result<Context<'_>> {
        self.append(Concept::Annotations, Options::new())
    }

    pub fn annotation(&mut self, name: &str, text: &str) -> Result<()> {
        self.append_text(
            Concept::Annotation,
            text.to_string(),
            Options::new().with("name", name),
        )
    }

    pub fn role(&mut self, name: &str) -> Result<Context<'_>> {
        self.append(Concept::Role, Options::new().with("name", name))
    }

    pub fn schema_grant(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::SchemaGrant, options)
    }

    pub fn cube_grant(&mut self, cube: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::CubeGrant, positional("cube", cube, options))
    }

    pub fn hierarchy_grant(&mut self, hierarchy: &str, options: Options) -> Result<Context<'_>> {
        self.append(
            Concept::HierarchyGrant,
            positional("hierarchy", hierarchy, options),
        )
    }

    pub fn member_grant(&mut self, member: &str, options: Options) -> Result<Context<'_>> {
        self.append(Concept::MemberGrant, positional("member", member, options))
    }

    pub fn user_defined_function(&mut self, name: &str, class_name: &str) -> Result<Context<'_>> {
        self.append(
            Concept::UserDefinedFunction,
            Options::new()
                .with("name", name)
                .with("class_name", class_name),
        )
    }

    pub fn cell_formatter(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::CellFormatter, options)
    }

    pub fn member_formatter(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::MemberFormatter, options)
    }

    pub fn property_formatter(&mut self, options: Options) -> Result<Context<'_>> {
        self.append(Concept::PropertyFormatter, options)
    }

    pub fn script(&mut self, language: &str, text: &str) -> Result<()> {
        self.append_text(
            Concept::Script,
            text.to_string(),
            Options::new().with("language", language),
        )
    }
}

/// Check child cardinality rules across a finished tree.
///
/// Upper bounds are enforced while appending; lower bounds (a `Join` needs
/// both sides) can only be checked once a definition pass has completed.
pub(crate) fn validate(node: &Node, concept: Concept, path: &str) -> Result<()> {
    if let Some(count) = concept.spec().relations {
        let found = relation_count(node);
        if found < count.min || found > count.max {
            return Err(SchemaError::Cardinality {
                concept: concept.tag(),
                expected: expected_relations(count),
                found,
                path: path.to_string(),
            });
        }
    }

    for child in &node.children {
        let child_path = format!("{}/{}", path, child.label());
        let child_concept =
            Concept::from_tag(&child.name).ok_or_else(|| SchemaError::UnknownElement {
                tag: child.name.clone(),
                path: child_path.clone(),
            })?;
        validate(child, child_concept, &child_path)?;
    }
    Ok(())
}
