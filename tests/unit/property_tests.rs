//! Property-based tests for rendering determinism

use olap_schema::model::{Node, Value};
use olap_schema::render::render_document;
use olap_schema::{options, Driver, Options, RenderOptions, Schema};
use proptest::prelude::*;

/// Names starting with `x` are avoided so `xmlns` is never generated
fn attribute_name() -> impl Strategy<Value = String> {
    "[a-wA-Z][a-zA-Z0-9]{0,8}"
}

fn attribute_value() -> impl Strategy<Value = String> {
    "[ -~]{0,12}"
}

proptest! {
    #[test]
    fn attribute_order_is_independent_of_insertion(
        attributes in prop::collection::btree_map(attribute_name(), attribute_value(), 0..8)
    ) {
        let pairs: Vec<(String, String)> = attributes.into_iter().collect();

        let mut forward = Node::new("Element");
        for (k, v) in &pairs {
            forward.set_attribute(k.as_str(), Value::from(v));
        }
        let mut backward = Node::new("Element");
        for (k, v) in pairs.iter().rev() {
            backward.set_attribute(k.as_str(), Value::from(v));
        }

        let a = render_document(&forward, None).unwrap();
        let b = render_document(&backward, None).unwrap();
        prop_assert_eq!(&a, &b);

        let doc = roxmltree::Document::parse(&a).unwrap();
        let names: Vec<&str> = doc.root_element().attributes().map(|a| a.name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(names, sorted);
    }

    #[test]
    fn attribute_values_survive_escaping(value in attribute_value()) {
        let mut node = Node::new("Schema");
        node.set_attribute("description", Value::from(value.as_str()));
        let xml = render_document(&node, None).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        prop_assert_eq!(doc.root_element().attribute("description"), Some(value.as_str()));
    }

    #[test]
    fn text_survives_escaping(text in "[ -~]{1,40}") {
        let xml = render_document(&Node::with_text("SQL", text.as_str()), None).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        prop_assert_eq!(doc.root_element().text(), Some(text.as_str()));
    }

    #[test]
    fn rendering_is_repeatable(
        table in "[a-z_]{1,12}",
        alias in "[a-z_]{1,12}",
        oracle in any::<bool>(),
    ) {
        let schema = Schema::build(None, Options::new(), |s| {
            s.cube("Sales", Options::new())?
                .table(&table, options! { "alias" => alias.as_str() })?;
            Ok(())
        })
        .unwrap();
        let options = if oracle {
            RenderOptions::for_driver(Driver::Oracle)
        } else {
            RenderOptions::default()
        };
        let first = schema.to_xml(&options).unwrap();
        prop_assert_eq!(&first, &schema.to_xml(&options).unwrap());

        let expected_table = if oracle { table.to_uppercase() } else { table.clone() };
        let expected_name = format!("name=\"{}\"", expected_table);
        prop_assert!(first.contains(&expected_name));
    }
}
