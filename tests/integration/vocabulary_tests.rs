//! Virtual cubes, inline tables, closures, access control and the other
//! less common schema elements

use olap_schema::{options, Driver, Options, RenderOptions, Schema};

use crate::common::{assert_xml_equivalent, define, render, render_with};

#[test]
fn test_shared_dimension_and_usage() {
    let schema = define(|s| {
        s.dimension("Store", options! { "type" => "StandardDimension" })?
            .hierarchy(options! { "has_all" => true, "primary_key" => "store_id" })?
            .with(|h| {
                h.table("store", Options::new())?;
                h.level("Store Country", options! { "column" => "store_country", "unique_members" => true })?;
                Ok(())
            })?;
        s.cube("Sales", Options::new())?.with(|c| {
            c.table("sales_fact_1997", Options::new())?;
            c.dimension_usage("Store", options! { "source" => "Store", "foreign_key" => "store_id" })?;
            Ok(())
        })
    });
    assert_xml_equivalent(
        &render(&schema),
        r#"<?xml version="1.0"?>
        <Schema name="default">
          <Dimension name="Store" type="StandardDimension">
            <Hierarchy hasAll="true" primaryKey="store_id">
              <Table name="store"/>
              <Level column="store_country" name="Store Country" uniqueMembers="true"/>
            </Hierarchy>
          </Dimension>
          <Cube name="Sales">
            <Table name="sales_fact_1997"/>
            <DimensionUsage foreignKey="store_id" name="Store" source="Store"/>
          </Cube>
        </Schema>"#,
    );
}

#[test]
fn test_virtual_cube() {
    let schema = define(|s| {
        s.virtual_cube("Warehouse and Sales", options! { "default_measure" => "Store Sales" })?
            .with(|v| {
                v.cube_usages()?.with(|u| {
                    u.cube_usage("Sales", options! { "ignore_unrelated_dimensions" => true })?;
                    u.cube_usage("Warehouse", Options::new())?;
                    Ok(())
                })?;
                v.virtual_cube_dimension("Product", options! { "cube_name" => "Sales" })?;
                v.virtual_cube_measure("[Measures].[Store Sales]", options! { "cube_name" => "Sales" })?;
                v.calculated_member("Profit Per Unit", options! { "dimension" => "Measures" })?
                    .formula("[Measures].[Profit] / [Measures].[Units Shipped]")?;
                Ok(())
            })
    });
    assert_xml_equivalent(
        &render(&schema),
        r#"<?xml version="1.0"?>
        <Schema name="default">
          <VirtualCube defaultMeasure="Store Sales" name="Warehouse and Sales">
            <CubeUsages>
              <CubeUsage cubeName="Sales" ignoreUnrelatedDimensions="true"/>
              <CubeUsage cubeName="Warehouse"/>
            </CubeUsages>
            <VirtualCubeDimension cubeName="Sales" name="Product"/>
            <VirtualCubeMeasure cubeName="Sales" name="[Measures].[Store Sales]"/>
            <CalculatedMember dimension="Measures" name="Profit Per Unit">
              <Formula>[Measures].[Profit] / [Measures].[Units Shipped]</Formula>
            </CalculatedMember>
          </VirtualCube>
        </Schema>"#,
    );
}

#[test]
fn test_inline_table() {
    let schema = define(|s| {
        s.cube("Sales", Options::new())?
            .dimension("Severity", Options::new())?
            .hierarchy(options! { "has_all" => true, "primary_key" => "severity_id" })?
            .with(|h| {
                h.inline_table(options! { "alias" => "severity" })?.with(|t| {
                    t.column_defs()?.with(|defs| {
                        defs.column_def("id", options! { "type" => "Numeric" })?;
                        defs.column_def("desc", options! { "type" => "String" })?;
                        Ok(())
                    })?;
                    t.rows()?.with(|rows| {
                        for (id, desc) in [("1", "High"), ("2", "Medium")] {
                            rows.row()?.with(|row| {
                                row.value("id", id)?;
                                row.value("desc", desc)?;
                                Ok(())
                            })?;
                        }
                        Ok(())
                    })
                })?;
                h.level("Severity", options! { "column" => "id", "name_column" => "desc" })?;
                Ok(())
            })
    });
    assert_xml_equivalent(
        &render(&schema),
        r#"<?xml version="1.0"?>
        <Schema name="default">
          <Cube name="Sales">
            <Dimension name="Severity">
              <Hierarchy hasAll="true" primaryKey="severity_id">
                <InlineTable alias="severity">
                  <ColumnDefs>
                    <ColumnDef name="id" type="Numeric"/>
                    <ColumnDef name="desc" type="String"/>
                  </ColumnDefs>
                  <Rows>
                    <Row><Value column="id">1</Value><Value column="desc">High</Value></Row>
                    <Row><Value column="id">2</Value><Value column="desc">Medium</Value></Row>
                  </Rows>
                </InlineTable>
                <Level column="id" name="Severity" nameColumn="desc"/>
              </Hierarchy>
            </Dimension>
          </Cube>
        </Schema>"#,
    );
}

#[test]
fn test_level_expressions_and_closure() {
    let schema = define(|s| {
        s.cube("HR", Options::new())?
            .dimension("Employees", options! { "foreign_key" => "employee_id" })?
            .hierarchy(options! { "has_all" => true, "primary_key" => "employee_id" })?
            .with(|h| {
                h.table("employee", Options::new())?;
                h.level(
                    "Employee Id",
                    options! { "column" => "employee_id", "parent_column" => "supervisor_id" },
                )?
                .with(|l| {
                    l.name_expression()?
                        .sql_dialect("generic", "full_name || ' (' || employee_id || ')'")?;
                    l.closure(options! { "parent_column" => "supervisor_id", "child_column" => "employee_id" })?
                        .table("employee_closure", Options::new())?;
                    Ok(())
                })
            })
    });
    let xml = render(&schema);
    assert!(xml.contains(
        r#"<NameExpression><SQL dialect="generic">full_name || ' (' || employee_id || ')'</SQL></NameExpression>"#
    ));
    assert!(xml.contains(
        r#"<Closure childColumn="employee_id" parentColumn="supervisor_id"><Table name="employee_closure"/></Closure>"#
    ));

    let oracle = render_with(&schema, &RenderOptions::for_driver(Driver::Oracle));
    assert!(oracle.contains(r#"<Closure childColumn="EMPLOYEE_ID" parentColumn="SUPERVISOR_ID">"#));
    assert!(oracle.contains("full_name || ' (' || employee_id || ')'"));
}

#[test]
fn test_empty_closure_fails_validation() {
    let err = Schema::build(None, Options::new(), |s| {
        s.cube("HR", Options::new())?
            .dimension("Employees", Options::new())?
            .hierarchy(Options::new())?
            .level("Employee Id", Options::new())?
            .closure(options! { "parent_column" => "supervisor_id" })?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(
        err,
        olap_schema::SchemaError::Cardinality { concept: "Closure", found: 0, .. }
    ));
}

#[test]
fn test_roles_and_grants() {
    let schema = define(|s| {
        s.role("California manager")?
            .schema_grant(options! { "access" => "none" })?
            .cube_grant("Sales", options! { "access" => "all" })?
            .hierarchy_grant(
                "[Store]",
                options! { "access" => "custom", "top_level" => "[Store].[Store Country]" },
            )?
            .member_grant("[Store].[USA].[CA]", options! { "access" => "all" })?;
        Ok(())
    });
    assert_xml_equivalent(
        &render(&schema),
        r#"<?xml version="1.0"?>
        <Schema name="default">
          <Role name="California manager">
            <SchemaGrant access="none">
              <CubeGrant access="all" cube="Sales">
                <HierarchyGrant access="custom" hierarchy="[Store]" topLevel="[Store].[Store Country]">
                  <MemberGrant access="all" member="[Store].[USA].[CA]"/>
                </HierarchyGrant>
              </CubeGrant>
            </SchemaGrant>
          </Role>
        </Schema>"#,
    );
}

#[test]
fn test_annotations_named_sets_and_functions() {
    let schema = define(|s| {
        s.annotations()?.annotation("author", "Ops & Analytics")?;
        s.named_set("Top Sellers", Options::new())?
            .set("formula", "TopCount([Product].[Product Name].Members, 5)")?;
        s.user_defined_function("PlusOne", "com.example.PlusOneUdf")?;
        s.user_defined_function("Twice", "")?
            .script("JavaScript", "return arguments[0] * 2;")?;
        Ok(())
    });
    assert_xml_equivalent(
        &render(&schema),
        r#"<?xml version="1.0"?>
        <Schema name="default">
          <Annotations>
            <Annotation name="author">Ops &amp; Analytics</Annotation>
          </Annotations>
          <NamedSet name="Top Sellers">
            <Formula>TopCount([Product].[Product Name].Members, 5)</Formula>
          </NamedSet>
          <UserDefinedFunction className="com.example.PlusOneUdf" name="PlusOne"/>
          <UserDefinedFunction className="" name="Twice">
            <Script language="JavaScript">return arguments[0] * 2;</Script>
          </UserDefinedFunction>
        </Schema>"#,
    );
}

#[test]
fn test_formatters() {
    let schema = define(|s| {
        s.cube("Sales", Options::new())?.with(|c| {
            c.measure("Unit Sales", options! { "column" => "unit_sales", "aggregator" => "sum" })?
                .cell_formatter(options! { "class_name" => "com.example.UnitFormatter" })?;
            c.dimension("Store", Options::new())?
                .hierarchy(Options::new())?
                .level("Store Name", options! { "column" => "store_name" })?
                .with(|l| {
                    l.member_formatter(options! { "class_name" => "com.example.StoreFormatter" })?;
                    l.property("Store Sqft", options! { "column" => "store_sqft", "type" => "Numeric" })?
                        .property_formatter(options! { "class_name" => "com.example.SqftFormatter" })?;
                    Ok(())
                })
        })
    });
    let xml = render(&schema);
    assert!(xml.contains(r#"<CellFormatter className="com.example.UnitFormatter"/>"#));
    assert!(xml.contains(r#"<MemberFormatter className="com.example.StoreFormatter"/>"#));
    assert!(xml.contains(
        r#"<Property column="store_sqft" name="Store Sqft" type="Numeric"><PropertyFormatter className="com.example.SqftFormatter"/></Property>"#
    ));
}

#[test]
fn test_measure_data_type_uses_exception_spelling() {
    let schema = define(|s| {
        s.cube("Sales", Options::new())?.measure(
            "Store Count",
            options! { "column" => "store_id", "aggregator" => "distinct-count", "data_type" => "Integer" },
        )?;
        Ok(())
    });
    assert!(render(&schema).contains(
        r#"<Measure aggregator="distinct-count" column="store_id" datatype="Integer" name="Store Count"/>"#
    ));
}

#[test]
fn test_indented_output() {
    let schema = Schema::build(Some("FoodMart"), Options::new(), |s| {
        s.cube("Sales", Options::new())?
            .table("sales_fact_1997", Options::new())?;
        Ok(())
    })
    .unwrap();
    let xml = render_with(&schema, &RenderOptions::default().with_indent(2));
    assert_eq!(
        xml,
        concat!(
            "<?xml version=\"1.0\"?>\n",
            "<Schema name=\"FoodMart\">\n",
            "  <Cube name=\"Sales\">\n",
            "    <Table name=\"sales_fact_1997\"/>\n",
            "  </Cube>\n",
            "</Schema>"
        )
    );
}

#[test]
fn test_repeated_renders_are_identical() {
    let schema = define(|s| {
        s.cube("Sales", options! { "enabled" => true, "cache" => false, "description" => "x" })?;
        Ok(())
    });
    let first = render(&schema);
    assert_eq!(first, render(&schema));
    let oracle = RenderOptions::for_driver(Driver::Oracle);
    assert_eq!(render_with(&schema, &oracle), render_with(&schema, &oracle));
}
