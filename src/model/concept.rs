//! Schema concept registry
//!
//! Every element the builder can emit is described by a static [`ConceptSpec`]:
//! its tag, the option keys it recognizes, which of those keys name physical
//! database objects (identifier-class attributes), which keys are written as
//! text sub-elements, and which child concepts may appear beneath it.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::naming::attribute_name;

/// A kind of schema element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concept {
    Schema,
    Cube,
    VirtualCube,
    CubeUsages,
    CubeUsage,
    VirtualCubeDimension,
    VirtualCubeMeasure,
    Table,
    View,
    InlineTable,
    ColumnDefs,
    ColumnDef,
    Rows,
    Row,
    RowValue,
    Join,
    Dimension,
    DimensionUsage,
    Hierarchy,
    Level,
    KeyExpression,
    NameExpression,
    CaptionExpression,
    OrdinalExpression,
    ParentExpression,
    MeasureExpression,
    Closure,
    Property,
    Measure,
    CalculatedMember,
    CalculatedMemberProperty,
    NamedSet,
    Formula,
    Sql,
    AggName,
    AggPattern,
    AggExclude,
    AggFactCount,
    AggIgnoreColumn,
    AggForeignKey,
    AggMeasure,
    AggLevel,
    Annotations,
    Annotation,
    Role,
    SchemaGrant,
    CubeGrant,
    HierarchyGrant,
    MemberGrant,
    UserDefinedFunction,
    CellFormatter,
    MemberFormatter,
    PropertyFormatter,
    Script,
}

/// Bounds on the number of relation children (Table, View, InlineTable, Join)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationCount {
    pub min: usize,
    pub max: usize,
}

/// Static description of one concept
#[derive(Debug)]
pub struct ConceptSpec {
    pub tag: &'static str,
    /// Recognized option keys, in declaration form
    pub options: &'static [&'static str],
    /// Subset of `options` whose values name database objects
    pub identifiers: &'static [&'static str],
    /// Keys written as a text-bearing child element instead of an attribute
    pub text_elements: &'static [(&'static str, Concept)],
    /// Whether the element itself carries character content
    pub holds_text: bool,
    pub children: &'static [Concept],
    pub relations: Option<RelationCount>,
}

/// A recognized option with its normalized attribute name
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub key: &'static str,
    pub attribute: String,
    pub identifier: bool,
}

const RELATIONS: &[Concept] = &[
    Concept::Table,
    Concept::View,
    Concept::InlineTable,
    Concept::Join,
];

const AGG_COLUMNS: &[Concept] = &[
    Concept::AggFactCount,
    Concept::AggIgnoreColumn,
    Concept::AggForeignKey,
    Concept::AggMeasure,
    Concept::AggLevel,
];

const SQL_ONLY: &[Concept] = &[Concept::Sql];
const SQL_ELEMENT: &[(&str, Concept)] = &[("sql", Concept::Sql)];
const FORMULA_ELEMENT: &[(&str, Concept)] = &[("formula", Concept::Formula)];
const SCRIPT_ONLY: &[Concept] = &[Concept::Script];

const fn spec(tag: &'static str, options: &'static [&'static str]) -> ConceptSpec {
    ConceptSpec {
        tag,
        options,
        identifiers: &[],
        text_elements: &[],
        holds_text: false,
        children: &[],
        relations: None,
    }
}

static SCHEMA: ConceptSpec = ConceptSpec {
    children: &[
        Concept::Annotations,
        Concept::Dimension,
        Concept::Cube,
        Concept::VirtualCube,
        Concept::NamedSet,
        Concept::Role,
        Concept::UserDefinedFunction,
    ],
    ..spec(
        "Schema",
        &["name", "description", "measures_caption", "default_role"],
    )
};

static CUBE: ConceptSpec = ConceptSpec {
    children: &[
        Concept::Annotations,
        Concept::Table,
        Concept::View,
        Concept::InlineTable,
        Concept::Dimension,
        Concept::DimensionUsage,
        Concept::Measure,
        Concept::CalculatedMember,
        Concept::NamedSet,
    ],
    relations: Some(RelationCount { min: 0, max: 1 }),
    ..spec(
        "Cube",
        &[
            "name",
            "caption",
            "description",
            "default_measure",
            "cache",
            "enabled",
            "visible",
        ],
    )
};

static VIRTUAL_CUBE: ConceptSpec = ConceptSpec {
    children: &[
        Concept::Annotations,
        Concept::CubeUsages,
        Concept::VirtualCubeDimension,
        Concept::VirtualCubeMeasure,
        Concept::CalculatedMember,
        Concept::NamedSet,
    ],
    ..spec(
        "VirtualCube",
        &[
            "name",
            "caption",
            "description",
            "default_measure",
            "enabled",
            "visible",
        ],
    )
};

static CUBE_USAGES: ConceptSpec = ConceptSpec {
    children: &[Concept::CubeUsage],
    ..spec("CubeUsages", &[])
};

static CUBE_USAGE: ConceptSpec = spec("CubeUsage", &["cube_name", "ignore_unrelated_dimensions"]);

static VIRTUAL_CUBE_DIMENSION: ConceptSpec = spec("VirtualCubeDimension", &["cube_name", "name"]);

static VIRTUAL_CUBE_MEASURE: ConceptSpec = ConceptSpec {
    children: &[Concept::Annotations],
    ..spec("VirtualCubeMeasure", &["cube_name", "name", "visible"])
};

static TABLE: ConceptSpec = ConceptSpec {
    identifiers: &["name", "schema", "alias"],
    text_elements: SQL_ELEMENT,
    children: &[
        Concept::Sql,
        Concept::AggExclude,
        Concept::AggName,
        Concept::AggPattern,
    ],
    ..spec("Table", &["name", "schema", "alias"])
};

static VIEW: ConceptSpec = ConceptSpec {
    identifiers: &["alias"],
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("View", &["alias"])
};

static INLINE_TABLE: ConceptSpec = ConceptSpec {
    identifiers: &["alias"],
    children: &[Concept::ColumnDefs, Concept::Rows],
    ..spec("InlineTable", &["alias"])
};

static COLUMN_DEFS: ConceptSpec = ConceptSpec {
    children: &[Concept::ColumnDef],
    ..spec("ColumnDefs", &[])
};

static COLUMN_DEF: ConceptSpec = ConceptSpec {
    identifiers: &["name"],
    ..spec("ColumnDef", &["name", "type"])
};

static ROWS: ConceptSpec = ConceptSpec {
    children: &[Concept::Row],
    ..spec("Rows", &[])
};

static ROW: ConceptSpec = ConceptSpec {
    children: &[Concept::RowValue],
    ..spec("Row", &[])
};

static ROW_VALUE: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    holds_text: true,
    ..spec("Value", &["column"])
};

static JOIN: ConceptSpec = ConceptSpec {
    identifiers: &["left_alias", "left_key", "right_alias", "right_key"],
    children: RELATIONS,
    relations: Some(RelationCount { min: 2, max: 2 }),
    ..spec(
        "Join",
        &["left_alias", "left_key", "right_alias", "right_key"],
    )
};

static DIMENSION: ConceptSpec = ConceptSpec {
    identifiers: &["foreign_key", "usage_prefix"],
    children: &[Concept::Annotations, Concept::Hierarchy],
    ..spec(
        "Dimension",
        &[
            "name",
            "caption",
            "description",
            "type",
            "foreign_key",
            "usage_prefix",
            "visible",
            "high_cardinality",
        ],
    )
};

static DIMENSION_USAGE: ConceptSpec = ConceptSpec {
    identifiers: &["foreign_key", "usage_prefix"],
    children: &[Concept::Annotations],
    ..spec(
        "DimensionUsage",
        &[
            "name",
            "caption",
            "description",
            "source",
            "level",
            "usage_prefix",
            "foreign_key",
            "visible",
        ],
    )
};

static HIERARCHY: ConceptSpec = ConceptSpec {
    identifiers: &["primary_key", "primary_key_table"],
    children: &[
        Concept::Annotations,
        Concept::Table,
        Concept::View,
        Concept::InlineTable,
        Concept::Join,
        Concept::Level,
    ],
    relations: Some(RelationCount { min: 0, max: 1 }),
    ..spec(
        "Hierarchy",
        &[
            "name",
            "caption",
            "description",
            "has_all",
            "all_member_name",
            "all_member_caption",
            "all_level_name",
            "default_member",
            "primary_key",
            "primary_key_table",
            "unique_key_level_name",
            "visible",
        ],
    )
};

static LEVEL: ConceptSpec = ConceptSpec {
    identifiers: &[
        "table",
        "column",
        "name_column",
        "ordinal_column",
        "parent_column",
        "caption_column",
    ],
    children: &[
        Concept::Annotations,
        Concept::KeyExpression,
        Concept::NameExpression,
        Concept::CaptionExpression,
        Concept::OrdinalExpression,
        Concept::ParentExpression,
        Concept::Closure,
        Concept::Property,
        Concept::MemberFormatter,
    ],
    ..spec(
        "Level",
        &[
            "name",
            "caption",
            "description",
            "table",
            "column",
            "name_column",
            "ordinal_column",
            "parent_column",
            "caption_column",
            "null_parent_value",
            "type",
            "internal_type",
            "approx_row_count",
            "unique_members",
            "level_type",
            "hide_member_if",
            "formatter",
            "visible",
        ],
    )
};

static KEY_EXPRESSION: ConceptSpec = ConceptSpec {
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("KeyExpression", &[])
};

static NAME_EXPRESSION: ConceptSpec = ConceptSpec {
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("NameExpression", &[])
};

static CAPTION_EXPRESSION: ConceptSpec = ConceptSpec {
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("CaptionExpression", &[])
};

static ORDINAL_EXPRESSION: ConceptSpec = ConceptSpec {
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("OrdinalExpression", &[])
};

static PARENT_EXPRESSION: ConceptSpec = ConceptSpec {
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("ParentExpression", &[])
};

static MEASURE_EXPRESSION: ConceptSpec = ConceptSpec {
    text_elements: SQL_ELEMENT,
    children: SQL_ONLY,
    ..spec("MeasureExpression", &[])
};

static CLOSURE: ConceptSpec = ConceptSpec {
    identifiers: &["parent_column", "child_column"],
    children: &[Concept::Table],
    relations: Some(RelationCount { min: 1, max: 1 }),
    ..spec("Closure", &["parent_column", "child_column"])
};

static PROPERTY: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    children: &[Concept::PropertyFormatter],
    ..spec(
        "Property",
        &["name", "caption", "description", "column", "type", "formatter"],
    )
};

static MEASURE: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    children: &[
        Concept::Annotations,
        Concept::MeasureExpression,
        Concept::CalculatedMemberProperty,
        Concept::CellFormatter,
    ],
    ..spec(
        "Measure",
        &[
            "name",
            "caption",
            "description",
            "column",
            "aggregator",
            "format_string",
            "data_type",
            "formatter",
            "visible",
        ],
    )
};

static CALCULATED_MEMBER: ConceptSpec = ConceptSpec {
    text_elements: FORMULA_ELEMENT,
    children: &[
        Concept::Annotations,
        Concept::Formula,
        Concept::CalculatedMemberProperty,
        Concept::CellFormatter,
    ],
    ..spec(
        "CalculatedMember",
        &[
            "name",
            "caption",
            "description",
            "dimension",
            "hierarchy",
            "parent",
            "format_string",
            "visible",
        ],
    )
};

static CALCULATED_MEMBER_PROPERTY: ConceptSpec = spec(
    "CalculatedMemberProperty",
    &["name", "caption", "description", "expression", "value"],
);

static NAMED_SET: ConceptSpec = ConceptSpec {
    text_elements: FORMULA_ELEMENT,
    children: &[Concept::Annotations, Concept::Formula],
    ..spec("NamedSet", &["name", "caption", "description"])
};

static FORMULA: ConceptSpec = ConceptSpec {
    holds_text: true,
    ..spec("Formula", &[])
};

static SQL: ConceptSpec = ConceptSpec {
    holds_text: true,
    ..spec("SQL", &["dialect"])
};

static AGG_NAME: ConceptSpec = ConceptSpec {
    identifiers: &["name"],
    children: AGG_COLUMNS,
    ..spec("AggName", &["name", "approx_row_count", "ignore_case"])
};

static AGG_PATTERN: ConceptSpec = ConceptSpec {
    identifiers: &["pattern"],
    children: &[
        Concept::AggFactCount,
        Concept::AggIgnoreColumn,
        Concept::AggForeignKey,
        Concept::AggMeasure,
        Concept::AggLevel,
        Concept::AggExclude,
    ],
    ..spec("AggPattern", &["pattern", "ignore_case"])
};

static AGG_EXCLUDE: ConceptSpec = ConceptSpec {
    identifiers: &["name", "pattern"],
    ..spec("AggExclude", &["name", "pattern", "ignore_case"])
};

static AGG_FACT_COUNT: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    ..spec("AggFactCount", &["column"])
};

static AGG_IGNORE_COLUMN: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    ..spec("AggIgnoreColumn", &["column"])
};

static AGG_FOREIGN_KEY: ConceptSpec = ConceptSpec {
    identifiers: &["fact_column", "agg_column"],
    ..spec("AggForeignKey", &["fact_column", "agg_column"])
};

static AGG_MEASURE: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    ..spec("AggMeasure", &["name", "column"])
};

static AGG_LEVEL: ConceptSpec = ConceptSpec {
    identifiers: &["column"],
    ..spec("AggLevel", &["name", "column", "collapsed"])
};

static ANNOTATIONS: ConceptSpec = ConceptSpec {
    children: &[Concept::Annotation],
    ..spec("Annotations", &[])
};

static ANNOTATION: ConceptSpec = ConceptSpec {
    holds_text: true,
    ..spec("Annotation", &["name"])
};

static ROLE: ConceptSpec = ConceptSpec {
    children: &[Concept::Annotations, Concept::SchemaGrant],
    ..spec("Role", &["name"])
};

static SCHEMA_GRANT: ConceptSpec = ConceptSpec {
    children: &[Concept::CubeGrant],
    ..spec("SchemaGrant", &["access"])
};

static CUBE_GRANT: ConceptSpec = ConceptSpec {
    children: &[Concept::HierarchyGrant],
    ..spec("CubeGrant", &["cube", "access"])
};

static HIERARCHY_GRANT: ConceptSpec = ConceptSpec {
    children: &[Concept::MemberGrant],
    ..spec(
        "HierarchyGrant",
        &[
            "hierarchy",
            "access",
            "top_level",
            "bottom_level",
            "rollup_policy",
        ],
    )
};

static MEMBER_GRANT: ConceptSpec = spec("MemberGrant", &["member", "access"]);

static USER_DEFINED_FUNCTION: ConceptSpec = ConceptSpec {
    children: SCRIPT_ONLY,
    ..spec("UserDefinedFunction", &["name", "class_name"])
};

static CELL_FORMATTER: ConceptSpec = ConceptSpec {
    children: SCRIPT_ONLY,
    ..spec("CellFormatter", &["class_name"])
};

static MEMBER_FORMATTER: ConceptSpec = ConceptSpec {
    children: SCRIPT_ONLY,
    ..spec("MemberFormatter", &["class_name"])
};

static PROPERTY_FORMATTER: ConceptSpec = ConceptSpec {
    children: SCRIPT_ONLY,
    ..spec("PropertyFormatter", &["class_name"])
};

static SCRIPT: ConceptSpec = ConceptSpec {
    holds_text: true,
    ..spec("Script", &["language"])
};

/// Normalized attribute table, built once on first use and read-only after.
static ATTRIBUTES: LazyLock<HashMap<Concept, Vec<AttributeSpec>>> = LazyLock::new(|| {
    Concept::ALL
        .iter()
        .map(|&concept| {
            let spec = concept.spec();
            let attributes = spec
                .options
                .iter()
                .map(|&key| AttributeSpec {
                    key,
                    attribute: attribute_name(key),
                    identifier: spec.identifiers.contains(&key),
                })
                .collect();
            (concept, attributes)
        })
        .collect()
});

impl Concept {
    pub const ALL: &'static [Concept] = &[
        Concept::Schema,
        Concept::Cube,
        Concept::VirtualCube,
        Concept::CubeUsages,
        Concept::CubeUsage,
        Concept::VirtualCubeDimension,
        Concept::VirtualCubeMeasure,
        Concept::Table,
        Concept::View,
        Concept::InlineTable,
        Concept::ColumnDefs,
        Concept::ColumnDef,
        Concept::Rows,
        Concept::Row,
        Concept::RowValue,
        Concept::Join,
        Concept::Dimension,
        Concept::DimensionUsage,
        Concept::Hierarchy,
        Concept::Level,
        Concept::KeyExpression,
        Concept::NameExpression,
        Concept::CaptionExpression,
        Concept::OrdinalExpression,
        Concept::ParentExpression,
        Concept::MeasureExpression,
        Concept::Closure,
        Concept::Property,
        Concept::Measure,
        Concept::CalculatedMember,
        Concept::CalculatedMemberProperty,
        Concept::NamedSet,
        Concept::Formula,
        Concept::Sql,
        Concept::AggName,
        Concept::AggPattern,
        Concept::AggExclude,
        Concept::AggFactCount,
        Concept::AggIgnoreColumn,
        Concept::AggForeignKey,
        Concept::AggMeasure,
        Concept::AggLevel,
        Concept::Annotations,
        Concept::Annotation,
        Concept::Role,
        Concept::SchemaGrant,
        Concept::CubeGrant,
        Concept::HierarchyGrant,
        Concept::MemberGrant,
        Concept::UserDefinedFunction,
        Concept::CellFormatter,
        Concept::MemberFormatter,
        Concept::PropertyFormatter,
        Concept::Script,
    ];

    pub fn spec(self) -> &'static ConceptSpec {
        match self {
            Concept::Schema => &SCHEMA,
            Concept::Cube => &CUBE,
            Concept::VirtualCube => &VIRTUAL_CUBE,
            Concept::CubeUsages => &CUBE_USAGES,
            Concept::CubeUsage => &CUBE_USAGE,
            Concept::VirtualCubeDimension => &VIRTUAL_CUBE_DIMENSION,
            Concept::VirtualCubeMeasure => &VIRTUAL_CUBE_MEASURE,
            Concept::Table => &TABLE,
            Concept::View => &VIEW,
            Concept::InlineTable => &INLINE_TABLE,
            Concept::ColumnDefs => &COLUMN_DEFS,
            Concept::ColumnDef => &COLUMN_DEF,
            Concept::Rows => &ROWS,
            Concept::Row => &ROW,
            Concept::RowValue => &ROW_VALUE,
            Concept::Join => &JOIN,
            Concept::Dimension => &DIMENSION,
            Concept::DimensionUsage => &DIMENSION_USAGE,
            Concept::Hierarchy => &HIERARCHY,
            Concept::Level => &LEVEL,
            Concept::KeyExpression => &KEY_EXPRESSION,
            Concept::NameExpression => &NAME_EXPRESSION,
            Concept::CaptionExpression => &CAPTION_EXPRESSION,
            Concept::OrdinalExpression => &ORDINAL_EXPRESSION,
            Concept::ParentExpression => &PARENT_EXPRESSION,
            Concept::MeasureExpression => &MEASURE_EXPRESSION,
            Concept::Closure => &CLOSURE,
            Concept::Property => &PROPERTY,
            Concept::Measure => &MEASURE,
            Concept::CalculatedMember => &CALCULATED_MEMBER,
            Concept::CalculatedMemberProperty => &CALCULATED_MEMBER_PROPERTY,
            Concept::NamedSet => &NAMED_SET,
            Concept::Formula => &FORMULA,
            Concept::Sql => &SQL,
            Concept::AggName => &AGG_NAME,
            Concept::AggPattern => &AGG_PATTERN,
            Concept::AggExclude => &AGG_EXCLUDE,
            Concept::AggFactCount => &AGG_FACT_COUNT,
            Concept::AggIgnoreColumn => &AGG_IGNORE_COLUMN,
            Concept::AggForeignKey => &AGG_FOREIGN_KEY,
            Concept::AggMeasure => &AGG_MEASURE,
            Concept::AggLevel => &AGG_LEVEL,
            Concept::Annotations => &ANNOTATIONS,
            Concept::Annotation => &ANNOTATION,
            Concept::Role => &ROLE,
            Concept::SchemaGrant => &SCHEMA_GRANT,
            Concept::CubeGrant => &CUBE_GRANT,
            Concept::HierarchyGrant => &HIERARCHY_GRANT,
            Concept::MemberGrant => &MEMBER_GRANT,
            Concept::UserDefinedFunction => &USER_DEFINED_FUNCTION,
            Concept::CellFormatter => &CELL_FORMATTER,
            Concept::MemberFormatter => &MEMBER_FORMATTER,
            Concept::PropertyFormatter => &PROPERTY_FORMATTER,
            Concept::Script => &SCRIPT,
        }
    }

    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    pub fn from_tag(tag: &str) -> Option<Concept> {
        Concept::ALL.iter().copied().find(|c| c.tag() == tag)
    }

    /// Recognized attributes with their XML names.
    pub fn attributes(self) -> &'static [AttributeSpec] {
        ATTRIBUTES.get(&self).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a logical option key (any spelling the normalizer accepts).
    pub fn resolve_option(self, key: &str) -> Option<&'static AttributeSpec> {
        let name = attribute_name(key);
        self.attributes().iter().find(|a| a.attribute == name)
    }

    /// Look up an attribute by its exact XML name.
    pub fn attribute(self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes().iter().find(|a| a.attribute == name)
    }

    pub fn is_identifier(self, attribute: &str) -> bool {
        self.attribute(attribute).is_some_and(|a| a.identifier)
    }

    /// The child concept a text-element key expands to, e.g. `sql` -> `SQL`.
    pub fn text_element(self, key: &str) -> Option<Concept> {
        let name = attribute_name(key);
        self.spec()
            .text_elements
            .iter()
            .find(|(k, _)| attribute_name(k) == name)
            .map(|(_, concept)| *concept)
    }

    pub fn allows_child(self, child: Concept) -> bool {
        self.spec().children.contains(&child)
    }

    pub fn is_relation(self) -> bool {
        RELATIONS.contains(&self)
    }
}
