//! Metadata tables describing the node and relationship outputs.
//!
//! One record per output column: property name, a descriptive type label,
//! a description and an example value taken from the representative row.
//! The type label is best effort. It describes sampled values and is never
//! enforced on the data.

use std::fmt;

use serde::Serialize;

use crate::extract::Edge;
use crate::table::{cell_at, Table};

/// Maximum number of non-empty values inspected per column.
pub const TYPE_SAMPLE_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a column from its non-empty values.
///
/// A column with no values at all is a string column.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut seen = false;
    let mut integer = true;
    let mut float = true;
    let mut boolean = true;

    for value in values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .take(TYPE_SAMPLE_LIMIT)
    {
        seen = true;
        integer = integer && value.parse::<i64>().is_ok();
        float = float
            && value.bytes().any(|b| b.is_ascii_digit())
            && value.parse::<f64>().is_ok();
        boolean = boolean
            && (value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"));
        if !(integer || float || boolean) {
            break;
        }
    }

    match (seen, boolean, integer, float) {
        (false, ..) => ColumnType::String,
        (true, true, ..) => ColumnType::Boolean,
        (true, _, true, _) => ColumnType::Integer,
        (true, _, _, true) => ColumnType::Float,
        _ => ColumnType::String,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    pub property: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    pub description: String,
    pub example: String,
}

impl MetadataRecord {
    pub const COLUMNS: [&'static str; 4] = ["property", "type", "description", "example"];
}

pub fn metadata_table(records: &[MetadataRecord]) -> Table {
    Table::with_rows(
        MetadataRecord::COLUMNS.iter().map(|c| c.to_string()).collect(),
        records
            .iter()
            .map(|r| {
                vec![
                    r.property.clone(),
                    r.kind.to_string(),
                    r.description.clone(),
                    r.example.clone(),
                ]
            })
            .collect(),
    )
}

/// One record per node column; examples come from `representative`.
pub fn node_metadata(nodes: &Table, representative: Option<usize>) -> Vec<MetadataRecord> {
    nodes
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| MetadataRecord {
            property: column.clone(),
            kind: infer_column_type(nodes.rows.iter().map(|row| cell_at(row, idx))),
            description: column.clone(),
            example: representative
                .and_then(|r| nodes.rows.get(r))
                .map(|row| cell_at(row, idx).to_string())
                .unwrap_or_default(),
        })
        .collect()
}

/// Example edge: the first edge leaving the representative node, else the
/// first edge overall.
pub fn example_edge<'a>(edges: &'a [Edge], representative_id: Option<&str>) -> Option<&'a Edge> {
    representative_id
        .and_then(|id| edges.iter().find(|e| e.from == id))
        .or_else(|| edges.first())
}

pub fn edge_metadata(edges: &[Edge], representative_id: Option<&str>) -> Vec<MetadataRecord> {
    let example = example_edge(edges, representative_id);
    vec![
        MetadataRecord {
            property: "from".to_string(),
            kind: ColumnType::String,
            description: "Id of source node".to_string(),
            example: example.map(|e| e.from.clone()).unwrap_or_default(),
        },
        MetadataRecord {
            property: "to".to_string(),
            kind: ColumnType::String,
            description: "Id of target node".to_string(),
            example: example.map(|e| e.to.clone()).unwrap_or_default(),
        },
    ]
}

// ============================================================================
// Metadata filenames
// ============================================================================

/// `disease_nodes.csv` -> `disease.csv`
pub fn node_metadata_filename(node_filename: &str) -> String {
    match leading_token(node_filename) {
        Some(stem) => format!("{stem}.csv"),
        None => node_filename.to_string(),
    }
}

/// `gene-associated_with-disease_v2.csv` -> `gene-associated_with-disease.csv`
///
/// Names that are not `<source>-<relationship>-<target>` are kept as is.
pub fn relationship_metadata_filename(relationship_filename: &str) -> String {
    let parts: Vec<&str> = relationship_filename.splitn(3, '-').collect();
    match parts.as_slice() {
        [source, relationship, target] => match leading_token(target) {
            Some(target) => format!("{source}-{relationship}-{target}.csv"),
            None => relationship_filename.to_string(),
        },
        _ => relationship_filename.to_string(),
    }
}

fn leading_token(name: &str) -> Option<&str> {
    name.split(['.', '_']).next().filter(|t| !t.is_empty())
}
