//! Node and relationship extraction.
//!
//! ```text
//! Class ID  http://purl.obolibrary.org/obo/DOID_4     -> id  DOID:DOID_4
//! Parents   http://.../DOID_0|http://.../owl#Thing    -> DOID:DOID_4 -> DOID:DOID_0
//!                                                        DOID:DOID_4 -> DOID:root
//! ```
//!
//! Parent lists fan out into one edge per parent. Edges to `owl:Thing` are
//! redirected to a per-ontology synthetic root node, appended once.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{
    MappingConfig, CLASS_ID_COLUMN, DEFINITIONS_COLUMN, ID_PROPERTY, LABEL_COLUMN,
    PARENTS_COLUMN, SYNONYMS_COLUMN,
};
use crate::error::{ConvertError, Result};
use crate::table::{cell_at, Table};

pub const OWL_THING_IRI: &str = "http://www.w3.org/2002/07/owl#Thing";
pub const ROOT_LOCAL_ID: &str = "root";
pub const PARENT_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub const COLUMNS: [&'static str; 2] = ["from", "to"];

    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub nodes: Table,
    pub edges: Vec<Edge>,
    pub root_injected: bool,
}

impl Extraction {
    pub fn edges_table(&self) -> Table {
        Table::with_rows(
            Edge::COLUMNS.iter().map(|c| c.to_string()).collect(),
            self.edges
                .iter()
                .map(|e| vec![e.from.clone(), e.to.clone()])
                .collect(),
        )
    }
}

fn non_word() -> &'static Regex {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    NON_WORD.get_or_init(|| Regex::new(r"\W+").expect("static pattern"))
}

/// Trailing word token of a class identifier.
///
/// Path style (`http://x.org/ABC_123`) and fragment style
/// (`http://x.org#ABC_123`) identifiers both yield `ABC_123`.
pub fn local_id(identifier: &str) -> Option<&str> {
    non_word()
        .split(identifier)
        .filter(|token| !token.is_empty())
        .last()
}

pub fn node_id(curie: &str, identifier: &str) -> Option<String> {
    local_id(identifier).map(|local| format!("{curie}:{local}"))
}

pub fn root_id(curie: &str) -> String {
    format!("{curie}:{ROOT_LOCAL_ID}")
}

/// Split `source` (columns named by source column) into node and edge tables.
pub fn extract(source: &Table, config: &MappingConfig) -> Result<Extraction> {
    let curie = config.curie.as_str();
    let url_idx = source_index(source, CLASS_ID_COLUMN)?;
    let parents_idx = source_index(source, PARENTS_COLUMN)?;

    let node_columns: Vec<usize> = config
        .properties()
        .iter()
        .filter(|p| p.source != PARENTS_COLUMN)
        .map(|p| source_index(source, &p.source))
        .collect::<Result<_>>()?;

    let mut nodes = Table::new(config.node_properties());
    let mut edges = Vec::new();
    let mut root_refs = 0usize;
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(source.len());
    let mut collisions = 0usize;

    for (line, row) in source.rows.iter().enumerate() {
        let url = cell_at(row, url_idx);
        let id = node_id(curie, url).ok_or_else(|| {
            ConvertError::Extraction(format!(
                "row {}: class identifier `{url}` has no word characters",
                line + 1
            ))
        })?;

        match seen.get(&id) {
            Some(previous) if *previous != url => {
                collisions += 1;
                tracing::warn!(%id, first = previous, second = url, "node id collision");
            }
            Some(_) => {}
            None => {
                seen.insert(id.clone(), url);
            }
        }

        let mut node = Vec::with_capacity(node_columns.len() + 1);
        node.push(id.clone());
        node.extend(node_columns.iter().map(|&idx| cell_at(row, idx).to_string()));
        nodes.push_row(node);

        let parents = cell_at(row, parents_idx);
        for parent in parents.split(PARENT_SEPARATOR).map(str::trim) {
            if parent.is_empty() {
                continue;
            }
            let to = if parent == OWL_THING_IRI {
                root_refs += 1;
                root_id(curie)
            } else {
                node_id(curie, parent).ok_or_else(|| {
                    ConvertError::Extraction(format!(
                        "row {}: parent identifier `{parent}` has no word characters",
                        line + 1
                    ))
                })?
            };
            edges.push(Edge::new(id.clone(), to));
        }
    }

    let root_injected = root_refs > 0;
    if root_injected {
        nodes.push_row(root_node(&nodes.columns, config));
        tracing::debug!(root_refs, "injected synthetic root node");
    }
    if collisions > 0 {
        tracing::warn!(collisions, "distinct class identifiers share a node id");
    }

    tracing::info!(nodes = nodes.len(), edges = edges.len(), "extracted");
    Ok(Extraction {
        nodes,
        edges,
        root_injected,
    })
}

fn source_index(source: &Table, column: &str) -> Result<usize> {
    source.column_index(column).ok_or_else(|| {
        ConvertError::Extraction(format!("source table lacks `{column}` column"))
    })
}

fn root_node(columns: &[String], config: &MappingConfig) -> Vec<String> {
    let curie = config.curie.as_str();
    let values = [
        (Some(ID_PROPERTY), root_id(curie)),
        (config.target_of(LABEL_COLUMN), ROOT_LOCAL_ID.to_string()),
        (
            config.target_of(SYNONYMS_COLUMN),
            format!("{ROOT_LOCAL_ID}|{curie} {ROOT_LOCAL_ID}"),
        ),
        (
            config.target_of(DEFINITIONS_COLUMN),
            format!("{ROOT_LOCAL_ID} node of {curie}"),
        ),
    ];

    columns
        .iter()
        .map(|column| {
            values
                .iter()
                .find(|(target, _)| *target == Some(column.as_str()))
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertyMapping;

    fn config(extra: Vec<PropertyMapping>) -> MappingConfig {
        MappingConfig::new("src.csv", "ONT", "thing_nodes.csv", "a-b-c.csv", extra).unwrap()
    }

    fn source(rows: &[[&str; 5]]) -> Table {
        Table::with_rows(
            ["Preferred Label", "Synonyms", "Definitions", "Class ID", "Parents"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn local_id_handles_paths_and_fragments() {
        assert_eq!(local_id("http://x.org/ABC_123"), Some("ABC_123"));
        assert_eq!(local_id("http://x.org#ABC_123"), Some("ABC_123"));
        assert_eq!(local_id("http://x.org/onto/"), Some("onto"));
        assert_eq!(local_id(OWL_THING_IRI), Some("Thing"));
        assert_eq!(local_id("://#"), None);
        assert_eq!(local_id(""), None);
    }

    #[test]
    fn converts_the_reference_row() {
        let table = source(&[[
            "Foo",
            "Foo|Bar",
            "A foo",
            "http://onto.org/X1",
            "http://onto.org/X0|http://www.w3.org/2002/07/owl#Thing",
        ]]);
        let out = extract(&table, &config(vec![])).unwrap();

        assert_eq!(out.nodes.columns, vec!["id", "name", "synonyms", "definition", "url"]);
        assert_eq!(
            out.nodes.rows,
            vec![
                vec!["ONT:X1", "Foo", "Foo|Bar", "A foo", "http://onto.org/X1"],
                vec!["ONT:root", "root", "root|ONT root", "root node of ONT", ""],
            ]
        );
        assert_eq!(
            out.edges,
            vec![Edge::new("ONT:X1", "ONT:X0"), Edge::new("ONT:X1", "ONT:root")]
        );
        assert!(out.root_injected);
    }

    #[test]
    fn parents_fan_out_in_order_and_empty_parents_add_nothing() {
        let table = source(&[
            ["A", "", "", "http://o.org/A", "http://o.org/P1|http://o.org/P2|http://o.org/P3"],
            ["B", "", "", "http://o.org/B", ""],
            ["C", "", "", "http://o.org/C", "http://o.org/A||"],
        ]);
        let out = extract(&table, &config(vec![])).unwrap();
        let to: Vec<&str> = out.edges.iter().map(|e| e.to.as_str()).collect();
        assert_eq!(to, vec!["ONT:P1", "ONT:P2", "ONT:P3", "ONT:A"]);
        assert!(out.edges[..3].iter().all(|e| e.from == "ONT:A"));
        assert!(!out.root_injected);
        assert_eq!(out.nodes.len(), 3);
    }

    #[test]
    fn root_is_added_once_for_many_references() {
        let table = source(&[
            ["A", "", "", "http://o.org/A", OWL_THING_IRI],
            ["B", "", "", "http://o.org/B", OWL_THING_IRI],
        ]);
        let out = extract(&table, &config(vec![])).unwrap();
        assert_eq!(out.nodes.len(), 3);
        assert_eq!(
            out.nodes
                .column_values("id")
                .unwrap()
                .filter(|id| *id == "ONT:root")
                .count(),
            1
        );
    }

    #[test]
    fn extra_columns_follow_core_columns_and_root_leaves_them_empty() {
        let mut table = source(&[["A", "", "", "http://o.org/A", OWL_THING_IRI]]);
        table.columns.push("Obsolete".to_string());
        table.rows[0].push("false".to_string());

        let out = extract(&table, &config(vec![PropertyMapping::new("Obsolete", "obsolete")]))
            .unwrap();
        assert_eq!(out.nodes.columns.last().map(String::as_str), Some("obsolete"));
        assert_eq!(out.nodes.cell(0, "obsolete"), Some("false"));
        assert_eq!(out.nodes.cell(1, "obsolete"), Some(""));
    }

    #[test]
    fn missing_class_id_column_is_an_extraction_error() {
        let table = Table::new(vec!["Preferred Label".to_string()]);
        let err = extract(&table, &config(vec![])).unwrap_err();
        assert_eq!(err.stage(), "extraction");
    }

    #[test]
    fn identifier_without_word_characters_is_an_extraction_error() {
        let table = source(&[["A", "", "", "", ""]]);
        let err = extract(&table, &config(vec![])).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }
}
