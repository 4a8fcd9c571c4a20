//! Conversion entry points.
//!
//! ```text
//! MappingConfig -> load_table -> extract -> score/metadata -> write_table x4
//! ```
//!
//! `convert` is the in-memory part; `run` adds loading and writing.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{MappingConfig, OutputDirs, SYNONYMS_COLUMN};
use crate::error::Result;
use crate::example::{representative_row, DEFAULT_EXAMPLE_RANK};
use crate::extract::{extract, Edge, Extraction};
use crate::load::load_table;
use crate::metadata::{
    edge_metadata, metadata_table, node_metadata, node_metadata_filename,
    relationship_metadata_filename, MetadataRecord,
};
use crate::table::Table;
use crate::write::write_table;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output_dirs: OutputDirs,
    pub example_rank: usize,
    /// Convert and report without touching the filesystem.
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_dirs: OutputDirs::default(),
            example_rank: DEFAULT_EXAMPLE_RANK,
            dry_run: false,
        }
    }
}

/// Node/relationship tables plus their metadata, held in memory.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub extraction: Extraction,
    /// Index into `extraction.nodes` of the representative example row.
    pub representative: Option<usize>,
    pub node_metadata: Vec<MetadataRecord>,
    pub relationship_metadata: Vec<MetadataRecord>,
}

impl Conversion {
    pub fn nodes(&self) -> &Table {
        &self.extraction.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.extraction.edges
    }

    pub fn representative_id(&self) -> Option<&str> {
        self.representative
            .and_then(|r| self.extraction.nodes.rows.get(r))
            .and_then(|row| row.first())
            .map(String::as_str)
    }
}

pub fn convert(source: &Table, config: &MappingConfig, example_rank: usize) -> Result<Conversion> {
    let extraction = extract(source, config)?;

    let representative = representative_row(
        &extraction.nodes,
        config.target_of(SYNONYMS_COLUMN),
        example_rank,
    );
    let node_metadata = node_metadata(&extraction.nodes, representative);

    let mut conversion = Conversion {
        extraction,
        representative,
        node_metadata,
        relationship_metadata: Vec::new(),
    };
    conversion.relationship_metadata =
        edge_metadata(conversion.edges(), conversion.representative_id());

    match conversion.representative_id() {
        Some(id) => tracing::debug!(id, rank = example_rank, "representative example"),
        None => tracing::warn!("node table is empty; metadata examples left blank"),
    }
    Ok(conversion)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub node_data: PathBuf,
    pub relationship_data: PathBuf,
    pub node_metadata: PathBuf,
    pub relationship_metadata: PathBuf,
}

/// Data files first, then metadata. A failure leaves earlier files in place.
pub fn write_outputs(
    conversion: &Conversion,
    config: &MappingConfig,
    dirs: &OutputDirs,
) -> Result<OutputPaths> {
    dirs.prepare()?;
    let node_data = write_table(&dirs.node_data.path, &config.node_filename, conversion.nodes())?;
    let relationship_data = write_table(
        &dirs.relationship_data.path,
        &config.relationship_filename,
        &conversion.extraction.edges_table(),
    )?;
    let node_metadata = write_table(
        &dirs.node_metadata.path,
        &node_metadata_filename(&config.node_filename),
        &metadata_table(&conversion.node_metadata),
    )?;
    let relationship_metadata = write_table(
        &dirs.relationship_metadata.path,
        &relationship_metadata_filename(&config.relationship_filename),
        &metadata_table(&conversion.relationship_metadata),
    )?;

    Ok(OutputPaths {
        node_data,
        relationship_data,
        node_metadata,
        relationship_metadata,
    })
}

/// Summary of one run, serializable for `--summary`.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub curie: String,
    pub source: String,
    pub nodes: usize,
    pub relationships: usize,
    pub root_injected: bool,
    pub representative_id: Option<String>,
    /// `None` for dry runs.
    pub outputs: Option<OutputPaths>,
    pub node_metadata: Vec<MetadataRecord>,
    pub relationship_metadata: Vec<MetadataRecord>,
}

impl ConversionReport {
    fn new(config: &MappingConfig, conversion: Conversion, outputs: Option<OutputPaths>) -> Self {
        Self {
            curie: config.curie.clone(),
            source: config.download_url.clone(),
            nodes: conversion.nodes().len(),
            relationships: conversion.edges().len(),
            root_injected: conversion.extraction.root_injected,
            representative_id: conversion.representative_id().map(str::to_string),
            outputs,
            node_metadata: conversion.node_metadata,
            relationship_metadata: conversion.relationship_metadata,
        }
    }
}

/// Load the configured source, convert it and write the four output files.
pub fn run(config: &MappingConfig, options: &ConvertOptions) -> Result<ConversionReport> {
    let source = load_table(&config.download_url, &config.source_columns())?;
    let conversion = convert(&source, config, options.example_rank)?;
    tracing::info!(
        curie = %config.curie,
        nodes = conversion.nodes().len(),
        relationships = conversion.edges().len(),
        "converted"
    );

    let outputs = if options.dry_run {
        None
    } else {
        Some(write_outputs(&conversion, config, &options.output_dirs)?)
    };
    Ok(ConversionReport::new(config, conversion, outputs))
}
