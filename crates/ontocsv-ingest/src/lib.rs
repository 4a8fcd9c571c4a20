//! BioPortal ontology export -> property graph import tables.
//!
//! Converts the CSV export of an ontology (one row per class, with
//! `Preferred Label`, `Synonyms`, `Definitions`, `Class ID`, `Parents`, ...)
//! into:
//!
//! - a node table (one row per class, ids namespaced by a curie),
//! - a relationship table (class -> parent class edges),
//! - a metadata table for each, describing every column with an example
//!   drawn from a representative node.
//!
//! The outputs are plain CSV suitable for bulk import into a property graph.
//! The library never reads the process environment: output directories are
//! resolved by the caller and passed in as [`OutputDirs`].

pub mod config;
pub mod error;
pub mod example;
pub mod extract;
pub mod load;
pub mod metadata;
pub mod pipeline;
pub mod table;
pub mod write;

pub use config::{DirOverrides, MappingConfig, OutputDir, OutputDirs, PropertyMapping};
pub use error::{ConvertError, Result};
pub use extract::{Edge, Extraction};
pub use metadata::{ColumnType, MetadataRecord};
pub use pipeline::{convert, run, Conversion, ConversionReport, ConvertOptions, OutputPaths};
pub use table::Table;
