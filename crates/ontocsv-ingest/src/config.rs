//! Mapping configuration and output locations.
//!
//! A mapping file is a two-column CSV (`key,value`). The leading block of
//! rows is reserved for the run's required keys; every row after it maps an
//! extra source column onto a node property:
//!
//! ```text
//! key,value
//! downloadUrl,https://data.bioontology.org/ontologies/DOID/download?download_format=csv
//! curie,DOID
//! nodeFilename,disease_doid.csv
//! relationshipFilename,disease-subclass_of-disease_doid.csv
//! ontology,Human Disease Ontology
//! http://www.geneontology.org/formats/oboInOwl#hasDbXref,xrefs
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

pub const KEY_DOWNLOAD_URL: &str = "downloadUrl";
pub const KEY_CURIE: &str = "curie";
pub const KEY_NODE_FILENAME: &str = "nodeFilename";
pub const KEY_RELATIONSHIP_FILENAME: &str = "relationshipFilename";

pub const REQUIRED_KEYS: [&str; 4] = [
    KEY_DOWNLOAD_URL,
    KEY_CURIE,
    KEY_NODE_FILENAME,
    KEY_RELATIONSHIP_FILENAME,
];

/// Size of the reserved leading block of a mapping file.
pub const DEFAULT_RESERVED_ROWS: usize = 5;

pub const ID_PROPERTY: &str = "id";
pub const NAME_PROPERTY: &str = "name";
pub const SYNONYMS_PROPERTY: &str = "synonyms";
pub const DEFINITION_PROPERTY: &str = "definition";
pub const URL_PROPERTY: &str = "url";
pub const PARENTS_PROPERTY: &str = "parents";

pub const LABEL_COLUMN: &str = "Preferred Label";
pub const SYNONYMS_COLUMN: &str = "Synonyms";
pub const DEFINITIONS_COLUMN: &str = "Definitions";
pub const CLASS_ID_COLUMN: &str = "Class ID";
pub const PARENTS_COLUMN: &str = "Parents";

/// Source columns extracted from every ontology export.
pub const CORE_PROPERTIES: [(&str, &str); 5] = [
    (LABEL_COLUMN, NAME_PROPERTY),
    (SYNONYMS_COLUMN, SYNONYMS_PROPERTY),
    (DEFINITIONS_COLUMN, DEFINITION_PROPERTY),
    (CLASS_ID_COLUMN, URL_PROPERTY),
    (PARENTS_COLUMN, PARENTS_PROPERTY),
];

pub const DEFAULT_NODE_DATA_DIR: &str = "../data/nodes/";
pub const DEFAULT_RELATIONSHIP_DATA_DIR: &str = "../data/relationships/";
pub const DEFAULT_NODE_METADATA_DIR: &str = "../metadata/nodes/";
pub const DEFAULT_RELATIONSHIP_METADATA_DIR: &str = "../metadata/relationships/";

// ============================================================================
// Mapping file
// ============================================================================

/// Source column -> node property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    pub source: String,
    pub target: String,
}

impl PropertyMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    pub download_url: String,
    pub curie: String,
    pub node_filename: String,
    pub relationship_filename: String,
    /// Core properties followed by the extra mappings, duplicates resolved.
    properties: Vec<PropertyMapping>,
}

impl MappingConfig {
    pub fn new(
        download_url: impl Into<String>,
        curie: impl Into<String>,
        node_filename: impl Into<String>,
        relationship_filename: impl Into<String>,
        extra_properties: Vec<PropertyMapping>,
    ) -> Result<Self> {
        let config = Self {
            download_url: required_value(KEY_DOWNLOAD_URL, download_url.into())?,
            curie: required_value(KEY_CURIE, curie.into())?,
            node_filename: required_value(KEY_NODE_FILENAME, node_filename.into())?,
            relationship_filename: required_value(
                KEY_RELATIONSHIP_FILENAME,
                relationship_filename.into(),
            )?,
            properties: resolve_properties(extra_properties)?,
        };
        Ok(config)
    }

    pub fn from_path(path: &Path, reserved_rows: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            ConvertError::Config(format!("cannot open mapping file {}: {e}", path.display()))
        })?;
        Self::from_reader(file, reserved_rows)
    }

    pub fn from_reader<R: Read>(reader: R, reserved_rows: usize) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record
                .map_err(|e| ConvertError::Config(format!("malformed mapping file: {e}")))?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            match (record.get(0), record.get(1)) {
                (Some(key), Some(value)) => entries.push((key.to_string(), value.to_string())),
                _ => {
                    return Err(ConvertError::Config(format!(
                        "mapping row {} needs two fields (key,value)",
                        i + 1
                    )))
                }
            }
        }

        Self::from_entries(&entries, reserved_rows)
    }

    /// Build from `(key, value)` rows in file order.
    pub fn from_entries(entries: &[(String, String)], reserved_rows: usize) -> Result<Self> {
        if reserved_rows < REQUIRED_KEYS.len() {
            return Err(ConvertError::Config(format!(
                "reserved block of {reserved_rows} rows cannot hold the {} required keys",
                REQUIRED_KEYS.len()
            )));
        }
        if entries.len() < REQUIRED_KEYS.len() {
            return Err(ConvertError::Config(format!(
                "mapping file has {} rows; the first {} must hold {}",
                entries.len(),
                REQUIRED_KEYS.len(),
                REQUIRED_KEYS.join(", ")
            )));
        }

        let reserved = &entries[..reserved_rows.min(entries.len())];
        let lookup = |key: &str| -> Result<String> {
            let mut hits = reserved.iter().filter(|(k, _)| k == key);
            match (hits.next(), hits.next()) {
                (Some((_, value)), None) => Ok(value.clone()),
                (None, _) => Err(ConvertError::Config(format!(
                    "missing key `{key}` in the first {reserved_rows} mapping rows"
                ))),
                (Some(_), Some(_)) => {
                    Err(ConvertError::Config(format!("duplicate key `{key}`")))
                }
            }
        };

        let extra = entries
            .iter()
            .skip(reserved_rows)
            .map(|(source, target)| PropertyMapping::new(source.clone(), target.clone()))
            .collect();

        Self::new(
            lookup(KEY_DOWNLOAD_URL)?,
            lookup(KEY_CURIE)?,
            lookup(KEY_NODE_FILENAME)?,
            lookup(KEY_RELATIONSHIP_FILENAME)?,
            extra,
        )
    }

    pub fn properties(&self) -> &[PropertyMapping] {
        &self.properties
    }

    /// Node property a source column is mapped to.
    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.source == source)
            .map(|p| p.target.as_str())
    }

    /// Columns to read from the source table, in mapping order.
    pub fn source_columns(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.source.clone()).collect()
    }

    /// Node table columns: `id` followed by every mapped property except `parents`.
    pub fn node_properties(&self) -> Vec<String> {
        std::iter::once(ID_PROPERTY.to_string())
            .chain(
                self.properties
                    .iter()
                    .filter(|p| p.target != PARENTS_PROPERTY)
                    .map(|p| p.target.clone()),
            )
            .collect()
    }
}

fn required_value(key: &str, value: String) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConvertError::Config(format!("empty value for `{key}`")));
    }
    Ok(value)
}

fn resolve_properties(extra: Vec<PropertyMapping>) -> Result<Vec<PropertyMapping>> {
    let mut properties: Vec<PropertyMapping> = CORE_PROPERTIES
        .iter()
        .map(|(source, target)| PropertyMapping::new(*source, *target))
        .collect();

    for mapping in extra {
        if mapping.source.is_empty() || mapping.target.is_empty() {
            return Err(ConvertError::Config(format!(
                "incomplete property mapping `{}` -> `{}`",
                mapping.source, mapping.target
            )));
        }
        let pinned = [(CLASS_ID_COLUMN, URL_PROPERTY), (PARENTS_COLUMN, PARENTS_PROPERTY)];
        if let Some((_, target)) = pinned.iter().find(|(s, _)| *s == mapping.source) {
            if mapping.target != *target {
                return Err(ConvertError::Config(format!(
                    "`{}` must stay mapped to `{target}`",
                    mapping.source
                )));
            }
        }
        // Last mapping for a source column wins but keeps its first position.
        match properties.iter_mut().find(|p| p.source == mapping.source) {
            Some(existing) => existing.target = mapping.target,
            None => properties.push(mapping),
        }
    }

    for (i, p) in properties.iter().enumerate() {
        if p.target == ID_PROPERTY {
            return Err(ConvertError::Config(format!(
                "`{}` cannot be mapped to the reserved `{ID_PROPERTY}` property",
                p.source
            )));
        }
        if properties[..i].iter().any(|q| q.target == p.target) {
            return Err(ConvertError::Config(format!(
                "property `{}` is mapped from more than one column",
                p.target
            )));
        }
    }

    Ok(properties)
}

// ============================================================================
// Output directories
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    pub path: PathBuf,
    /// True when no override was given and the default path is in effect.
    pub defaulted: bool,
}

impl OutputDir {
    pub fn resolve(override_path: Option<PathBuf>, default: &str) -> Self {
        match override_path {
            Some(path) => Self {
                path,
                defaulted: false,
            },
            None => Self {
                path: PathBuf::from(default),
                defaulted: true,
            },
        }
    }

    /// Create the directory if it is the default; overrides are the caller's job.
    pub fn prepare(&self) -> Result<()> {
        if self.defaulted {
            std::fs::create_dir_all(&self.path).map_err(|e| ConvertError::write(&self.path, e))?;
        }
        Ok(())
    }
}

/// Directory overrides resolved by the caller (flags, environment, ...).
#[derive(Debug, Clone, Default)]
pub struct DirOverrides {
    pub node_data: Option<PathBuf>,
    pub relationship_data: Option<PathBuf>,
    pub node_metadata: Option<PathBuf>,
    pub relationship_metadata: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub node_data: OutputDir,
    pub relationship_data: OutputDir,
    pub node_metadata: OutputDir,
    pub relationship_metadata: OutputDir,
}

impl OutputDirs {
    pub fn resolve(overrides: DirOverrides) -> Self {
        Self {
            node_data: OutputDir::resolve(overrides.node_data, DEFAULT_NODE_DATA_DIR),
            relationship_data: OutputDir::resolve(
                overrides.relationship_data,
                DEFAULT_RELATIONSHIP_DATA_DIR,
            ),
            node_metadata: OutputDir::resolve(overrides.node_metadata, DEFAULT_NODE_METADATA_DIR),
            relationship_metadata: OutputDir::resolve(
                overrides.relationship_metadata,
                DEFAULT_RELATIONSHIP_METADATA_DIR,
            ),
        }
    }

    /// All four directories rooted at `base` (nothing is defaulted).
    pub fn under(base: &Path) -> Self {
        Self::resolve(DirOverrides {
            node_data: Some(base.join("data/nodes")),
            relationship_data: Some(base.join("data/relationships")),
            node_metadata: Some(base.join("metadata/nodes")),
            relationship_metadata: Some(base.join("metadata/relationships")),
        })
    }

    pub fn prepare(&self) -> Result<()> {
        self.node_data.prepare()?;
        self.relationship_data.prepare()?;
        self.node_metadata.prepare()?;
        self.relationship_metadata.prepare()
    }
}

impl Default for OutputDirs {
    fn default() -> Self {
        Self::resolve(DirOverrides::default())
    }
}
