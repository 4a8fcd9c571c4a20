//! Conversion errors.
//!
//! Every failure is fatal and names the stage it came from. Callers treat a
//! failed run as "state unknown": files written before the failure are left
//! in place.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Missing or malformed mapping entries.
    #[error("config error: {0}")]
    Config(String),

    /// Source fetch/parse failure or a requested column is absent.
    #[error("load error: {0}")]
    Load(String),

    /// Malformed identifier fields or an unusable source table.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Destination not writable.
    #[error("write error: {}: {}", .path.display(), .message)]
    Write { path: PathBuf, message: String },
}

impl ConvertError {
    pub fn stage(&self) -> &'static str {
        match self {
            ConvertError::Config(_) => "config",
            ConvertError::Load(_) => "load",
            ConvertError::Extraction(_) => "extraction",
            ConvertError::Write { .. } => "write",
        }
    }

    pub(crate) fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        ConvertError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
