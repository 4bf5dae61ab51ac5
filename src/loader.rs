//! Tree loading utilities
//!
//! Trees are read as untyped [`serde_json::Value`]s so that the conformance
//! checker sees exactly what the file contains, including shapes no typed
//! model would accept. YAML documents are converted to the same value model.
//!
//! [`parse_node`] and [`load_node`] go one step further: they build a typed
//! [`GenericNode`] tree and reject it at the first shape violation.

use crate::ast::GenericNode;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Serialization a tree file is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    Json,
    Yaml,
}

impl TreeFormat {
    /// Detect the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                TreeFormat::Yaml
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => TreeFormat::Json,
            other => {
                tracing::debug!(extension = ?other, "unknown tree file extension, assuming JSON");
                TreeFormat::Json
            }
        }
    }
}

impl FromStr for TreeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(TreeFormat::Json),
            "yaml" | "yml" => Ok(TreeFormat::Yaml),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFormat::Json => write!(f, "json"),
            TreeFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Parse tree text in the given format.
pub fn parse_tree(text: &str, format: TreeFormat) -> Result<Value> {
    let value: Value = match format {
        TreeFormat::Json => serde_json::from_str(text)?,
        TreeFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(value)
}

/// Read and parse a tree file. Without an explicit format, the extension decides.
pub fn load_tree(path: impl AsRef<Path>, format: Option<TreeFormat>) -> Result<Value> {
    let path = path.as_ref();
    let format = format.unwrap_or_else(|| TreeFormat::from_path(path));
    tracing::debug!(path = %path.display(), %format, "loading tree");

    let text = read_source(path)?;
    parse_tree(&text, format)
}

/// Parse tree text into a typed tree, validating every node.
pub fn parse_node(text: &str, format: TreeFormat) -> Result<GenericNode> {
    let node: GenericNode = serde_json::from_value(parse_tree(text, format)?)?;
    node.validate_tree()?;
    Ok(node)
}

/// Read a tree file into a typed tree, validating every node.
pub fn load_node(path: impl AsRef<Path>, format: Option<TreeFormat>) -> Result<GenericNode> {
    let path = path.as_ref();
    let format = format.unwrap_or_else(|| TreeFormat::from_path(path));
    tracing::debug!(path = %path.display(), %format, "loading typed tree");

    let text = read_source(path)?;
    parse_node(&text, format)
}

/// Read a text file, keeping the path in the error.
pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
