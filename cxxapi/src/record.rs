//! Declaration records: the input format, one record per declaration.
//!
//! Records come from a documentation-generator adapter, either as one JSON
//! array or as JSON Lines. Every field except `kind` and `qualified_name` is
//! optional.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(alias = "compound_kind")]
    pub kind: String,
    pub qualified_name: String,
    #[serde(default = "public")]
    pub visibility: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_pure_virtual: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_constexpr: bool,
    #[serde(default)]
    pub is_mutable: bool,
    #[serde(default, rename = "type", alias = "raw_type")]
    pub ty: String,
    #[serde(default, alias = "raw_argstring")]
    pub argstring: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub template_params: Vec<ParamRecord>,
    #[serde(default)]
    pub base_classes: Vec<BaseRecord>,
    /// Structured parameters; preferred over `argstring` when non-empty.
    #[serde(default)]
    pub params: Option<Vec<ParamRecord>>,
    #[serde(default)]
    pub enum_values: Vec<EnumValueRecord>,
    #[serde(default)]
    pub initializer: Option<String>,
    #[serde(default, alias = "location_file")]
    pub location: Option<String>,
}

/// A template or function parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamRecord {
    #[serde(default, rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseRecord {
    pub name: String,
    #[serde(default = "public")]
    pub protection: String,
    #[serde(default)]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumValueRecord {
    pub name: String,
    #[serde(default)]
    pub initializer: Option<String>,
}

fn public() -> String {
    "public".to_string()
}

/// How the records in one input are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// One JSON array of records.
    Array,
    /// One record per line (JSON Lines); blank lines are skipped.
    Lines,
}

impl RecordFormat {
    /// `.json` is an array, `.jsonl` and `.ndjson` are JSON Lines.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "json" => Some(Self::Array),
            "jsonl" | "ndjson" => Some(Self::Lines),
            _ => None,
        }
    }

    /// A document starting with `[` is an array, anything else is JSON Lines.
    pub fn detect(content: &str) -> Self {
        if content.trim_start().starts_with('[') {
            Self::Array
        } else {
            Self::Lines
        }
    }

    pub fn parse(self, content: &str) -> Result<Vec<Record>> {
        match self {
            Self::Array => serde_json::from_str(content).context("invalid record array"),
            Self::Lines => content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str(line).with_context(|| format!("invalid record on line {}", i + 1))
                })
                .collect(),
        }
    }
}

/// Parse a record file, choosing the format by extension.
pub fn parse_file(path: &Path, content: &str) -> Result<Vec<Record>> {
    let format = RecordFormat::from_path(path).ok_or_else(|| anyhow!("unsupported file type: {}", path.display()))?;
    format.parse(content)
}

/// Parse records of either format, sniffing the layout from the content.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    RecordFormat::detect(content).parse(content)
}
