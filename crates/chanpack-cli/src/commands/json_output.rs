//! JSON output types for the `--json` flag.
//!
//! Field names are stable so scripts can consume them.

use anyhow::{Context, Result};
use chanpack_template::{ChannelDescriptor, PackingTemplate, Plane};
use serde::{Deserialize, Serialize};

/// One template plane and where its data came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaneRecord {
    /// Plane key (R, G, B, A).
    pub plane: String,
    /// Semantic type assigned to the plane.
    pub semantic_type: String,
    /// Default fill value.
    pub default: f64,
    /// Source file, or `None` when the default was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl PlaneRecord {
    pub fn new(plane: Plane, channel: &ChannelDescriptor, source: Option<String>) -> Self {
        Self {
            plane: plane.to_string(),
            semantic_type: channel.semantic_type().to_string(),
            default: channel.default_value(),
            source,
        }
    }
}

/// Result of `chanpack pack --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackOutput {
    pub template: String,
    pub output: String,
    pub width: u32,
    pub height: u32,
    /// `RGB` or `RGBA`.
    pub layout: String,
    pub planes: Vec<PlaneRecord>,
    /// BLAKE3 hash of the written PNG; absent for other formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// One file written by `chanpack unpack`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnpackedFile {
    pub name: String,
    pub path: String,
}

/// Result of `chanpack unpack --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnpackOutput {
    pub template: String,
    pub input: String,
    pub width: u32,
    pub height: u32,
    pub files: Vec<UnpackedFile>,
}

/// Template summary for `template list` and `template show`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateRecord {
    pub name: String,
    pub description: String,
    pub rgba: bool,
    pub channels: Vec<PlaneRecord>,
    /// File the template was loaded from; absent for built-ins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TemplateRecord {
    pub fn new(template: &PackingTemplate, path: Option<String>) -> Self {
        Self {
            name: template.name().to_string(),
            description: template.description().to_string(),
            rgba: template.is_rgba(),
            channels: template
                .used_channels()
                .map(|(plane, channel)| PlaneRecord::new(plane, channel, None))
                .collect(),
            path,
        }
    }
}

/// A template file that failed to load during discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvalidTemplateRecord {
    pub path: String,
    pub error: String,
}

/// Result of `chanpack template list --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateListOutput {
    pub templates: Vec<TemplateRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub invalid: Vec<InvalidTemplateRecord>,
}

/// Result of `chanpack template validate --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidateOutput {
    pub path: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One row of `chanpack channels --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelRecord {
    pub semantic_type: String,
    pub label: String,
    pub default: f64,
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON output")?;
    println!("{}", json);
    Ok(())
}
