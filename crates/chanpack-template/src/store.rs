//! JSON template store.
//!
//! Templates are stored as:
//!
//! ```json
//! {
//!   "name": "ORM",
//!   "description": "...",
//!   "channels": {
//!     "R": { "type": "ambient_occlusion", "default": 1.0 },
//!     "G": { "type": "roughness", "default": 0.5 },
//!     "B": { "type": "metallic", "default": 0.0 }
//!   }
//! }
//! ```
//!
//! All template validation happens here, at load time. A channel entry may be
//! `null` to mark a plane as explicitly unused.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::channel::{derived_label, ChannelDescriptor};
use crate::error::TemplateError;
use crate::template::{PackingTemplate, Plane};

/// One channel entry of a template file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDefinition {
    /// Semantic type name.
    #[serde(rename = "type")]
    pub channel_type: String,
    /// Default fill value (0.0 to 1.0).
    pub default: f64,
    /// Optional label, written only when it differs from the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The serialized form of a template, with channels in R, G, B, A order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateDefinition {
    /// Template name.
    pub name: String,
    /// Template description.
    pub description: String,
    /// Assigned planes.
    pub channels: BTreeMap<Plane, ChannelDefinition>,
}

impl TemplateDefinition {
    /// Builds the serialized form of a template. Unassigned planes are omitted.
    pub fn from_template(template: &PackingTemplate) -> Self {
        let channels = template
            .used_channels()
            .map(|(plane, channel)| {
                let description = channel
                    .description()
                    .filter(|d| *d != derived_label(channel.semantic_type()))
                    .map(str::to_string);
                (
                    plane,
                    ChannelDefinition {
                        channel_type: channel.semantic_type().to_string(),
                        default: channel.default_value(),
                        description,
                    },
                )
            })
            .collect();

        Self {
            name: template.name().to_string(),
            description: template.description().to_string(),
            channels,
        }
    }
}

/// Input form: plane keys are parsed by hand so a bad key gets a precise error.
#[derive(Debug, Deserialize)]
struct RawTemplate {
    name: String,
    description: String,
    channels: BTreeMap<String, Option<ChannelDefinition>>,
}

/// Parses and validates a template from a JSON string.
pub fn parse_template(json: &str) -> Result<PackingTemplate, TemplateError> {
    parse_with_origin(json, "<string>")
}

fn parse_with_origin(json: &str, origin: &str) -> Result<PackingTemplate, TemplateError> {
    let raw: RawTemplate = serde_json::from_str(json).map_err(|e| {
        TemplateError::Validation(format!("{}: malformed template definition: {}", origin, e))
    })?;

    if raw.channels.is_empty() {
        return Err(TemplateError::Validation(format!(
            "{}: template '{}' has an empty 'channels' object",
            origin, raw.name
        )));
    }

    let mut assignments = BTreeMap::new();
    for (key, entry) in raw.channels {
        let plane: Plane = key.parse().map_err(|_| {
            TemplateError::Validation(format!(
                "{}: invalid channel key '{}', valid keys are R, G, B, A",
                origin, key
            ))
        })?;

        let Some(def) = entry else {
            continue;
        };

        let mut channel = ChannelDescriptor::new(&def.channel_type, def.default).map_err(|e| {
            TemplateError::Validation(format!("{}: channel '{}': {}", origin, plane, e))
        })?;
        if let Some(description) = def.description {
            channel = channel.described(description);
        }
        assignments.insert(plane, channel);
    }

    PackingTemplate::new(raw.name, raw.description, assignments).map_err(|e| match e {
        TemplateError::Validation(msg) => TemplateError::Validation(format!("{}: {}", origin, msg)),
        other => other,
    })
}

/// Serializes a template to pretty JSON with a trailing newline.
pub fn template_to_json(template: &PackingTemplate) -> Result<String, TemplateError> {
    let mut json = serde_json::to_string_pretty(&TemplateDefinition::from_template(template))?;
    json.push('\n');
    Ok(json)
}

/// Loads and validates a template file.
///
/// A missing file is reported as [`TemplateError::NotFound`], distinct from
/// a file that exists but is invalid.
pub fn load_template(path: &Path) -> Result<PackingTemplate, TemplateError> {
    if !path.exists() {
        return Err(TemplateError::NotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let template = parse_with_origin(&json, &path.display().to_string())?;
    debug!(template = template.name(), path = %path.display(), "loaded template");
    Ok(template)
}

/// Writes a template file, creating parent directories as needed.
pub fn save_template(template: &PackingTemplate, path: &Path) -> Result<(), TemplateError> {
    let json = template_to_json(template)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TemplateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(template = template.name(), path = %path.display(), "saved template");
    Ok(())
}

/// Checks that a template file loads cleanly.
pub fn validate_template_file(path: &Path) -> Result<(), TemplateError> {
    load_template(path).map(|_| ())
}

/// Finds every `*.json` file under `dir` and tries to load it as a template.
///
/// Results are sorted by path. Invalid files are returned as errors rather
/// than aborting the scan.
pub fn discover_templates(
    dir: &Path,
) -> Result<Vec<(PathBuf, Result<PackingTemplate, TemplateError>)>, TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::NotFound(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| TemplateError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();

    debug!(dir = %dir.display(), count = paths.len(), "discovered template files");
    Ok(paths
        .into_iter()
        .map(|path| {
            let result = load_template(&path);
            (path, result)
        })
        .collect())
}
