//! Built-in packing templates.

use crate::channel::{ChannelDescriptor, ChannelPreset, ChannelRegistry};
use crate::error::TemplateError;
use crate::template::{PackingTemplate, Plane};

/// Names of the built-in templates, in listing order.
pub const BUILTIN_NAMES: [&str; 2] = ["ORM", "ORD"];

fn descriptor(registry: &ChannelRegistry, preset: ChannelPreset) -> ChannelDescriptor {
    registry
        .get(preset.as_str())
        .cloned()
        .unwrap_or_else(|| ChannelDescriptor::preset(preset))
}

/// Occlusion / Roughness / Metallic.
pub fn orm(registry: &ChannelRegistry) -> Result<PackingTemplate, TemplateError> {
    PackingTemplate::builder("ORM")
        .description("Ambient Occlusion (R), Roughness (G), Metallic (B)")
        .channel(Plane::R, descriptor(registry, ChannelPreset::AmbientOcclusion))
        .channel(Plane::G, descriptor(registry, ChannelPreset::Roughness))
        .channel(Plane::B, descriptor(registry, ChannelPreset::Metallic))
        .build()
}

/// Occlusion / Roughness / Displacement.
pub fn ord(registry: &ChannelRegistry) -> Result<PackingTemplate, TemplateError> {
    PackingTemplate::builder("ORD")
        .description("Ambient Occlusion (R), Roughness (G), Displacement (B)")
        .channel(Plane::R, descriptor(registry, ChannelPreset::AmbientOcclusion))
        .channel(Plane::G, descriptor(registry, ChannelPreset::Roughness))
        .channel(Plane::B, descriptor(registry, ChannelPreset::Displacement))
        .build()
}

/// Looks up a built-in template by case-insensitive name.
///
/// Returns `Ok(None)` for names that are not built in. Presets missing from
/// `registry` fall back to their canonical defaults.
pub fn by_name(
    name: &str,
    registry: &ChannelRegistry,
) -> Result<Option<PackingTemplate>, TemplateError> {
    match name.to_ascii_uppercase().as_str() {
        "ORM" => orm(registry).map(Some),
        "ORD" => ord(registry).map(Some),
        _ => Ok(None),
    }
}

/// Builds every built-in template.
pub fn all(registry: &ChannelRegistry) -> Result<Vec<PackingTemplate>, TemplateError> {
    BUILTIN_NAMES
        .iter()
        .filter_map(|name| by_name(name, registry).transpose())
        .collect()
}
