//! Channel descriptors: semantic texture map types and their default fill values.
//!
//! A [`ChannelDescriptor`] names the meaning of a grayscale plane (roughness,
//! metallic, ...) and the value used when no source texture is supplied for it.
//! The seven standard PBR types are a closed [`ChannelPreset`] set; anything
//! else is a custom type.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::InvalidDefaultError;

/// The built-in semantic channel types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelPreset {
    /// Ambient occlusion, fully unoccluded by default.
    AmbientOcclusion,
    /// Surface roughness, mid-rough by default.
    Roughness,
    /// Metalness, dielectric by default.
    Metallic,
    /// Displacement, neutral mid-level by default.
    Displacement,
    /// Height, neutral mid-level by default.
    Height,
    /// Opacity, fully opaque by default.
    Opacity,
    /// Alpha, fully opaque by default.
    Alpha,
}

impl ChannelPreset {
    /// All presets in table order.
    pub const ALL: [ChannelPreset; 7] = [
        ChannelPreset::AmbientOcclusion,
        ChannelPreset::Roughness,
        ChannelPreset::Metallic,
        ChannelPreset::Displacement,
        ChannelPreset::Height,
        ChannelPreset::Opacity,
        ChannelPreset::Alpha,
    ];

    /// Returns the semantic type name (e.g. `"ambient_occlusion"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelPreset::AmbientOcclusion => "ambient_occlusion",
            ChannelPreset::Roughness => "roughness",
            ChannelPreset::Metallic => "metallic",
            ChannelPreset::Displacement => "displacement",
            ChannelPreset::Height => "height",
            ChannelPreset::Opacity => "opacity",
            ChannelPreset::Alpha => "alpha",
        }
    }

    /// Returns the canonical default fill value.
    pub fn default_value(&self) -> f64 {
        match self {
            ChannelPreset::AmbientOcclusion => 1.0,
            ChannelPreset::Roughness => 0.5,
            ChannelPreset::Metallic => 0.0,
            ChannelPreset::Displacement => 0.5,
            ChannelPreset::Height => 0.5,
            ChannelPreset::Opacity => 1.0,
            ChannelPreset::Alpha => 1.0,
        }
    }

    /// Looks up a preset by its semantic type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for ChannelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The semantic type of a channel: one of the presets, or a custom name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// A built-in type.
    Preset(ChannelPreset),
    /// A user-defined type name.
    Custom(String),
}

impl ChannelKind {
    /// Parses a type name, preferring the preset variant when one matches.
    pub fn parse(name: &str) -> Self {
        match ChannelPreset::from_name(name) {
            Some(preset) => ChannelKind::Preset(preset),
            None => ChannelKind::Custom(name.to_string()),
        }
    }

    /// Returns the semantic type name.
    pub fn as_str(&self) -> &str {
        match self {
            ChannelKind::Preset(preset) => preset.as_str(),
            ChannelKind::Custom(name) => name,
        }
    }
}

/// A semantic channel type together with its default fill value.
///
/// Descriptors are immutable once built; templates hold them by value.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDescriptor {
    kind: ChannelKind,
    default_value: f64,
    description: Option<String>,
}

impl ChannelDescriptor {
    /// Creates a descriptor for any semantic type.
    ///
    /// Fails if `default_value` is not a finite number in `[0.0, 1.0]`.
    pub fn new(semantic_type: &str, default_value: f64) -> Result<Self, InvalidDefaultError> {
        Self::with_kind(ChannelKind::parse(semantic_type), default_value)
    }

    /// Creates a descriptor from an already-parsed kind.
    pub fn with_kind(kind: ChannelKind, default_value: f64) -> Result<Self, InvalidDefaultError> {
        if !(0.0..=1.0).contains(&default_value) {
            return Err(InvalidDefaultError {
                value: default_value,
            });
        }
        Ok(Self {
            kind,
            default_value,
            description: None,
        })
    }

    /// Creates the canonical descriptor for a preset.
    pub fn preset(preset: ChannelPreset) -> Self {
        Self {
            kind: ChannelKind::Preset(preset),
            default_value: preset.default_value(),
            description: None,
        }
    }

    /// Attaches a human-readable description.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the semantic kind.
    pub fn kind(&self) -> &ChannelKind {
        &self.kind
    }

    /// Returns the semantic type name.
    pub fn semantic_type(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the default fill value in `[0.0, 1.0]`.
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Returns the explicit description, if one was set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the display label: the explicit description, or one derived
    /// from the type name (`ambient_occlusion` becomes `Ambient Occlusion`).
    pub fn label(&self) -> String {
        match &self.description {
            Some(d) => d.clone(),
            None => derived_label(self.semantic_type()),
        }
    }
}

impl fmt::Display for ChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (default: {})", self.label(), self.default_value)
    }
}

/// Builds a title-cased label from a snake_case type name.
pub fn derived_label(semantic_type: &str) -> String {
    semantic_type
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A lookup table of channel descriptors keyed by semantic type.
///
/// The table is passed explicitly to whatever needs it; there is no global
/// registry.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    entries: BTreeMap<String, ChannelDescriptor>,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the seven built-in presets.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for preset in ChannelPreset::ALL {
            registry.register(ChannelDescriptor::preset(preset));
        }
        registry
    }

    /// Adds or replaces a descriptor, returning the one it replaced.
    pub fn register(&mut self, descriptor: ChannelDescriptor) -> Option<ChannelDescriptor> {
        self.entries
            .insert(descriptor.semantic_type().to_string(), descriptor)
    }

    /// Looks up a descriptor by semantic type.
    pub fn get(&self, semantic_type: &str) -> Option<&ChannelDescriptor> {
        self.entries.get(semantic_type)
    }

    /// Returns true if the semantic type is registered.
    pub fn contains(&self, semantic_type: &str) -> bool {
        self.entries.contains_key(semantic_type)
    }

    /// Iterates descriptors in semantic-type order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelDescriptor> {
        self.entries.values()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
