//! Packing templates: which semantic channel lives in which image plane.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::channel::ChannelDescriptor;
use crate::error::TemplateError;

/// One color plane of an 8-bit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Plane {
    /// Red plane.
    R,
    /// Green plane.
    G,
    /// Blue plane.
    B,
    /// Alpha plane.
    A,
}

impl Plane {
    /// All planes in interleaving order.
    pub const ALL: [Plane; 4] = [Plane::R, Plane::G, Plane::B, Plane::A];

    /// The color planes, without alpha.
    pub const COLOR: [Plane; 3] = [Plane::R, Plane::G, Plane::B];

    /// Offset of this plane within an interleaved pixel.
    pub fn index(&self) -> usize {
        match self {
            Plane::R => 0,
            Plane::G => 1,
            Plane::B => 2,
            Plane::A => 3,
        }
    }

    /// Returns the single-letter key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Plane::R => "R",
            Plane::G => "G",
            Plane::B => "B",
            Plane::A => "A",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plane {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(Plane::R),
            "G" => Ok(Plane::G),
            "B" => Ok(Plane::B),
            "A" => Ok(Plane::A),
            other => Err(TemplateError::InvalidPlaneKey(other.to_string())),
        }
    }
}

/// A named mapping from image planes to channel descriptors.
///
/// Construction enforces that at least one of R/G/B is assigned and that no
/// semantic type appears on two planes. Templates are not mutated after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingTemplate {
    name: String,
    description: String,
    assignments: BTreeMap<Plane, ChannelDescriptor>,
}

impl PackingTemplate {
    /// Creates a template from a plane assignment map.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        assignments: BTreeMap<Plane, ChannelDescriptor>,
    ) -> Result<Self, TemplateError> {
        let name = name.into();

        if !Plane::COLOR.iter().any(|p| assignments.contains_key(p)) {
            return Err(TemplateError::Validation(format!(
                "template '{}' must assign at least one of the R, G, B planes",
                name
            )));
        }

        {
            let mut seen = HashSet::new();
            for (plane, channel) in &assignments {
                if !is_valid_semantic_type(channel.semantic_type()) {
                    return Err(TemplateError::Validation(format!(
                        "template '{}' plane {}: channel type '{}' must be non-empty and use only ASCII letters, digits, '_' or '-'",
                        name,
                        plane,
                        channel.semantic_type()
                    )));
                }
                if !seen.insert(channel.semantic_type()) {
                    return Err(TemplateError::Validation(format!(
                        "template '{}' assigns channel type '{}' to more than one plane (again on {})",
                        name,
                        channel.semantic_type(),
                        plane
                    )));
                }
            }
        }

        Ok(Self {
            name,
            description: description.into(),
            assignments,
        })
    }

    /// Starts building a template in code.
    pub fn builder(name: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder {
            name: name.into(),
            description: String::new(),
            assignments: BTreeMap::new(),
        }
    }

    /// Template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the descriptor assigned to `plane`, or `None` if unassigned.
    pub fn get_channel(&self, plane: Plane) -> Option<&ChannelDescriptor> {
        self.assignments.get(&plane)
    }

    /// Like [`get_channel`](Self::get_channel) but takes a plane key string.
    ///
    /// Only the key itself can fail; an unassigned plane is `Ok(None)`.
    pub fn get_channel_by_key(&self, key: &str) -> Result<Option<&ChannelDescriptor>, TemplateError> {
        let plane: Plane = key.parse()?;
        Ok(self.get_channel(plane))
    }

    /// Returns true if `plane` has a descriptor.
    pub fn is_channel_used(&self, plane: Plane) -> bool {
        self.assignments.contains_key(&plane)
    }

    /// Returns true iff the alpha plane is assigned.
    pub fn is_rgba(&self) -> bool {
        self.is_channel_used(Plane::A)
    }

    /// Iterates assigned planes in R, G, B, A order.
    pub fn used_channels(&self) -> impl Iterator<Item = (Plane, &ChannelDescriptor)> {
        self.assignments.iter().map(|(plane, channel)| (*plane, channel))
    }

    /// Finds the plane carrying a semantic type.
    pub fn plane_of(&self, semantic_type: &str) -> Option<Plane> {
        self.used_channels()
            .find(|(_, channel)| channel.semantic_type() == semantic_type)
            .map(|(plane, _)| plane)
    }
}

impl fmt::Display for PackingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self
            .used_channels()
            .map(|(plane, channel)| format!("{} ({})", plane, channel.semantic_type()))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}: {}\nChannels: {}", self.name, self.description, channels)
    }
}

/// Semantic types name unpacked maps and their output files, so they are
/// restricted to `[A-Za-z0-9_-]+`.
pub fn is_valid_semantic_type(semantic_type: &str) -> bool {
    !semantic_type.is_empty()
        && semantic_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Builder for [`PackingTemplate`].
pub struct TemplateBuilder {
    name: String,
    description: String,
    assignments: BTreeMap<Plane, ChannelDescriptor>,
}

impl TemplateBuilder {
    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Assigns a descriptor to a plane, replacing any earlier assignment.
    pub fn channel(mut self, plane: Plane, descriptor: ChannelDescriptor) -> Self {
        self.assignments.insert(plane, descriptor);
        self
    }

    /// Validates and builds the template.
    pub fn build(self) -> Result<PackingTemplate, TemplateError> {
        PackingTemplate::new(self.name, self.description, self.assignments)
    }
}
