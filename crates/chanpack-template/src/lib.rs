//! chanpack template library
//!
//! This crate defines what a channel-packed texture contains: the semantic
//! channel types (roughness, metallic, ...) with their default fill values,
//! packing templates that assign those channels to image planes, and the JSON
//! store that loads and saves templates.
//!
//! # Example
//!
//! ```
//! use chanpack_template::{builtin, ChannelRegistry, Plane};
//!
//! let registry = ChannelRegistry::builtin();
//! let orm = builtin::orm(&registry).unwrap();
//!
//! assert_eq!(orm.get_channel(Plane::G).unwrap().semantic_type(), "roughness");
//! assert!(!orm.is_rgba());
//! ```
//!
//! # Modules
//!
//! - [`channel`]: channel descriptors, presets, and the descriptor registry
//! - [`template`]: planes and packing templates
//! - [`builtin`]: the ORM and ORD templates
//! - [`store`]: JSON load/save/validation and template discovery
//! - [`error`]: error types

pub mod builtin;
pub mod channel;
pub mod error;
pub mod store;
pub mod template;

pub use channel::{ChannelDescriptor, ChannelKind, ChannelPreset, ChannelRegistry};
pub use error::{InvalidDefaultError, TemplateError};
pub use store::{
    discover_templates, load_template, parse_template, save_template, template_to_json,
    validate_template_file, ChannelDefinition, TemplateDefinition,
};
pub use template::{is_valid_semantic_type, PackingTemplate, Plane, TemplateBuilder};
