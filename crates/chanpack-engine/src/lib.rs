//! chanpack packing engine
//!
//! Packs independent grayscale PBR maps (ambient occlusion, roughness,
//! metallic, ...) into the color planes of one RGB or RGBA image according to
//! a [`PackingTemplate`], and reverses the process.
//!
//! # Features
//!
//! - **Packing**: template-driven, with per-channel default fills for missing maps
//! - **Unpacking**: splits packed images back into named maps, auto-extracting
//!   an alpha plane the template does not assign
//! - **Resolution normalization**: bilinear resize to the largest size supplied,
//!   or a strict policy that rejects mismatches
//! - **Deterministic PNG**: fixed encoder settings for byte-identical output
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use chanpack_engine::{pack_texture_from_template, unpack_texture, ChannelArray, ChannelSource};
//! use chanpack_template::{builtin, ChannelRegistry};
//!
//! let orm = builtin::orm(&ChannelRegistry::builtin()).unwrap();
//! let mut sources = HashMap::new();
//! sources.insert(
//!     "metallic".to_string(),
//!     ChannelSource::from(ChannelArray::filled(8, 8, 255)),
//! );
//!
//! let packed = pack_texture_from_template(sources, &orm).unwrap();
//! let maps = unpack_texture(&packed, &orm).unwrap();
//!
//! assert_eq!(maps.get("metallic").unwrap().get(3, 3), 255);
//! assert_eq!(maps.get("ambient_occlusion").unwrap().get(3, 3), 255);
//! ```

pub mod buffer;
pub mod error;
pub mod io;
pub mod packing;
pub mod png;
pub mod resize;
pub mod unpacking;
pub mod validator;

pub use buffer::{unit_to_u8, ChannelArray, PackedImage, PlaneLayout, MIDPOINT_FILL};
pub use chanpack_template::{PackingTemplate, Plane};
pub use error::EngineError;
pub use io::{is_png_path, load_channel, load_image, load_packed, save_channel, save_packed};
pub use packing::{
    create_default_channel, pack_channels, pack_channels_with, pack_texture_from_template,
    pack_texture_from_template_with, resolve_source, ChannelSource, PackOptions, PlaneChannels,
    ResolutionPolicy, DEFAULT_CANVAS,
};
pub use png::{PngConfig, PngError};
pub use resize::{normalize_resolution, resize_bilinear};
pub use unpacking::{extract_channel, unpack_texture, UnpackedChannel, UnpackedChannels, AUTO_ALPHA_KEY};
pub use validator::{
    check_resolution_match, get_max_resolution, validate_arrays_for_packing,
    validate_channel_data, validate_unit_values,
};
