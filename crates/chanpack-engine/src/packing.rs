//! Channel packing: combining grayscale maps into the planes of one image.
//!
//! Two levels are provided. [`pack_channels`] stacks up to four arrays into an
//! RGB or RGBA image and knows nothing about templates: a missing R, G, or B
//! plane is filled with zeros, and the output has alpha only if an alpha
//! array was given. [`pack_texture_from_template`] resolves named sources
//! against a [`PackingTemplate`], fills every assigned plane that has no
//! source with that channel's default value, and then delegates to the
//! primitive.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use chanpack_engine::{pack_texture_from_template, ChannelArray, ChannelSource};
//! use chanpack_template::{builtin, ChannelRegistry};
//!
//! let orm = builtin::orm(&ChannelRegistry::builtin()).unwrap();
//! let mut sources = HashMap::new();
//! sources.insert(
//!     "roughness".to_string(),
//!     ChannelSource::from(ChannelArray::filled(4, 4, 200)),
//! );
//!
//! let packed = pack_texture_from_template(sources, &orm).unwrap();
//! assert_eq!(packed.pixel(0, 0), &[255, 200, 0]);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chanpack_template::{InvalidDefaultError, PackingTemplate, Plane};
use image::DynamicImage;
use tracing::{debug, instrument, warn};

use crate::buffer::{unit_to_u8, ChannelArray, PackedImage};
use crate::error::EngineError;
use crate::io::load_channel;
use crate::resize::normalize_resolution;
use crate::validator::{check_resolution_match, get_max_resolution, validate_channel_data};

/// Canvas size used when a template pack has no sources at all.
pub const DEFAULT_CANVAS: (u32, u32) = (1024, 1024);

/// What to do when supplied channels differ in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Resize every channel to the largest width and height supplied.
    #[default]
    Normalize,
    /// Fail with [`EngineError::ResolutionMismatch`].
    Strict,
}

/// Packing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOptions {
    /// Mismatched-resolution handling.
    pub policy: ResolutionPolicy,
    /// Output size when no source is present. `None` makes that case an error.
    pub fallback_size: Option<(u32, u32)>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            policy: ResolutionPolicy::Normalize,
            fallback_size: Some(DEFAULT_CANVAS),
        }
    }
}

impl PackOptions {
    /// Default options with the strict resolution policy.
    pub fn strict() -> Self {
        Self {
            policy: ResolutionPolicy::Strict,
            ..Self::default()
        }
    }
}

/// Optional arrays for the four planes of a packed image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaneChannels {
    /// Red plane source.
    pub r: Option<ChannelArray>,
    /// Green plane source.
    pub g: Option<ChannelArray>,
    /// Blue plane source.
    pub b: Option<ChannelArray>,
    /// Alpha plane source; `None` means the output has no alpha plane.
    pub a: Option<ChannelArray>,
}

impl PlaneChannels {
    /// Create from color planes only.
    pub fn new(r: Option<ChannelArray>, g: Option<ChannelArray>, b: Option<ChannelArray>) -> Self {
        Self { r, g, b, a: None }
    }

    /// Create with an alpha plane.
    pub fn with_alpha(
        r: Option<ChannelArray>,
        g: Option<ChannelArray>,
        b: Option<ChannelArray>,
        a: ChannelArray,
    ) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    fn into_slots(self) -> [Option<ChannelArray>; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Where a channel's pixels come from.
#[derive(Debug, Clone)]
pub enum ChannelSource {
    /// An image file to decode.
    Path(PathBuf),
    /// An already-decoded image; color images are reduced to luminance.
    Image(DynamicImage),
    /// A ready channel array.
    Array(ChannelArray),
}

impl ChannelSource {
    /// Create a file path source.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ChannelSource::Path(path.into())
    }
}

impl From<ChannelArray> for ChannelSource {
    fn from(array: ChannelArray) -> Self {
        ChannelSource::Array(array)
    }
}

impl From<DynamicImage> for ChannelSource {
    fn from(image: DynamicImage) -> Self {
        ChannelSource::Image(image)
    }
}

impl From<PathBuf> for ChannelSource {
    fn from(path: PathBuf) -> Self {
        ChannelSource::Path(path)
    }
}

/// Turns a channel source into a validated channel array.
pub fn resolve_source(source: ChannelSource) -> Result<ChannelArray, EngineError> {
    let array = match source {
        ChannelSource::Path(path) => load_channel(&path)?,
        ChannelSource::Image(image) => ChannelArray::from_image(&image),
        ChannelSource::Array(array) => array,
    };
    validate_channel_data(&array)?;
    Ok(array)
}

/// Creates a `width x height` plane filled with a normalized default value.
pub fn create_default_channel(size: (u32, u32), default_value: f64) -> Result<ChannelArray, EngineError> {
    if !(0.0..=1.0).contains(&default_value) {
        return Err(InvalidDefaultError {
            value: default_value,
        }
        .into());
    }
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidChannelData(format!(
            "cannot create a {}x{} default channel",
            width, height
        )));
    }
    Ok(ChannelArray::filled(width, height, unit_to_u8(default_value)))
}

/// Stacks up to four planes into an RGB or RGBA image.
///
/// Missing R/G/B planes are zero; the output is RGBA iff `a` is given.
/// Channels of different sizes are resized to the largest width and height.
pub fn pack_channels(
    r: Option<ChannelArray>,
    g: Option<ChannelArray>,
    b: Option<ChannelArray>,
    a: Option<ChannelArray>,
) -> Result<PackedImage, EngineError> {
    pack_channels_with(PlaneChannels { r, g, b, a }, &PackOptions::default())
}

/// [`pack_channels`] with explicit options.
#[instrument(skip_all, fields(policy = ?options.policy))]
pub fn pack_channels_with(
    channels: PlaneChannels,
    options: &PackOptions,
) -> Result<PackedImage, EngineError> {
    let slots = channels.into_slots();

    let target = {
        let present: Vec<&ChannelArray> = slots.iter().flatten().collect();
        if present.is_empty() {
            return Err(EngineError::NoChannels);
        }
        for array in &present {
            validate_channel_data(array)?;
        }
        let target = get_max_resolution(&present)?;
        if !check_resolution_match(&present) {
            if options.policy == ResolutionPolicy::Strict {
                return Err(EngineError::ResolutionMismatch {
                    resolutions: present.iter().map(|a| a.dimensions()).collect(),
                });
            }
            debug!(width = target.0, height = target.1, "normalizing channels to max resolution");
        }
        target
    };

    let (indices, arrays): (Vec<usize>, Vec<ChannelArray>) = slots
        .into_iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.map(|array| (i, array)))
        .unzip();
    let mut normalized: [Option<ChannelArray>; 4] = Default::default();
    for (i, array) in indices.into_iter().zip(normalize_resolution(arrays, target)?) {
        normalized[i] = Some(array);
    }

    let [r, g, b, a] = normalized;
    let zero = || ChannelArray::filled(target.0, target.1, 0);
    let r = r.unwrap_or_else(zero);
    let g = g.unwrap_or_else(zero);
    let b = b.unwrap_or_else(zero);

    let mut planes = vec![&r, &g, &b];
    if let Some(alpha) = &a {
        planes.push(alpha);
    }
    PackedImage::from_planes(&planes)
}

/// Packs named sources according to a template.
///
/// `sources` is keyed by semantic type (`"roughness"`) or plane key (`"G"`);
/// the semantic type wins if both are given. Every assigned plane without a
/// source is filled with its channel's default at the target resolution,
/// which is the largest size among the sources present, or
/// [`PackOptions::fallback_size`] when there are none. The output is RGBA iff
/// the template assigns the alpha plane.
pub fn pack_texture_from_template(
    sources: HashMap<String, ChannelSource>,
    template: &PackingTemplate,
) -> Result<PackedImage, EngineError> {
    pack_texture_from_template_with(sources, template, &PackOptions::default())
}

/// [`pack_texture_from_template`] with explicit options.
#[instrument(skip_all, fields(template = template.name()))]
pub fn pack_texture_from_template_with(
    mut sources: HashMap<String, ChannelSource>,
    template: &PackingTemplate,
    options: &PackOptions,
) -> Result<PackedImage, EngineError> {
    let mut resolved: BTreeMap<Plane, ChannelArray> = BTreeMap::new();
    for (plane, channel) in template.used_channels() {
        let source = sources
            .remove(channel.semantic_type())
            .or_else(|| sources.remove(plane.as_str()));
        if let Some(source) = source {
            resolved.insert(plane, resolve_source(source)?);
        }
    }
    for key in sources.keys() {
        warn!(key = %key, "ignoring source not used by template");
    }

    let target = if resolved.is_empty() {
        options.fallback_size.ok_or(EngineError::NoResolvableSize)?
    } else {
        let present: Vec<&ChannelArray> = resolved.values().collect();
        get_max_resolution(&present)?
    };
    debug!(
        supplied = resolved.len(),
        width = target.0,
        height = target.1,
        "resolved template sources"
    );

    let mut take = |plane: Plane| -> Result<Option<ChannelArray>, EngineError> {
        match (resolved.remove(&plane), template.get_channel(plane)) {
            (Some(array), _) => Ok(Some(array)),
            (None, Some(channel)) => {
                debug!(plane = %plane, channel = channel.semantic_type(), "filling default");
                create_default_channel(target, channel.default_value()).map(Some)
            }
            (None, None) => Ok(None),
        }
    };

    let channels = PlaneChannels {
        r: take(Plane::R)?,
        g: take(Plane::G)?,
        b: take(Plane::B)?,
        a: take(Plane::A)?,
    };
    pack_channels_with(channels, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{PlaneLayout, MIDPOINT_FILL};
    use chanpack_template::{builtin, ChannelDescriptor, ChannelPreset, ChannelRegistry};
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn orm() -> PackingTemplate {
        builtin::orm(&ChannelRegistry::builtin()).unwrap()
    }

    fn sources(entries: Vec<(&str, ChannelSource)>) -> HashMap<String, ChannelSource> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_pack_channels_fills_missing_with_zero() {
        let a = ChannelArray::new(2, 2, vec![255; 4]).unwrap();
        let b = ChannelArray::new(2, 2, vec![0; 4]).unwrap();

        let packed = pack_channels(Some(a), Some(b), None, None).unwrap();
        assert_eq!(packed.dimensions(), (2, 2));
        assert_eq!(packed.layout, PlaneLayout::Rgb);
        assert_eq!(packed.pixel(0, 0), &[255, 0, 0]);
    }

    #[test]
    fn test_pack_channels_alpha_makes_rgba() {
        let alpha = ChannelArray::filled(3, 3, 77);
        let packed = pack_channels(None, Some(ChannelArray::filled(3, 3, 5)), None, Some(alpha))
            .unwrap();
        assert_eq!(packed.layout, PlaneLayout::Rgba);
        assert_eq!(packed.pixel(2, 2), &[0, 5, 0, 77]);
    }

    #[test]
    fn test_pack_channels_requires_a_channel() {
        assert!(matches!(
            pack_channels(None, None, None, None),
            Err(EngineError::NoChannels)
        ));
    }

    #[test]
    fn test_pack_channels_rejects_malformed_array() {
        let broken = ChannelArray {
            width: 2,
            height: 2,
            data: vec![0; 6],
        };
        assert!(matches!(
            pack_channels(Some(broken), None, None, None),
            Err(EngineError::InvalidChannelData(_))
        ));
    }

    #[test]
    fn test_pack_channels_normalizes_to_bounding_size() {
        let wide = ChannelArray::filled(8, 2, 10);
        let tall = ChannelArray::filled(2, 6, 20);
        let packed = pack_channels(Some(wide), Some(tall), None, None).unwrap();
        assert_eq!(packed.dimensions(), (8, 6));
        assert_eq!(packed.pixel(7, 5), &[10, 20, 0]);
    }

    #[test]
    fn test_strict_policy_rejects_mismatch() {
        let channels = PlaneChannels::new(
            Some(ChannelArray::filled(4, 4, 0)),
            Some(ChannelArray::filled(8, 8, 0)),
            None,
        );
        let err = pack_channels_with(channels, &PackOptions::strict()).unwrap_err();
        assert!(matches!(err, EngineError::ResolutionMismatch { .. }));

        let matching = PlaneChannels::new(
            Some(ChannelArray::filled(4, 4, 0)),
            Some(ChannelArray::filled(4, 4, 0)),
            None,
        );
        assert!(pack_channels_with(matching, &PackOptions::strict()).is_ok());
    }

    #[test]
    fn test_orm_defaults_with_no_sources() {
        let packed = pack_texture_from_template(HashMap::new(), &orm()).unwrap();
        assert_eq!(packed.dimensions(), DEFAULT_CANVAS);
        assert_eq!(packed.layout, PlaneLayout::Rgb);
        assert!(packed
            .data
            .chunks(3)
            .all(|px| px == [255, MIDPOINT_FILL, 0]));
    }

    #[test]
    fn test_no_sources_without_fallback_fails() {
        let options = PackOptions {
            fallback_size: None,
            ..PackOptions::default()
        };
        assert!(matches!(
            pack_texture_from_template_with(HashMap::new(), &orm(), &options),
            Err(EngineError::NoResolvableSize)
        ));
    }

    #[test]
    fn test_defaults_match_source_resolution() {
        let packed = pack_texture_from_template(
            sources(vec![("metallic", ChannelArray::filled(16, 8, 255).into())]),
            &orm(),
        )
        .unwrap();
        assert_eq!(packed.dimensions(), (16, 8));
        assert_eq!(packed.pixel(15, 7), &[255, 128, 255]);
    }

    #[test]
    fn test_plane_key_sources_and_precedence() {
        let packed = pack_texture_from_template(
            sources(vec![
                ("R", ChannelArray::filled(2, 2, 11).into()),
                ("G", ChannelArray::filled(2, 2, 22).into()),
                ("roughness", ChannelArray::filled(2, 2, 33).into()),
            ]),
            &orm(),
        )
        .unwrap();
        assert_eq!(packed.pixel(0, 0), &[11, 33, 0]);
    }

    #[test]
    fn test_image_sources_are_converted_to_luminance() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([90])));
        let color = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])));
        let packed = pack_texture_from_template(
            sources(vec![
                ("ambient_occlusion", gray.into()),
                ("roughness", color.into()),
            ]),
            &orm(),
        )
        .unwrap();
        assert_eq!(packed.pixel(1, 1), &[90, 76, 0]);
    }

    #[test]
    fn test_missing_path_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = pack_texture_from_template(
            sources(vec![("roughness", ChannelSource::path(dir.path().join("nope.png")))]),
            &orm(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::ImageNotFound(_)));
    }

    #[test]
    fn test_alpha_template_outputs_rgba_with_default() {
        let template = PackingTemplate::builder("MRA")
            .channel(Plane::R, ChannelDescriptor::preset(ChannelPreset::Metallic))
            .channel(Plane::A, ChannelDescriptor::preset(ChannelPreset::Opacity))
            .build()
            .unwrap();
        let packed = pack_texture_from_template(
            sources(vec![("metallic", ChannelArray::filled(4, 4, 9).into())]),
            &template,
        )
        .unwrap();
        assert_eq!(packed.layout, PlaneLayout::Rgba);
        // G and B are unassigned, so the primitive zero-fills them.
        assert_eq!(packed.pixel(0, 0), &[9, 0, 0, 255]);
    }

    #[test]
    fn test_create_default_channel() {
        let channel = create_default_channel((3, 2), 0.5).unwrap();
        assert_eq!(channel.dimensions(), (3, 2));
        assert!(channel.data.iter().all(|&v| v == MIDPOINT_FILL));
        assert!(matches!(
            create_default_channel((3, 2), 1.5),
            Err(EngineError::InvalidDefault(_))
        ));
        assert!(create_default_channel((0, 2), 0.5).is_err());
    }
}
