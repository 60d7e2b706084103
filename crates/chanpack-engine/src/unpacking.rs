//! Channel unpacking: splitting a packed image back into named maps.

use std::collections::BTreeMap;

use chanpack_template::{PackingTemplate, Plane};
use tracing::{debug, info, instrument};

use crate::buffer::{ChannelArray, PackedImage};
use crate::error::EngineError;

/// Key under which [`UnpackedChannels::into_map`] stores an alpha plane the
/// template did not assign.
pub const AUTO_ALPHA_KEY: &str = "alpha";

/// Copies one plane out of a packed image.
///
/// Fails with [`EngineError::MissingAlpha`] when asked for `A` on an RGB
/// image.
pub fn extract_channel(image: &PackedImage, plane: Plane) -> Result<ChannelArray, EngineError> {
    if plane == Plane::A && !image.has_alpha() {
        return Err(EngineError::MissingAlpha {
            layout: image.layout,
        });
    }
    let count = image.layout.plane_count();
    let expected = image.width as usize * image.height as usize * count;
    if image.width == 0 || image.height == 0 || image.data.len() != expected {
        return Err(EngineError::InvalidChannelData(format!(
            "packed {}x{} {} image needs {} bytes, got {}",
            image.width,
            image.height,
            image.layout,
            expected,
            image.data.len()
        )));
    }

    let data = image
        .data
        .chunks_exact(count)
        .map(|px| px[plane.index()])
        .collect();
    Ok(ChannelArray {
        width: image.width,
        height: image.height,
        data,
    })
}

/// One map recovered from a template-assigned plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedChannel {
    /// Plane the map was read from.
    pub plane: Plane,
    /// Semantic type the template assigns to that plane.
    pub semantic_type: String,
    /// The map itself.
    pub data: ChannelArray,
}

/// Result of [`unpack_texture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackedChannels {
    /// Template-assigned maps in plane order.
    pub channels: Vec<UnpackedChannel>,
    /// The alpha plane of an RGBA input whose template leaves `A` unassigned.
    pub auto_alpha: Option<ChannelArray>,
}

impl UnpackedChannels {
    /// Looks up a map by semantic type.
    pub fn get(&self, semantic_type: &str) -> Option<&ChannelArray> {
        self.channels
            .iter()
            .find(|c| c.semantic_type == semantic_type)
            .map(|c| &c.data)
    }

    /// Number of maps, counting an auto-extracted alpha plane.
    pub fn len(&self) -> usize {
        self.channels.len() + usize::from(self.auto_alpha.is_some())
    }

    /// Returns true if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens into a map keyed by semantic type.
    ///
    /// The auto-extracted alpha plane goes under the first free key of
    /// [`AUTO_ALPHA_KEY`], `"A"`, `"alpha_2"`, `"alpha_3"`, ...; it never
    /// replaces a template channel, so the map always holds [`len`](Self::len)
    /// entries.
    pub fn into_map(self) -> BTreeMap<String, ChannelArray> {
        let mut map: BTreeMap<String, ChannelArray> = self
            .channels
            .into_iter()
            .map(|c| (c.semantic_type, c.data))
            .collect();
        if let Some(alpha) = self.auto_alpha {
            let key = auto_alpha_key(|key| map.contains_key(key));
            map.insert(key, alpha);
        }
        map
    }
}

fn auto_alpha_key(taken: impl Fn(&str) -> bool) -> String {
    [AUTO_ALPHA_KEY, Plane::A.as_str()]
        .into_iter()
        .map(str::to_string)
        .chain((2..).map(|n| format!("{}_{}", AUTO_ALPHA_KEY, n)))
        .find(|key| !taken(key))
        .unwrap_or_else(|| AUTO_ALPHA_KEY.to_string())
}

/// Splits a packed image into the maps its template assigns.
///
/// An alpha plane the template does not assign is returned as
/// [`UnpackedChannels::auto_alpha`]. A template that assigns `A` fails with
/// [`EngineError::MissingAlpha`] on an RGB image.
#[instrument(skip_all, fields(template = template.name(), layout = %image.layout))]
pub fn unpack_texture(
    image: &PackedImage,
    template: &PackingTemplate,
) -> Result<UnpackedChannels, EngineError> {
    let mut channels = Vec::new();
    for (plane, channel) in template.used_channels() {
        debug!(plane = %plane, channel = channel.semantic_type(), "extracting");
        channels.push(UnpackedChannel {
            plane,
            semantic_type: channel.semantic_type().to_string(),
            data: extract_channel(image, plane)?,
        });
    }

    let auto_alpha = if image.has_alpha() && !template.is_channel_used(Plane::A) {
        info!("template does not assign alpha, extracting it separately");
        Some(extract_channel(image, Plane::A)?)
    } else {
        None
    };

    Ok(UnpackedChannels {
        channels,
        auto_alpha,
    })
}
