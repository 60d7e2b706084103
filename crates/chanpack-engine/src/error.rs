//! Error types for the packing and unpacking engines.

use std::path::PathBuf;

use chanpack_template::InvalidDefaultError;
use thiserror::Error;

use crate::buffer::PlaneLayout;
use crate::png::PngError;

/// Errors from validation, packing, unpacking, and image I/O.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A channel array has an invalid shape or out-of-range values.
    #[error("invalid channel data: {0}")]
    InvalidChannelData(String),

    /// Channel arrays differ in size and normalization was not allowed.
    #[error("all channels must have the same resolution, found {}", format_resolutions(.resolutions))]
    ResolutionMismatch {
        /// Every resolution seen, in input order.
        resolutions: Vec<(u32, u32)>,
    },

    /// The alpha plane was requested from an image that has none.
    #[error("cannot extract the alpha plane from a {layout} image")]
    MissingAlpha {
        /// Layout of the image that was asked for alpha.
        layout: PlaneLayout,
    },

    /// No channel arrays were supplied where at least one is required.
    #[error("at least one channel must be provided")]
    NoChannels,

    /// No source was present and no fallback size was configured.
    #[error("no channel sources were provided and no fallback size is configured")]
    NoResolvableSize,

    /// A default fill value is out of range.
    #[error(transparent)]
    InvalidDefault(#[from] InvalidDefaultError),

    /// An image file does not exist.
    #[error("image file not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// An image file could not be decoded.
    #[error("failed to load image from {}: {source}", path.display())]
    ImageDecode {
        /// The file being read.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },

    /// An image could not be encoded in a non-PNG format.
    #[error("failed to save image to {}: {source}", path.display())]
    ImageEncode {
        /// The file being written.
        path: PathBuf,
        /// The encoder error.
        #[source]
        source: image::ImageError,
    },

    /// PNG encoding failed.
    #[error(transparent)]
    Png(#[from] PngError),

    /// Filesystem access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_resolutions(resolutions: &[(u32, u32)]) -> String {
    resolutions
        .iter()
        .map(|(w, h)| format!("{}x{}", w, h))
        .collect::<Vec<_>>()
        .join(", ")
}
