//! Resolution normalization by bilinear resampling.
//!
//! Channel maps are stretched to the target size (no letterboxing) with a
//! pixel-center-aligned bilinear kernel. The same kernel is used for up- and
//! downscaling. Nearest-neighbor is too blocky for continuous material data,
//! and bicubic or Lanczos kernels ring on single-channel technical maps.

use tracing::debug;

use crate::buffer::ChannelArray;
use crate::error::EngineError;
use crate::validator::validate_channel_data;

/// Maps a destination index to a clamped source coordinate.
///
/// Pixel centers are aligned: `src = (dst + 0.5) * src_len / dst_len - 0.5`.
/// Samples past the edges clamp to the border pixel.
#[inline]
fn source_coord(dst_i: u32, src_len: u32, dst_len: u32) -> f32 {
    let scale = src_len as f32 / dst_len as f32;
    let max = (src_len - 1) as f32;
    ((dst_i as f32 + 0.5) * scale - 0.5).clamp(0.0, max)
}

/// Resamples one plane to `width x height` with bilinear interpolation.
///
/// The caller guarantees a valid source and non-zero target dimensions.
pub fn resize_bilinear(src: &ChannelArray, width: u32, height: u32) -> ChannelArray {
    let src_w = src.width;
    let src_h = src.height;
    let mut dst = ChannelArray::filled(width, height, 0);

    for y in 0..height {
        let sy = source_coord(y, src_h, height);
        let y0 = sy.floor() as u32;
        let y1 = (y0 + 1).min(src_h - 1);
        let fy = sy - y0 as f32;

        for x in 0..width {
            let sx = source_coord(x, src_w, width);
            let x0 = sx.floor() as u32;
            let x1 = (x0 + 1).min(src_w - 1);
            let fx = sx - x0 as f32;

            let p00 = src.get(x0, y0) as f32;
            let p10 = src.get(x1, y0) as f32;
            let p01 = src.get(x0, y1) as f32;
            let p11 = src.get(x1, y1) as f32;

            let top = p00 + (p10 - p00) * fx;
            let bottom = p01 + (p11 - p01) * fx;
            let value = top + (bottom - top) * fy;
            dst.set(x, y, value.round().clamp(0.0, 255.0) as u8);
        }
    }

    dst
}

/// Resizes every array to `target`, returning them in the same order.
///
/// Arrays already at the target size are passed through untouched, so
/// normalizing twice never loses precision.
pub fn normalize_resolution(
    arrays: Vec<ChannelArray>,
    target: (u32, u32),
) -> Result<Vec<ChannelArray>, EngineError> {
    let (width, height) = target;
    if width == 0 || height == 0 {
        return Err(EngineError::InvalidChannelData(format!(
            "invalid target size {}x{}, both dimensions must be positive",
            width, height
        )));
    }

    arrays
        .into_iter()
        .map(|array| {
            validate_channel_data(&array)?;
            if array.dimensions() == target {
                Ok(array)
            } else {
                debug!(
                    from = %format!("{}x{}", array.width, array.height),
                    to = %format!("{}x{}", width, height),
                    "resampling channel"
                );
                Ok(resize_bilinear(&array, width, height))
            }
        })
        .collect()
}
