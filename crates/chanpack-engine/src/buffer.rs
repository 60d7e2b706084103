//! In-memory image buffers: single-plane channel arrays and packed images.

use std::fmt;

use chanpack_template::Plane;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::error::EngineError;

/// The 8-bit value a 0.5 default fills with.
///
/// Defaults are quantized with [`unit_to_u8`], which rounds half away from
/// zero, so 0.5 * 255 = 127.5 becomes 128.
pub const MIDPOINT_FILL: u8 = 128;

/// Quantizes a normalized `[0.0, 1.0]` value to 8 bits.
#[inline]
pub fn unit_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A single grayscale plane (one texture map), row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelArray {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// One byte per pixel, `width * height` long.
    pub data: Vec<u8>,
}

impl ChannelArray {
    /// Wraps raw bytes, checking that they form a `width x height` plane.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, EngineError> {
        let array = Self {
            width,
            height,
            data,
        };
        crate::validator::validate_channel_data(&array)?;
        Ok(array)
    }

    /// Creates a plane filled with one value.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Creates a plane from normalized floats.
    ///
    /// Every value must be finite and within `[0.0, 1.0]`.
    pub fn from_unit_values(width: u32, height: u32, values: &[f64]) -> Result<Self, EngineError> {
        crate::validator::validate_unit_values(values)?;
        Self::new(width, height, values.iter().map(|&v| unit_to_u8(v)).collect())
    }

    /// Converts a decoded image to a grayscale plane.
    ///
    /// Grayscale images are taken as-is; color images are reduced to luminance
    /// with the Rec. 601 weights (alpha is ignored).
    pub fn from_image(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => Self {
                width: gray.width(),
                height: gray.height(),
                data: gray.as_raw().clone(),
            },
            other => {
                let rgb = other.to_rgb8();
                let data = rgb
                    .pixels()
                    .map(|p| {
                        let [r, g, b] = p.0;
                        let weighted = r as u32 * 299 + g as u32 * 587 + b as u32 * 114;
                        ((weighted + 500) / 1000) as u8
                    })
                    .collect();
                Self {
                    width: rgb.width(),
                    height: rgb.height(),
                    data,
                }
            }
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        let idx = (y * self.width + x) as usize;
        self.data[idx] = value;
    }

    /// Converts to an 8-bit grayscale image.
    pub fn to_image(&self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// Plane layout of a packed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneLayout {
    /// Three planes: R, G, B.
    Rgb,
    /// Four planes: R, G, B, A.
    Rgba,
}

impl PlaneLayout {
    /// Number of interleaved planes per pixel.
    pub fn plane_count(&self) -> usize {
        match self {
            PlaneLayout::Rgb => 3,
            PlaneLayout::Rgba => 4,
        }
    }

    /// Returns true if the layout has an alpha plane.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PlaneLayout::Rgba)
    }
}

impl fmt::Display for PlaneLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaneLayout::Rgb => f.write_str("RGB"),
            PlaneLayout::Rgba => f.write_str("RGBA"),
        }
    }
}

/// A multi-plane 8-bit image, interleaved row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB or RGBA.
    pub layout: PlaneLayout,
    /// `width * height * layout.plane_count()` bytes.
    pub data: Vec<u8>,
}

impl PackedImage {
    /// Interleaves planes into a packed image.
    ///
    /// `planes` must hold 3 or 4 arrays, all of the same size.
    pub fn from_planes(planes: &[&ChannelArray]) -> Result<Self, EngineError> {
        let layout = match planes.len() {
            3 => PlaneLayout::Rgb,
            4 => PlaneLayout::Rgba,
            n => {
                return Err(EngineError::InvalidChannelData(format!(
                    "a packed image needs 3 or 4 planes, got {}",
                    n
                )))
            }
        };
        for plane in planes {
            crate::validator::validate_channel_data(plane)?;
        }
        if !crate::validator::check_resolution_match(planes) {
            return Err(EngineError::ResolutionMismatch {
                resolutions: planes.iter().map(|p| p.dimensions()).collect(),
            });
        }

        let (width, height) = planes[0].dimensions();
        let count = layout.plane_count();
        let mut data = vec![0u8; width as usize * height as usize * count];
        for (i, plane) in planes.iter().enumerate() {
            for (px, value) in plane.data.iter().enumerate() {
                data[px * count + i] = *value;
            }
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Converts a decoded image to a packed image.
    ///
    /// Images with an alpha channel become RGBA, everything else RGB.
    /// Grayscale is expanded to three equal planes and deeper formats are
    /// reduced to 8 bits.
    pub fn from_image(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            Self {
                width: rgba.width(),
                height: rgba.height(),
                layout: PlaneLayout::Rgba,
                data: rgba.into_raw(),
            }
        } else {
            let rgb = image.to_rgb8();
            Self {
                width: rgb.width(),
                height: rgb.height(),
                layout: PlaneLayout::Rgb,
                data: rgb.into_raw(),
            }
        }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns true if the image has an alpha plane.
    pub fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    /// Returns the interleaved values of one pixel.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let count = self.layout.plane_count();
        let idx = (y * self.width + x) as usize * count;
        &self.data[idx..idx + count]
    }

    /// Returns one plane's value at a pixel, or `None` if the plane is absent.
    #[inline]
    pub fn plane_value(&self, x: u32, y: u32, plane: Plane) -> Option<u8> {
        self.pixel(x, y).get(plane.index()).copied()
    }

    /// Converts to an `image` crate buffer.
    pub fn to_image(&self) -> Option<DynamicImage> {
        match self.layout {
            PlaneLayout::Rgb => RgbImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgb8),
            PlaneLayout::Rgba => RgbaImage::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgba8),
        }
    }
}
