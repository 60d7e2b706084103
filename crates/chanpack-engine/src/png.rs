//! Deterministic PNG writer.
//!
//! Uses fixed compression and filter settings so that the same pixels always
//! encode to the same bytes.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::buffer::{ChannelArray, PackedImage, PlaneLayout};

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Keep fixed for reproducible output.
    pub compression: Compression,
    /// Row filter. Keep fixed for reproducible output.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smallest files, slowest encode.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }

    /// Fastest encode, larger files.
    pub fn fast() -> Self {
        Self {
            compression: Compression::Fast,
            filter: FilterType::NoFilter,
        }
    }

    /// Looks up a configuration by name (`default`, `fast`, `best`).
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "fast" => Some(Self::fast()),
            "best" => Some(Self::best_compression()),
            _ => None,
        }
    }
}

fn write_raw_to_writer<W: Write>(
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let samples = match color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(PngError::InvalidDimensions(
                "Indexed color not supported".into(),
            ))
        }
    };
    let expected_size = width as usize * height as usize * samples;
    if width == 0 || height == 0 || data.len() != expected_size {
        return Err(PngError::InvalidDimensions(format!(
            "Expected {} bytes for {}x{} {:?}, got {}",
            expected_size,
            width,
            height,
            color_type,
            data.len()
        )));
    }

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate writes no timestamps or other variable metadata.
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(data)?;
    png_writer.finish()?;

    Ok(())
}

/// Write a packed image to any writer as RGB or RGBA.
pub fn write_packed_to_writer<W: Write>(
    image: &PackedImage,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let color_type = match image.layout {
        PlaneLayout::Rgb => ColorType::Rgb,
        PlaneLayout::Rgba => ColorType::Rgba,
    };
    write_raw_to_writer(&image.data, image.width, image.height, color_type, writer, config)
}

/// Write a channel array to any writer as 8-bit grayscale.
pub fn write_channel_to_writer<W: Write>(
    channel: &ChannelArray,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    write_raw_to_writer(
        &channel.data,
        channel.width,
        channel.height,
        ColorType::Grayscale,
        writer,
        config,
    )
}

/// Write a channel array to a PNG file.
pub fn write_channel(
    channel: &ChannelArray,
    path: &Path,
    config: &PngConfig,
) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_channel_to_writer(channel, writer, config)
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode a packed image to memory and return the bytes with their hash.
pub fn write_packed_to_vec_with_hash(
    image: &PackedImage,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_packed_to_writer(image, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Encode a channel array to memory and return the bytes with their hash.
pub fn write_channel_to_vec_with_hash(
    channel: &ChannelArray,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_channel_to_writer(channel, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image() -> PackedImage {
        let mut r = ChannelArray::filled(64, 64, 0);
        let mut g = ChannelArray::filled(64, 64, 0);
        for y in 0..64 {
            for x in 0..64 {
                r.set(x, y, (x * 4) as u8);
                g.set(x, y, (y * 4) as u8);
            }
        }
        let b = ChannelArray::filled(64, 64, 128);
        PackedImage::from_planes(&[&r, &g, &b]).unwrap()
    }

    #[test]
    fn test_packed_deterministic() {
        let image = gradient_image();
        let config = PngConfig::default();

        let (data1, hash1) = write_packed_to_vec_with_hash(&image, &config).unwrap();
        let (data2, hash2) = write_packed_to_vec_with_hash(&image, &config).unwrap();

        assert_eq!(data1, data2, "PNG data should be identical");
        assert_eq!(hash1, hash2, "PNG hashes should be identical");
    }

    #[test]
    fn test_channel_deterministic() {
        let mut channel = ChannelArray::filled(64, 64, 0);
        for y in 0..64 {
            for x in 0..64 {
                channel.set(x, y, (x + y) as u8);
            }
        }

        let config = PngConfig::best_compression();
        let (data1, hash1) = write_channel_to_vec_with_hash(&channel, &config).unwrap();
        let (data2, hash2) = write_channel_to_vec_with_hash(&channel, &config).unwrap();

        assert_eq!(data1, data2);
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_written_png_decodes_to_same_pixels() {
        let image = gradient_image();
        let (data, _) = write_packed_to_vec_with_hash(&image, &PngConfig::fast()).unwrap();

        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(PackedImage::from_image(&decoded), image);
    }

    #[test]
    fn test_inconsistent_buffer_rejected() {
        let broken = ChannelArray {
            width: 4,
            height: 4,
            data: vec![0; 10],
        };
        let err = write_channel_to_vec_with_hash(&broken, &PngConfig::default()).unwrap_err();
        assert!(matches!(err, PngError::InvalidDimensions(_)));
    }

    #[test]
    fn test_config_by_name() {
        assert!(PngConfig::by_name("fast").is_some());
        assert!(PngConfig::by_name("best").is_some());
        assert!(PngConfig::by_name("default").is_some());
        assert!(PngConfig::by_name("ultra").is_none());
    }
}
