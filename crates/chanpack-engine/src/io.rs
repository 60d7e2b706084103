//! Image file I/O: decoding source textures and writing results.
//!
//! Inputs may be PNG, TGA, JPEG, TIFF, or BMP. PNG output goes through the
//! deterministic encoder in [`crate::png`]; other extensions are handed to the
//! `image` crate.

use std::fs;
use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::buffer::{ChannelArray, PackedImage};
use crate::error::EngineError;
use crate::png::{write_channel, write_packed_to_vec_with_hash, PngConfig};

/// Decodes an image file, guessing the format from its contents.
pub fn load_image(path: &Path) -> Result<DynamicImage, EngineError> {
    if !path.exists() {
        return Err(EngineError::ImageNotFound(path.to_path_buf()));
    }
    let decode_err = |source| EngineError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(decode_err)?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "decoded image"
    );
    Ok(image)
}

/// Loads an image file as a single grayscale channel.
pub fn load_channel(path: &Path) -> Result<ChannelArray, EngineError> {
    load_image(path).map(|image| ChannelArray::from_image(&image))
}

/// Loads an image file as a packed RGB or RGBA image.
pub fn load_packed(path: &Path) -> Result<PackedImage, EngineError> {
    load_image(path).map(|image| PackedImage::from_image(&image))
}

/// True if `path` is written with the PNG encoder: a `.png` extension in any
/// case, or no extension at all.
pub fn is_png_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(true)
}

fn ensure_parent(path: &Path) -> Result<(), EngineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn save_with_image_crate(image: &DynamicImage, path: &Path) -> Result<(), EngineError> {
    let encode_err = |source| EngineError::ImageEncode {
        path: path.to_path_buf(),
        source,
    };
    let format = ImageFormat::from_path(path).map_err(encode_err)?;
    // JPEG has no alpha plane.
    let image = if format == ImageFormat::Jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image.clone()
    };
    image.save_with_format(path, format).map_err(encode_err)
}

/// Writes a packed image. `.png` (or no extension) uses the deterministic
/// PNG encoder; other extensions are encoded by the `image` crate.
///
/// Returns the BLAKE3 hash of the PNG bytes written, or `None` for other
/// formats.
pub fn save_packed(
    image: &PackedImage,
    path: &Path,
    config: &PngConfig,
) -> Result<Option<String>, EngineError> {
    ensure_parent(path)?;
    let hash = if is_png_path(path) {
        let (bytes, hash) = write_packed_to_vec_with_hash(image, config)?;
        fs::write(path, bytes)?;
        Some(hash)
    } else {
        let dynamic = image.to_image().ok_or_else(|| {
            EngineError::InvalidChannelData(format!(
                "packed buffer does not match {}x{} {}",
                image.width, image.height, image.layout
            ))
        })?;
        save_with_image_crate(&dynamic, path)?;
        None
    };
    debug!(path = %path.display(), layout = %image.layout, "wrote packed image");
    Ok(hash)
}

/// Writes a single channel as a grayscale image.
pub fn save_channel(
    channel: &ChannelArray,
    path: &Path,
    config: &PngConfig,
) -> Result<(), EngineError> {
    ensure_parent(path)?;
    if is_png_path(path) {
        write_channel(channel, path, config)?;
    } else {
        let gray = channel.to_image().ok_or_else(|| {
            EngineError::InvalidChannelData(format!(
                "channel buffer does not match {}x{}",
                channel.width, channel.height
            ))
        })?;
        save_with_image_crate(&DynamicImage::ImageLuma8(gray), path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, EngineError::ImageNotFound(_)));
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        fs::write(&path, b"definitely not an image").unwrap();
        assert!(matches!(
            load_image(&path),
            Err(EngineError::ImageDecode { .. })
        ));
    }

    #[test]
    fn test_channel_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("rough.png");
        let mut channel = ChannelArray::filled(5, 3, 0);
        channel.set(4, 2, 99);

        save_channel(&channel, &path, &PngConfig::default()).unwrap();
        assert_eq!(load_channel(&path).unwrap(), channel);
    }

    #[test]
    fn test_is_png_path() {
        assert!(is_png_path(Path::new("out.png")));
        assert!(is_png_path(Path::new("out.PNG")));
        assert!(is_png_path(Path::new("out")));
        assert!(!is_png_path(Path::new("out.tga")));
    }

    #[test]
    fn test_save_packed_hashes_written_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let r = ChannelArray::filled(4, 4, 10);
        let g = ChannelArray::filled(4, 4, 20);
        let b = ChannelArray::filled(4, 4, 30);
        let packed = PackedImage::from_planes(&[&r, &g, &b]).unwrap();

        let png_path = dir.path().join("nested").join("packed.png");
        let hash = save_packed(&packed, &png_path, &PngConfig::default()).unwrap();
        assert_eq!(hash, Some(crate::png::hash_png(&fs::read(&png_path).unwrap())));
        assert_eq!(load_packed(&png_path).unwrap(), packed);

        let tga_path = dir.path().join("packed.tga");
        assert_eq!(save_packed(&packed, &tga_path, &PngConfig::default()).unwrap(), None);
        assert!(tga_path.is_file());
    }

    #[test]
    fn test_packed_bmp_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packed.bmp");
        let r = ChannelArray::filled(4, 4, 10);
        let g = ChannelArray::filled(4, 4, 20);
        let b = ChannelArray::filled(4, 4, 30);
        let packed = PackedImage::from_planes(&[&r, &g, &b]).unwrap();

        save_packed(&packed, &path, &PngConfig::default()).unwrap();
        assert_eq!(load_packed(&path).unwrap(), packed);
    }

    #[test]
    fn test_tga_source_loads_as_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ao.tga");
        GrayImage::from_pixel(3, 3, Luma([42])).save(&path).unwrap();

        let channel = load_channel(&path).unwrap();
        assert_eq!(channel.dimensions(), (3, 3));
        assert!(channel.data.iter().all(|&v| v == 42));
    }
}
