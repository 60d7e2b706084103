//! Command-line configuration: resolution limits, argument parsers, and
//! template lookup.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chanpack_engine::PngConfig;
use chanpack_template::{builtin, load_template, ChannelRegistry, PackingTemplate};

/// Largest width or height accepted for inputs and outputs.
pub const MAX_RESOLUTION: u32 = 4096;

/// Names accepted by `--png-compression`.
pub const PNG_COMPRESSION_NAMES: [&str; 3] = ["default", "fast", "best"];

/// Parses a `WIDTHxHEIGHT` size such as `512x512`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid dimension '{}' in '{}'", part, s))
    };
    let size = (parse(w)?, parse(h)?);
    if size.0 == 0 || size.1 == 0 {
        return Err(format!("size must be positive, got '{}'", s));
    }
    Ok(size)
}

/// Parses a `KEY=PATH` source argument.
///
/// The key is a semantic type (`roughness`) or a plane key (`G`).
pub fn parse_source(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((key, path)) if !key.trim().is_empty() && !path.is_empty() => {
            Ok((key.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected KEY=PATH, got '{}'", s)),
    }
}

/// Fails if a size exceeds [`MAX_RESOLUTION`] on either axis.
pub fn check_resolution(what: &str, size: (u32, u32)) -> Result<()> {
    let (width, height) = size;
    if width > MAX_RESOLUTION || height > MAX_RESOLUTION {
        bail!(
            "{} is {}x{}, larger than the maximum of {}x{}",
            what,
            width,
            height,
            MAX_RESOLUTION,
            MAX_RESOLUTION
        );
    }
    Ok(())
}

/// Looks up a PNG encoder configuration by name.
pub fn png_config(name: &str) -> Result<PngConfig> {
    PngConfig::by_name(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown PNG compression: {} (expected default, fast, or best)",
            name
        )
    })
}

/// Resolves the template a command should use.
///
/// An explicit `file` wins. Otherwise `name` is a built-in template name
/// (case-insensitive) or the path of a template JSON file.
pub fn resolve_template(name: &str, file: Option<&Path>) -> Result<PackingTemplate> {
    if let Some(path) = file {
        return load_template(path)
            .with_context(|| format!("failed to load template file {}", path.display()));
    }

    let registry = ChannelRegistry::builtin();
    if let Some(template) = builtin::by_name(name, &registry)? {
        return Ok(template);
    }

    let path = Path::new(name);
    if path.is_file() {
        return load_template(path)
            .with_context(|| format!("failed to load template file {}", path.display()));
    }

    bail!(
        "unknown template '{}' (built-in templates: {})",
        name,
        builtin::BUILTIN_NAMES.join(", ")
    )
}
