//! Pack command implementation
//!
//! Loads grayscale maps, packs them with a template, and writes one image.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chanpack_engine::{
    load_channel, pack_texture_from_template_with, save_packed, ChannelSource, PackOptions,
    PackedImage, ResolutionPolicy, DEFAULT_CANVAS,
};
use chanpack_template::{PackingTemplate, Plane};
use colored::Colorize;
use tracing::warn;

use super::json_output::{print_json, PackOutput, PlaneRecord};
use crate::config::{check_resolution, png_config, resolve_template};

/// Arguments for `chanpack pack`.
#[derive(Debug, Clone)]
pub struct PackArgs {
    /// Built-in template name or template file path.
    pub template: String,
    /// Explicit template file, overriding `template`.
    pub template_file: Option<PathBuf>,
    /// `(key, path)` pairs; key is a semantic type or plane key.
    pub sources: Vec<(String, PathBuf)>,
    /// Output image path.
    pub output: PathBuf,
    /// Fail instead of resizing mismatched inputs.
    pub strict: bool,
    /// Canvas size when no source is given.
    pub size: Option<(u32, u32)>,
    /// `default`, `fast`, or `best`.
    pub png_compression: String,
    /// Print a JSON summary instead of colored text.
    pub json: bool,
}

/// Finds the plane a source key feeds, if any.
fn plane_for_key(template: &PackingTemplate, key: &str) -> Option<Plane> {
    template.plane_of(key).or_else(|| {
        key.parse::<Plane>()
            .ok()
            .filter(|plane| template.is_channel_used(*plane))
    })
}

/// Run the pack command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &PackArgs) -> Result<ExitCode> {
    let template = resolve_template(&args.template, args.template_file.as_deref())?;
    let png = png_config(&args.png_compression)?;
    let fallback = args.size.unwrap_or(DEFAULT_CANVAS);
    check_resolution("--size", fallback)?;

    if !args.json {
        println!(
            "{} {} with {}",
            "Packing:".cyan().bold(),
            args.output.display(),
            template.name()
        );
    }

    let mut sources = HashMap::new();
    let mut used: HashMap<Plane, String> = HashMap::new();
    for (key, path) in &args.sources {
        let Some(plane) = plane_for_key(&template, key) else {
            warn!(key = %key, template = template.name(), "source does not match any template channel");
            if !args.json {
                println!(
                    "  {} ignoring '{}', not a channel of {}",
                    "warning:".yellow().bold(),
                    key,
                    template.name()
                );
            }
            continue;
        };
        if used.contains_key(&plane) {
            bail!("plane {} was given more than one source", plane);
        }

        let channel = load_channel(path)
            .with_context(|| format!("failed to load source '{}'", key))?;
        check_resolution(&format!("source '{}'", key), channel.dimensions())?;
        if !args.json {
            println!(
                "  {} {} <- {} ({}x{})",
                plane.to_string().bold(),
                key,
                path.display(),
                channel.width,
                channel.height
            );
        }
        used.insert(plane, path.display().to_string());
        sources.insert(key.clone(), ChannelSource::from(channel));
    }

    let options = PackOptions {
        policy: if args.strict {
            ResolutionPolicy::Strict
        } else {
            ResolutionPolicy::Normalize
        },
        fallback_size: Some(fallback),
    };
    let packed = pack_texture_from_template_with(sources, &template, &options)
        .with_context(|| format!("failed to pack with template {}", template.name()))?;
    check_resolution("output", packed.dimensions())?;

    let hash = save_packed(&packed, &args.output, &png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let planes: Vec<PlaneRecord> = template
        .used_channels()
        .map(|(plane, channel)| PlaneRecord::new(plane, channel, used.get(&plane).cloned()))
        .collect();

    if args.json {
        print_json(&PackOutput {
            template: template.name().to_string(),
            output: args.output.display().to_string(),
            width: packed.width,
            height: packed.height,
            layout: packed.layout.to_string(),
            planes,
            hash,
        })?;
    } else {
        print_human_summary(&packed, &planes, hash.as_deref());
    }

    Ok(ExitCode::SUCCESS)
}

fn print_human_summary(packed: &PackedImage, planes: &[PlaneRecord], hash: Option<&str>) {
    for record in planes.iter().filter(|r| r.source.is_none()) {
        println!(
            "  {} {} filled with default {}",
            record.plane.bold(),
            record.semantic_type,
            record.default
        );
    }
    println!(
        "{} {}x{} {}",
        "Packed:".green().bold(),
        packed.width,
        packed.height,
        packed.layout
    );
    if let Some(hash) = hash {
        println!("  {} {}", "blake3:".dimmed(), hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanpack_template::{builtin, ChannelRegistry};

    #[test]
    fn test_plane_for_key() {
        let orm = builtin::orm(&ChannelRegistry::builtin()).unwrap();
        assert_eq!(plane_for_key(&orm, "roughness"), Some(Plane::G));
        assert_eq!(plane_for_key(&orm, "B"), Some(Plane::B));
        assert_eq!(plane_for_key(&orm, "A"), None);
        assert_eq!(plane_for_key(&orm, "displacement"), None);
    }
}
