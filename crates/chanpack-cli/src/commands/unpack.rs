//! Unpack command implementation
//!
//! Splits a packed image into one grayscale PNG per channel.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chanpack_engine::{load_packed, save_channel, unpack_texture};
use colored::Colorize;

use super::json_output::{print_json, UnpackOutput, UnpackedFile};
use crate::config::{check_resolution, png_config, resolve_template};

/// Arguments for `chanpack unpack`.
#[derive(Debug, Clone)]
pub struct UnpackArgs {
    /// Packed input image.
    pub input: PathBuf,
    /// Built-in template name or template file path.
    pub template: String,
    /// Explicit template file, overriding `template`.
    pub template_file: Option<PathBuf>,
    /// Directory for the extracted maps.
    pub output_dir: PathBuf,
    /// `default`, `fast`, or `best`.
    pub png_compression: String,
    /// Print a JSON summary instead of colored text.
    pub json: bool,
}

/// Output file for one extracted map: `<stem>_<name>.png`.
pub fn output_path(output_dir: &Path, input: &Path, name: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("texture");
    output_dir.join(format!("{}_{}.png", stem, name))
}

/// Run the unpack command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(args: &UnpackArgs) -> Result<ExitCode> {
    let template = resolve_template(&args.template, args.template_file.as_deref())?;
    let png = png_config(&args.png_compression)?;

    if !args.json {
        println!(
            "{} {} with {}",
            "Unpacking:".cyan().bold(),
            args.input.display(),
            template.name()
        );
    }

    let image = load_packed(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    check_resolution("input", image.dimensions())?;

    let unpacked = unpack_texture(&image, &template)
        .with_context(|| format!("failed to unpack with template {}", template.name()))?;
    if unpacked.auto_alpha.is_some() && !args.json {
        println!(
            "  {} {} does not assign alpha, extracting it separately",
            "note:".yellow().bold(),
            template.name()
        );
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

    let mut files = Vec::new();
    for (name, channel) in unpacked.into_map() {
        let path = output_path(&args.output_dir, &args.input, &name);
        save_channel(&channel, &path, &png)
            .with_context(|| format!("failed to write {}", path.display()))?;
        if !args.json {
            println!("  {} -> {}", name, path.display());
        }
        files.push(UnpackedFile {
            name,
            path: path.display().to_string(),
        });
    }

    if args.json {
        print_json(&UnpackOutput {
            template: template.name().to_string(),
            input: args.input.display().to_string(),
            width: image.width,
            height: image.height,
            files,
        })?;
    } else {
        println!(
            "{} {} maps, {}x{}",
            "Unpacked:".green().bold(),
            files.len(),
            image.width,
            image.height
        );
    }

    Ok(ExitCode::SUCCESS)
}
