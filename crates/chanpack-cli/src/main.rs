//! chanpack - Command-line interface for channel-packed PBR textures
//!
//! This binary packs grayscale material maps into the planes of one image,
//! unpacks them again, and manages packing templates.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use chanpack_cli::commands;
use chanpack_cli::commands::pack::PackArgs;
use chanpack_cli::commands::unpack::UnpackArgs;
use chanpack_cli::config::{parse_size, parse_source, PNG_COMPRESSION_NAMES};
use chanpack_cli::logging;

/// chanpack - Channel-packed PBR texture tool
#[derive(Parser)]
#[command(name = "chanpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack grayscale maps into one RGB or RGBA image
    Pack {
        /// Template: built-in name (ORM, ORD) or path to a template JSON file
        #[arg(short, long, default_value = "ORM")]
        template: String,

        /// Template JSON file (overrides --template)
        #[arg(long)]
        template_file: Option<PathBuf>,

        /// Source map as KEY=PATH, where KEY is a semantic type or plane (R, G, B, A)
        #[arg(short = 'c', long = "channel", value_parser = parse_source)]
        channels: Vec<(String, PathBuf)>,

        /// Output image path (PNG unless another extension is given)
        #[arg(short, long)]
        output: PathBuf,

        /// Fail when source maps differ in resolution instead of resizing them
        #[arg(long)]
        strict: bool,

        /// Output size as WIDTHxHEIGHT when no source maps are given
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,

        /// PNG compression preset
        #[arg(long, default_value = "default", value_parser = PNG_COMPRESSION_NAMES)]
        png_compression: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Split a packed image into one grayscale PNG per channel
    Unpack {
        /// Packed input image
        #[arg(short, long)]
        input: PathBuf,

        /// Template: built-in name (ORM, ORD) or path to a template JSON file
        #[arg(short, long, default_value = "ORM")]
        template: String,

        /// Template JSON file (overrides --template)
        #[arg(long)]
        template_file: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// PNG compression preset
        #[arg(long, default_value = "default", value_parser = PNG_COMPRESSION_NAMES)]
        png_compression: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Manage packing templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },

    /// List the built-in channel types and their defaults
    Channels {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List built-in templates and, optionally, templates in a directory
    List {
        /// Directory to scan for template JSON files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a template's planes and defaults
    Show {
        /// Built-in name or template file path
        name: String,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that a template JSON file is valid
    Validate {
        /// Template file
        file: PathBuf,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a template to a JSON file
    Export {
        /// Built-in name or template file path
        name: String,
        /// Destination path
        #[arg(long)]
        to: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Pack {
            template,
            template_file,
            channels,
            output,
            strict,
            size,
            png_compression,
            json,
        } => commands::pack::run(&PackArgs {
            template,
            template_file,
            sources: channels,
            output,
            strict,
            size,
            png_compression,
            json,
        }),
        Commands::Unpack {
            input,
            template,
            template_file,
            output,
            png_compression,
            json,
        } => commands::unpack::run(&UnpackArgs {
            input,
            template,
            template_file,
            output_dir: output,
            png_compression,
            json,
        }),
        Commands::Template { command } => match command {
            TemplateCommands::List { dir, json } => commands::template::list(dir.as_deref(), json),
            TemplateCommands::Show { name, json } => commands::template::show(&name, json),
            TemplateCommands::Validate { file, json } => {
                commands::template::validate(&file, json)
            }
            TemplateCommands::Export { name, to } => commands::template::export(&name, &to),
        },
        Commands::Channels { json } => commands::channels::run(json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
