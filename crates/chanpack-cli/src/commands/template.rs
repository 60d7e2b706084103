//! Template command implementations.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chanpack_template::{
    builtin, discover_templates, save_template, validate_template_file, ChannelRegistry,
    PackingTemplate,
};
use colored::Colorize;
use tracing::warn;

use super::json_output::{
    print_json, InvalidTemplateRecord, TemplateListOutput, TemplateRecord, ValidateOutput,
};
use crate::config::resolve_template;

fn print_template(template: &PackingTemplate) {
    println!("{} {}", template.name().bold(), template.description().dimmed());
    for (plane, channel) in template.used_channels() {
        println!(
            "  {}  {:<20} default {}",
            plane.to_string().cyan(),
            channel.semantic_type(),
            channel.default_value()
        );
    }
}

/// `template list`: built-ins, plus any templates found under `dir`.
pub fn list(dir: Option<&Path>, json: bool) -> Result<ExitCode> {
    let registry = ChannelRegistry::builtin();
    let mut output = TemplateListOutput {
        templates: builtin::all(&registry)?
            .iter()
            .map(|t| TemplateRecord::new(t, None))
            .collect(),
        invalid: Vec::new(),
    };

    let mut discovered = Vec::new();
    if let Some(dir) = dir {
        for (path, result) in discover_templates(dir)
            .with_context(|| format!("failed to scan {}", dir.display()))?
        {
            match result {
                Ok(template) => {
                    output
                        .templates
                        .push(TemplateRecord::new(&template, Some(path.display().to_string())));
                    discovered.push((path, template));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping invalid template");
                    output.invalid.push(InvalidTemplateRecord {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    if json {
        print_json(&output)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Built-in templates:".cyan().bold());
    for template in builtin::all(&registry)? {
        print_template(&template);
    }
    if let Some(dir) = dir {
        println!();
        println!("{} {}", "Templates in".cyan().bold(), dir.display());
        if discovered.is_empty() && output.invalid.is_empty() {
            println!("  (none)");
        }
        for (path, template) in &discovered {
            println!("{}", path.display().to_string().dimmed());
            print_template(template);
        }
        for invalid in &output.invalid {
            println!(
                "{} {}: {}",
                "invalid:".yellow().bold(),
                invalid.path,
                invalid.error
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `template show NAME`: one template's planes and defaults.
pub fn show(name: &str, json: bool) -> Result<ExitCode> {
    let template = resolve_template(name, None)?;
    if json {
        print_json(&TemplateRecord::new(&template, None))?;
    } else {
        print_template(&template);
    }
    Ok(ExitCode::SUCCESS)
}

/// `template validate FILE`: exit code 1 if the file is not a valid template.
pub fn validate(path: &Path, json: bool) -> Result<ExitCode> {
    let result = validate_template_file(path);
    let code = if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    };

    if json {
        print_json(&ValidateOutput {
            path: path.display().to_string(),
            valid: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        })?;
        return Ok(code);
    }

    println!("{} {}", "Validating:".cyan().bold(), path.display());
    match result {
        Ok(()) => println!("{}", "Template is valid".green().bold()),
        Err(e) => println!("{} {}", "Invalid:".red().bold(), e),
    }
    Ok(code)
}

/// `template export NAME --to FILE`: writes a template as JSON.
pub fn export(name: &str, to: &Path) -> Result<ExitCode> {
    let template = resolve_template(name, None)?;
    save_template(&template, to).with_context(|| format!("failed to write {}", to.display()))?;
    println!(
        "{} {} -> {}",
        "Exported:".green().bold(),
        template.name(),
        to.display()
    );
    Ok(ExitCode::SUCCESS)
}
