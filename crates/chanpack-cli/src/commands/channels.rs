//! Channels command: prints the built-in semantic channel types.

use std::process::ExitCode;

use anyhow::Result;
use chanpack_template::ChannelRegistry;
use colored::Colorize;

use super::json_output::{print_json, ChannelRecord};

/// Builds one record per registered channel type, sorted by name.
pub fn records(registry: &ChannelRegistry) -> Vec<ChannelRecord> {
    registry
        .iter()
        .map(|channel| ChannelRecord {
            semantic_type: channel.semantic_type().to_string(),
            label: channel.label(),
            default: channel.default_value(),
        })
        .collect()
}

pub fn run(json: bool) -> Result<ExitCode> {
    let records = records(&ChannelRegistry::builtin());
    if json {
        print_json(&records)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Channel types:".cyan().bold());
    for record in &records {
        println!(
            "  {} {:<20} default {}",
            format!("{:<20}", record.semantic_type).bold(),
            record.label,
            record.default
        );
    }
    Ok(ExitCode::SUCCESS)
}
