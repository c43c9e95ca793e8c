use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::updater::LocationUpdater;
use crate::workspace;

#[derive(Debug, Serialize)]
struct ProjectDetail {
    project: String,
    location_uri: String,
    location: String,
    reference_names: Vec<String>,
}

pub fn run(root: &Path, updater: &LocationUpdater, project: &str, json: bool) -> Result<()> {
    let file = workspace::location_file(root, project)?;
    let record = updater
        .read_record(&file)
        .with_context(|| format!("reading location record of {project}"))?;

    let detail = ProjectDetail {
        project: project.to_string(),
        location: updater.codec().extract_filesystem_path(&record),
        location_uri: record.location_uri,
        reference_names: record.reference_names,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("project:    {}", detail.project);
    println!("location:   {}", detail.location);
    println!("stored URI: {}", detail.location_uri);
    if detail.reference_names.is_empty() {
        println!("references: (none)");
    } else {
        println!("references:");
        for name in &detail.reference_names {
            println!("  {name}");
        }
    }
    Ok(())
}
