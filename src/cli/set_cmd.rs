use anyhow::{Context, Result};
use std::path::Path;

use crate::updater::LocationUpdater;
use crate::workspace;

/// Point one project's record at a new storage path.
pub fn run(root: &Path, updater: &LocationUpdater, project: &str, new_path: &str) -> Result<()> {
    let file = workspace::location_file(root, project)?;
    let current = updater
        .read_location(&file)
        .with_context(|| format!("reading location of {project}"))?;

    updater
        .write_location(&file, new_path)
        .with_context(|| format!("rewriting location of {project}"))?;

    println!("{project}: {current} -> {new_path}");
    Ok(())
}
