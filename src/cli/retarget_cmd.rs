use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::prefix;
use crate::updater::LocationUpdater;
use crate::workspace;

pub struct RetargetArgs {
    pub new_prefix: String,
    /// Projects to retarget; empty means every project in the workspace.
    pub projects: Vec<String>,
    /// Prefix to replace. Computed as the common prefix of the selected
    /// locations when not given.
    pub old_prefix: Option<String>,
    pub dry_run: bool,
}

/// Batch-retarget: replace a shared path prefix across many projects.
pub fn run(root: &Path, updater: &LocationUpdater, args: &RetargetArgs) -> Result<()> {
    let names = if args.projects.is_empty() {
        workspace::list_projects(root)?
    } else {
        args.projects.clone()
    };
    if names.is_empty() {
        bail!("no projects with a location record in this workspace");
    }

    let mut locations: Vec<(String, PathBuf, String)> = Vec::with_capacity(names.len());
    for name in &names {
        let file = workspace::location_file(root, name)?;
        let path = updater
            .read_location(&file)
            .with_context(|| format!("reading location of {name}"))?;
        locations.push((name.clone(), file, path));
    }

    let old_prefix = match &args.old_prefix {
        Some(p) => p.clone(),
        None => {
            let paths: Vec<String> = locations.iter().map(|(_, _, p)| p.clone()).collect();
            let p = prefix::common_prefix(&paths);
            if p.is_empty() {
                bail!("selected projects share no common path prefix; pass --old-prefix");
            }
            p
        }
    };

    println!("replacing prefix {:?} with {:?}", old_prefix, args.new_prefix);
    let mut changed = 0;
    for (name, file, current) in &locations {
        let next = prefix::apply_prefix_substitution(current, &old_prefix, &args.new_prefix);
        if next == *current {
            println!("  {name}: unchanged");
            continue;
        }
        println!("  {name}: {current} -> {next}");
        if !args.dry_run {
            updater
                .update_location_substring(file, &old_prefix, &args.new_prefix)
                .with_context(|| format!("rewriting location of {name}"))?;
        }
        changed += 1;
    }

    if args.dry_run {
        println!("dry run: {changed} project(s) would change, nothing written");
    } else {
        println!("{changed} project(s) updated");
    }
    Ok(())
}
