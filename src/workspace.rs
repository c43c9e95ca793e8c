use anyhow::{anyhow, bail, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the workspace layer keeps per-project location records, relative
/// to the workspace root.
pub const PROJECT_SETTINGS_RELPATH: &str =
    ".metadata/.plugins/org.eclipse.core.resources/.projects";

/// Workspace root: explicit flag wins, otherwise walk up from the current
/// directory until a directory containing `.metadata` is found.
pub fn resolve_workspace_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        if !p.join(".metadata").is_dir() {
            bail!("not a workspace (no .metadata directory): {}", p.display());
        }
        return Ok(p);
    }

    let cwd = std::env::current_dir()?;
    find_workspace_root(&cwd).ok_or_else(|| {
        anyhow!(
            "no workspace found walking up from {} (pass --workspace)",
            cwd.display()
        )
    })
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut cur = Some(start);
    while let Some(dir) = cur {
        if dir.join(".metadata").is_dir() {
            return Some(dir.to_path_buf());
        }
        cur = dir.parent();
    }
    None
}

pub fn projects_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join(PROJECT_SETTINGS_RELPATH)
}

/// Path of a project's `.location` record inside the workspace metadata.
pub fn location_file(workspace_root: &Path, project: &str) -> Result<PathBuf> {
    validate_project_name(project)?;
    Ok(projects_dir(workspace_root).join(project).join(".location"))
}

/// Project names that have a persisted location record, sorted.
pub fn list_projects(workspace_root: &Path) -> Result<Vec<String>> {
    let dir = projects_dir(workspace_root);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut projects = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if !entry.path().join(".location").is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => projects.push(name),
            Err(raw) => {
                tracing::warn!("skipping project with non-UTF-8 name: {:?}", raw);
            }
        }
    }
    projects.sort();
    Ok(projects)
}

fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("project name must not be empty");
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        bail!("project name contains invalid characters: {}", name);
    }
    Ok(())
}
