use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::updater::LocationUpdater;
use crate::workspace;

#[derive(Debug, Serialize)]
struct ProjectEntry {
    project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Print every project with a persisted location record. A record that
/// fails to decode is reported per project, it does not abort the listing.
pub fn run(root: &Path, updater: &LocationUpdater, json: bool) -> Result<()> {
    let mut entries = Vec::new();
    for project in workspace::list_projects(root)? {
        let file = workspace::location_file(root, &project)?;
        let entry = match updater.read_location(&file) {
            Ok(location) => ProjectEntry {
                project,
                location: Some(location),
                error: None,
            },
            Err(e) => {
                tracing::warn!(project = %project, error = %e, "unreadable location record");
                ProjectEntry {
                    project,
                    location: None,
                    error: Some(e.to_string()),
                }
            }
        };
        entries.push(entry);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("no projects with a location record in this workspace");
        return Ok(());
    }

    let width = entries.iter().map(|e| e.project.len()).max().unwrap_or(0);
    for entry in &entries {
        match (&entry.location, &entry.error) {
            (Some(location), _) => println!("{:<width$}  {}", entry.project, location),
            (None, Some(error)) => println!("{:<width$}  <{}>", entry.project, error),
            (None, None) => {}
        }
    }
    Ok(())
}
