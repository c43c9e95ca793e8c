mod attrib;
mod cli;
mod config;
mod error;
mod location;
mod logging;
mod prefix;
mod updater;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::location::PathStyle;
use crate::updater::LocationUpdater;

#[derive(Parser, Debug)]
#[command(name = "wsreloc", version)]
#[command(about = "Retarget IDE workspace projects by rewriting their .location records", long_about = None)]
struct Cli {
    /// Workspace root. If omitted, detects by walking up for .metadata.
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Path convention: posix or windows. Defaults to the host platform.
    #[arg(long, global = true)]
    path_style: Option<String>,

    /// Log filter, e.g. "debug" or "wsreloc=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects with a persisted location record
    List {
        /// Emit JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show one project's stored location and reference names
    Show {
        /// Project name
        project: String,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rewrite one project's location to a new path
    Set {
        /// Project name
        project: String,

        /// New storage path for the project
        new_path: String,
    },
    /// Replace a shared path prefix across many projects at once
    Retarget {
        /// Replacement prefix
        new_prefix: String,

        /// Projects to retarget (comma separated). Defaults to all.
        #[arg(long, value_delimiter = ',')]
        projects: Vec<String>,

        /// Prefix to replace. Defaults to the common prefix of the
        /// selected project locations.
        #[arg(long)]
        old_prefix: Option<String>,

        /// Preview the changes without writing anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let (config, _config_path) = Config::load_with_path().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config, using defaults: {e}");
        (Config::default(), None)
    });

    let args = Cli::parse();
    logging::setup_tracing(args.log_level.as_deref().or(config.logging.level.as_deref()));

    let style = match &args.path_style {
        Some(s) => s.parse::<PathStyle>().map_err(anyhow::Error::msg)?,
        None => config.path_style.unwrap_or_else(PathStyle::host),
    };

    let explicit_root = args
        .workspace
        .clone()
        .or_else(|| config.workspace.as_ref().map(PathBuf::from));
    let root = workspace::resolve_workspace_root(explicit_root)?;

    let updater = LocationUpdater::new(style);

    match &args.cmd {
        Command::List { json } => cli::list_cmd::run(&root, &updater, *json),
        Command::Show { project, json } => cli::show_cmd::run(&root, &updater, project, *json),
        Command::Set { project, new_path } => cli::set_cmd::run(&root, &updater, project, new_path),
        Command::Retarget {
            new_prefix,
            projects,
            old_prefix,
            dry_run,
        } => cli::retarget_cmd::run(
            &root,
            &updater,
            &cli::retarget_cmd::RetargetArgs {
                new_prefix: new_prefix.clone(),
                projects: projects.clone(),
                old_prefix: old_prefix.clone(),
                dry_run: *dry_run,
            },
        ),
    }
}
