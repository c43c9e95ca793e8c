use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::location::PathStyle;

/// Optional tool configuration. Everything here has a sensible default;
/// CLI flags override whatever the file provides.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Default workspace root, used when `--workspace` is not passed.
    #[serde(default)]
    pub workspace: Option<String>,

    /// Path convention override. Defaults to the host platform's style.
    #[serde(default)]
    pub path_style: Option<PathStyle>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// EnvFilter directive, e.g. "debug" or "wsreloc=trace".
    #[serde(default)]
    pub level: Option<String>,
}

impl Config {
    /// Load the first config file found, with its path. Search order:
    /// `$WSRELOC_CONFIG`, `./wsreloc.toml`, `<user config dir>/wsreloc/wsreloc.toml`.
    /// No file at all is fine and yields the defaults.
    pub fn load_with_path() -> Result<(Self, Option<PathBuf>)> {
        let mut candidates = Vec::new();

        if let Ok(explicit) = std::env::var("WSRELOC_CONFIG") {
            candidates.push(PathBuf::from(explicit));
        }

        candidates.push(PathBuf::from("wsreloc.toml"));

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("wsreloc").join("wsreloc.toml"));
        }

        for path in candidates {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Config::default(), None))
    }
}
