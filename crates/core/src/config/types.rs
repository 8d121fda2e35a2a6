use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::LookupStrategy;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub dump: DumpConfig,
}

/// Catalog database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Open the catalog without write access. Imports are refused.
    #[serde(default)]
    pub read_only: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            read_only: false,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("playlistreader.db")
}

/// Import pipeline configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImportConfig {
    /// How candidate paths are looked up in the catalog.
    #[serde(default)]
    pub lookup: LookupStrategy,
}

/// Catalog dump configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DumpConfig {
    /// File name used when no output is given.
    #[serde(default = "default_dump_filename")]
    pub default_filename: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            default_filename: default_dump_filename(),
        }
    }
}

fn default_dump_filename() -> String {
    "playlist.txt".to_string()
}
