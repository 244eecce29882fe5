//! Configuration for shelf.
//!
//! Configuration sources (highest priority first):
//! 1. `--root` / `SHELF_HOME`, and `SHELF_CATALOG_URL`
//! 2. Config file (.shelf/config.yaml)
//! 3. Defaults (current directory, Google Books)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shelf/config.yaml
//! - Paths in config file are relative to the project root (the parent of .shelf/)

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::google_books::DEFAULT_BASE_URL;
pub use paths::LibraryPaths;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Environment variable overriding the catalog endpoint
pub const CATALOG_URL_ENV: &str = "SHELF_CATALOG_URL";

/// Default request timeout for catalog calls
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Library root (relative to the project root)
    pub root: Option<String>,
    /// The remaining paths are relative to the library root
    pub database: Option<String>,
    pub snippet: Option<String>,
    pub thumbnails: Option<String>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Library file layout
    pub paths: LibraryPaths,
    /// Catalog client settings
    pub catalog: CatalogSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".shelf").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base` or start with `~/`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Build the library layout from config file overrides
fn resolve_paths(root: PathBuf, overrides: &PathsConfig) -> LibraryPaths {
    let mut paths = LibraryPaths::under(&root);

    if let Some(p) = &overrides.database {
        paths.database = resolve_path(&root, p);
    }
    if let Some(p) = &overrides.snippet {
        paths.snippet = resolve_path(&root, p);
    }
    if let Some(p) = &overrides.thumbnails {
        paths.thumbnails = resolve_path(&root, p);
    }
    if let Some(p) = &overrides.placeholder {
        paths.placeholder = resolve_path(&root, p);
    }

    paths
}

/// Load configuration from all sources, discovering the config file from `start`
pub fn load_config_from(start: &Path, root_override: Option<PathBuf>) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start);

    let (paths, mut catalog) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .shelf/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent() // .shelf/
            .and_then(|p| p.parent()) // project root
            .unwrap_or(Path::new("."));

        let root = match (root_override, &config.paths.root) {
            (Some(root), _) => root,
            (None, Some(root)) => resolve_path(base_dir, root),
            (None, None) => base_dir.to_path_buf(),
        };

        let defaults = CatalogSettings::default();
        let catalog = match config.catalog {
            Some(c) => CatalogSettings {
                base_url: c.base_url.unwrap_or(defaults.base_url),
                api_key: c.api_key,
                timeout_seconds: c.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            },
            None => defaults,
        };

        (resolve_paths(root, &config.paths), catalog)
    } else {
        // No config file - use overrides or defaults
        let root = root_override.unwrap_or_else(|| start.to_path_buf());
        (LibraryPaths::under(root), CatalogSettings::default())
    };

    if let Ok(url) = std::env::var(CATALOG_URL_ENV) {
        if !url.trim().is_empty() {
            catalog.base_url = url;
        }
    }

    Ok(ResolvedConfig {
        paths,
        catalog,
        config_file,
    })
}

/// Load configuration starting from the current directory
fn load_config(root_override: Option<PathBuf>) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd, root_override)
}

/// Initialise the global configuration (first call wins, then cached)
pub fn init_config(root_override: Option<PathBuf>) -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config(root_override).map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
