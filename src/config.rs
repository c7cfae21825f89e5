/// Startup configuration
///
/// Values come from an optional TOML file and are then overridden by
/// environment variables. Only the TMDB API key is required; the hosted
/// trending store is used when every Appwrite value is present, otherwise
/// searches are counted in a local SQLite database.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_TRENDING_LIMIT: usize = 5;

/// Shape of `config.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub trending_limit: Option<usize>,
    pub database_path: Option<PathBuf>,
    pub appwrite: Option<FileAppwrite>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileAppwrite {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub collection_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tmdb: TmdbConfig,
    /// `None` selects the local SQLite store.
    pub appwrite: Option<AppwriteConfig>,
    pub debounce: Duration,
    pub trending_limit: usize,
    /// Local store location; `None` means the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os("MOVIE_FINDER_CONFIG").map(PathBuf::from);
        let file = load_file(explicit, default_config_path())?;

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_key = var("TMDB_API_KEY")
            .or(file.tmdb_api_key)
            .ok_or_else(|| Error::Config("TMDB_API_KEY is not set".into()))?;

        let base_url = var("TMDB_BASE_URL")
            .or(file.tmdb_base_url)
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());

        let debounce_ms = match var("MOVIE_FINDER_DEBOUNCE_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("MOVIE_FINDER_DEBOUNCE_MS is not a number: {raw}"))
            })?,
            None => file.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
        };

        let database_path = var("MOVIE_FINDER_DB")
            .map(PathBuf::from)
            .or(file.database_path);

        let appwrite = {
            let section = file.appwrite.unwrap_or_default();
            let endpoint = var("APPWRITE_ENDPOINT").or(section.endpoint);
            let project_id = var("APPWRITE_PROJECT_ID").or(section.project_id);
            let api_key = var("APPWRITE_API_KEY").or(section.api_key);
            let database_id = var("APPWRITE_DATABASE_ID").or(section.database_id);
            let collection_id = var("APPWRITE_COLLECTION_ID").or(section.collection_id);

            match (endpoint, project_id, api_key, database_id, collection_id) {
                (Some(endpoint), Some(project_id), Some(api_key), Some(database_id), Some(collection_id)) => {
                    Some(AppwriteConfig {
                        endpoint: endpoint.trim_end_matches('/').to_string(),
                        project_id,
                        api_key,
                        database_id,
                        collection_id,
                    })
                }
                _ => None,
            }
        };

        Ok(Config {
            tmdb: TmdbConfig {
                api_key,
                base_url: base_url.trim_end_matches('/').to_string(),
            },
            appwrite,
            debounce: Duration::from_millis(debounce_ms),
            trending_limit: file.trending_limit.unwrap_or(DEFAULT_TRENDING_LIMIT),
            database_path,
        })
    }
}

/// `~/.config/movie-finder/config.toml` on Linux
fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("movie-finder");
    path.push("config.toml");
    Some(path)
}

/// An explicitly requested file must exist; the default location is optional.
fn load_file(explicit: Option<PathBuf>, default: Option<PathBuf>) -> Result<FileConfig> {
    match (explicit, default) {
        (Some(path), _) if !path.exists() => Err(Error::Config(format!(
            "MOVIE_FINDER_CONFIG points to {}, which does not exist",
            path.display()
        ))),
        (Some(path), _) => read_file(&path),
        (None, Some(path)) if path.exists() => read_file(&path),
        (None, _) => Ok(FileConfig::default()),
    }
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}
