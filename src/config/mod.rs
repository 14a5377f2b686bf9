pub mod input;
mod schema;

pub use input::{load_document, load_league, load_leagues, load_season, LeagueInput};
pub use schema::{Config, LeagueConfig};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::season::episodes::{parse_airing_window, DEFAULT_AIRING_WINDOW};

/// Get the config directory path (~/.config/survivor-scores/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("survivor-scores"))
}

/// Get the default config file path (~/.config/survivor-scores/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Path to the config file, usually from `--config` or [`get_config_path`]
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Create ~/.config/survivor-scores/config.yaml",
            path.display()
        );
    }

    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}

/// Resolve a path from the config file relative to the file's directory.
pub fn resolve_path(config_path: &Path, relative: &str) -> PathBuf {
    let candidate = PathBuf::from(relative);
    if candidate.is_absolute() {
        return candidate;
    }
    config_path
        .parent()
        .map(|dir| dir.join(&candidate))
        .unwrap_or(candidate)
}

impl Config {
    pub fn airing_window(&self) -> Result<chrono::Duration> {
        let window = self.airing_window.as_deref().unwrap_or(DEFAULT_AIRING_WINDOW);
        parse_airing_window(window)
            .with_context(|| format!("Invalid airing_window '{}'", window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_resolve_relative_path() {
        let config_path = Path::new("/home/me/.config/survivor-scores/config.yaml");
        assert_eq!(
            resolve_path(config_path, "season.yaml"),
            PathBuf::from("/home/me/.config/survivor-scores/season.yaml")
        );
    }

    #[test]
    fn test_resolve_absolute_path() {
        let config_path = Path::new("/home/me/config.yaml");
        assert_eq!(
            resolve_path(config_path, "/data/season.yaml"),
            PathBuf::from("/data/season.yaml")
        );
    }

    #[test]
    fn test_load_missing_config() {
        let path = env::temp_dir().join("survivor_scores_missing_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_file() {
        let path = env::temp_dir().join("survivor_scores_test_config.yaml");
        fs::write(&path, "season: season.yaml\nairing_window: 1h\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.season, "season.yaml");
        assert_eq!(config.airing_window().unwrap(), chrono::Duration::hours(1));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_default_airing_window() {
        let config: Config = serde_saphyr::from_str("season: s.yaml").unwrap();
        assert_eq!(config.airing_window().unwrap(), chrono::Duration::minutes(90));
    }

    #[test]
    fn test_invalid_airing_window() {
        let config: Config = serde_saphyr::from_str("season: s.yaml\nairing_window: later").unwrap();
        assert!(config.airing_window().is_err());
    }
}
