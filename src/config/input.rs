use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use super::{resolve_path, Config};
use crate::league::League;
use crate::season::Season;

/// A league file loaded through the config, with its display name.
#[derive(Debug, Clone)]
pub struct LeagueInput {
    pub name: String,
    pub league: League,
}

/// Read a season or league document. Files ending in `.json` are parsed as
/// JSON, everything else as YAML.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}: invalid JSON", path.display()))
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse {}: invalid YAML", path.display()))
    }
}

pub fn load_season(path: &Path) -> Result<Season> {
    load_document(path).context("Failed to load season")
}

pub fn load_league(path: &Path) -> Result<League> {
    load_document(path).context("Failed to load league")
}

/// Load every league listed in the config, in config order.
pub fn load_leagues(config: &Config, config_path: &Path) -> Result<Vec<LeagueInput>> {
    config
        .leagues
        .iter()
        .map(|entry| {
            let path = resolve_path(config_path, &entry.path);
            let league = load_league(&path)?;
            let name = entry.name.clone().unwrap_or_else(|| league.name.clone());
            Ok(LeagueInput { name, league })
        })
        .collect()
}
