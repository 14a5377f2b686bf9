use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::scoring::{LeagueScores, Standing};
use crate::season::EpisodeNumber;

/// Serializable snapshot of one league's compiled scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueReport {
    pub league: String,
    pub through_episode: EpisodeNumber,
    pub standings: Vec<Standing>,
    /// Per-member episode deltas, `null` where nothing was scored
    pub scores: BTreeMap<String, Vec<Option<i32>>>,
    /// Per-member running totals for episodes `0..=through_episode`
    pub cumulative: BTreeMap<String, Vec<i32>>,
}

impl LeagueReport {
    pub fn new(league: &str, scores: &LeagueScores, through_episode: EpisodeNumber) -> Self {
        Self {
            league: league.to_string(),
            through_episode,
            standings: scores.total.standings(),
            scores: scores.total.to_sparse(),
            cumulative: scores.total.cumulative(through_episode),
        }
    }
}

/// Save league reports to a JSON file atomically
///
/// Uses atomic-write-file so an interrupted export never leaves a partial file.
pub fn save_reports(path: &Path, reports: &[LeagueReport]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, reports).context("Failed to serialize reports")?;

    file.commit()
        .with_context(|| format!("Failed to save reports to {}", path.display()))?;

    Ok(())
}
