use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::season::EpisodeNumber;

/// Per-entity, per-episode points. Entities are members, castaways or tribes
/// depending on the call site. Only episodes that saw scoring carry a slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScoreMatrix {
    scores: BTreeMap<String, BTreeMap<EpisodeNumber, i32>>,
}

/// An entity's season total, for ranked output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub entity: String,
    pub total: i32,
}

impl ScoreMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to an entity's episode slot, creating it on first use.
    pub fn add(&mut self, entity: &str, episode: EpisodeNumber, points: i32) {
        let slot = self
            .scores
            .entry(entity.to_string())
            .or_default()
            .entry(episode)
            .or_insert(0);
        *slot = slot.saturating_add(points);
    }

    /// Fold another matrix into this one by slot-wise addition.
    /// Sums saturate at the `i32` bounds.
    pub fn merge(&mut self, other: &ScoreMatrix) {
        for (entity, episodes) in &other.scores {
            for (episode, points) in episodes {
                self.add(entity, *episode, *points);
            }
        }
    }

    pub fn combined(matrices: &[&ScoreMatrix]) -> ScoreMatrix {
        let mut total = ScoreMatrix::new();
        for matrix in matrices {
            total.merge(matrix);
        }
        total
    }

    pub fn points(&self, entity: &str, episode: EpisodeNumber) -> i32 {
        self.scores
            .get(entity)
            .and_then(|episodes| episodes.get(&episode))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, entity: &str) -> i32 {
        self.scores
            .get(entity)
            .map(|episodes| {
                episodes
                    .values()
                    .fold(0i32, |sum, points| sum.saturating_add(*points))
            })
            .unwrap_or(0)
    }


    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Highest episode holding a slot for any entity.
    pub fn last_episode(&self) -> Option<EpisodeNumber> {
        self.scores
            .values()
            .filter_map(|episodes| episodes.keys().next_back().copied())
            .max()
    }

    /// Sparse arrays indexed by episode, `None` where nothing was scored.
    /// Each array ends at that entity's last scored episode.
    pub fn to_sparse(&self) -> BTreeMap<String, Vec<Option<i32>>> {
        self.scores
            .iter()
            .map(|(entity, episodes)| {
                let len = episodes
                    .keys()
                    .next_back()
                    .map(|last| *last as usize + 1)
                    .unwrap_or(0);
                let mut row = vec![None; len];
                for (episode, points) in episodes {
                    row[*episode as usize] = Some(*points);
                }
                (entity.clone(), row)
            })
            .collect()
    }

    /// Dense per-episode deltas for episodes `0..=through`, zero-filled.
    /// Slots after `through` are left out.
    pub fn to_dense(&self, through: EpisodeNumber) -> BTreeMap<String, Vec<i32>> {
        self.scores
            .iter()
            .map(|(entity, episodes)| {
                let mut row = vec![0; through as usize + 1];
                for (episode, points) in episodes.range(..=through) {
                    row[*episode as usize] = *points;
                }
                (entity.clone(), row)
            })
            .collect()
    }

    /// Running totals for episodes `0..=through`.
    pub fn cumulative(&self, through: EpisodeNumber) -> BTreeMap<String, Vec<i32>> {
        self.to_dense(through)
            .into_iter()
            .map(|(entity, row)| {
                let running: Vec<i32> = row
                    .iter()
                    .scan(0i32, |total, points| {
                        *total = total.saturating_add(*points);
                        Some(*total)
                    })
                    .collect();
                (entity, running)
            })
            .collect()
    }

    /// Entities ranked by total descending, then by name for ties.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .scores
            .keys()
            .map(|entity| Standing {
                entity: entity.clone(),
                total: self.total(entity),
            })
            .collect();
        standings.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.entity.cmp(&b.entity)));
        standings
    }
}
