use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::types::SelectionUpdate;
use crate::season::EpisodeNumber;

/// Which member holds which castaway, keyed by the episode the change took
/// effect. `None` marks a castaway released by its previous owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SelectionTimeline(pub BTreeMap<EpisodeNumber, BTreeMap<String, Option<String>>>);

impl SelectionTimeline {
    /// Build the timeline from draft picks and swaps. When a member picks a
    /// new castaway, their previous one is released in the same episode
    /// unless someone else claimed it there.
    pub fn from_updates(updates: &[SelectionUpdate]) -> Self {
        let mut sorted: Vec<&SelectionUpdate> = updates.iter().collect();
        sorted.sort_by_key(|u| u.episode);

        let mut timeline = SelectionTimeline::default();
        for update in sorted {
            let previous = timeline
                .castaway_of(&update.member, update.episode)
                .map(str::to_string);
            if previous.as_deref() == Some(update.castaway.as_str()) {
                continue;
            }

            let entry = timeline.0.entry(update.episode).or_default();
            if let Some(previous) = previous {
                let claimed_by_other = entry
                    .get(&previous)
                    .is_some_and(|owner| owner.as_deref() != Some(update.member.as_str()));
                if !claimed_by_other {
                    entry.insert(previous, None);
                }
            }
            entry.insert(update.castaway.clone(), Some(update.member.clone()));
        }
        timeline
    }

    /// Member holding `castaway` as of `episode`.
    ///
    /// Walks backward from `episode` to the most recent entry mentioning the
    /// castaway. Selections after `episode` are never considered.
    pub fn resolve_member(&self, castaway: &str, episode: EpisodeNumber) -> Option<&str> {
        self.0
            .range(..=episode)
            .rev()
            .find_map(|(_, picks)| picks.get(castaway))
            .and_then(|owner| owner.as_deref())
    }

    /// Castaway held by `member` as of `episode`.
    pub fn castaway_of(&self, member: &str, episode: EpisodeNumber) -> Option<&str> {
        for (_, picks) in self.0.range(..=episode).rev() {
            let picked = picks
                .iter()
                .filter(|(_, owner)| owner.as_deref() == Some(member))
                .map(|(castaway, _)| castaway.as_str())
                .find(|castaway| self.resolve_member(castaway, episode) == Some(member));
            if picked.is_some() {
                return picked;
            }
        }
        None
    }

    /// Every member that ever held a castaway.
    pub fn members(&self) -> BTreeSet<&str> {
        self.0
            .values()
            .flat_map(|picks| picks.values().filter_map(|owner| owner.as_deref()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
