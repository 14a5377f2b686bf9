use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use super::types::{EliminationLog, EpisodeNumber, Event, Rosters, TribeTimeline};

impl TribeTimeline {
    /// Build the sparse timeline from `tribeUpdate` events. Each update names
    /// one tribe and the castaways that form it from that episode on; updates
    /// sharing an episode are merged into one entry.
    pub fn from_events(events: &[Event]) -> Self {
        let mut timeline = TribeTimeline::default();
        for event in events.iter().filter(|e| e.is_tribe_update()) {
            let tribes: Vec<&str> = event.tribes().collect();
            let [tribe] = tribes.as_slice() else {
                debug!(
                    "Skipping tribe update in episode {}: expected one tribe, found {}",
                    event.episode,
                    tribes.len()
                );
                continue;
            };

            let roster = timeline
                .0
                .entry(event.episode)
                .or_default()
                .entry(tribe.to_string())
                .or_default();
            for castaway in event.castaways() {
                if !roster.iter().any(|c| c == castaway) {
                    roster.push(castaway.to_string());
                }
            }
        }
        timeline
    }

    /// Every tribe that appears anywhere in the timeline.
    pub fn tribe_names(&self) -> BTreeSet<&str> {
        self.0
            .values()
            .flat_map(|rosters| rosters.keys().map(String::as_str))
            .collect()
    }

    /// True when an entry in `(after, through]` places the castaway in a tribe.
    pub fn placed_between(&self, castaway: &str, after: EpisodeNumber, through: EpisodeNumber) -> bool {
        if after >= through {
            return false;
        }
        self.0.range(after + 1..=through).any(|(_, rosters)| {
            rosters
                .values()
                .any(|members| members.iter().any(|c| c == castaway))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether a castaway is still in the game for events of `episode`.
///
/// A castaway eliminated in exactly `episode` still counts; one eliminated
/// earlier is out unless a later tribe entry brought them back.
pub fn is_active(
    timeline: &TribeTimeline,
    eliminations: &EliminationLog,
    castaway: &str,
    episode: EpisodeNumber,
) -> bool {
    let Some(before) = episode.checked_sub(1) else {
        return true;
    };
    match eliminations.elimination_episode(castaway, before) {
        None => true,
        Some(eliminated) => timeline.placed_between(castaway, eliminated, episode),
    }
}

/// Reconstruct every tribe's roster as of `episode`.
///
/// Entries are replayed in episode order: a tribe listed in an entry takes
/// that roster, and its castaways leave whichever tribe held them before.
/// Castaways no longer in the game are then removed. Tribes without an entry
/// at or before `episode` come back with an empty roster.
pub fn tribe_rosters(
    timeline: &TribeTimeline,
    eliminations: &EliminationLog,
    episode: EpisodeNumber,
) -> Rosters {
    let mut rosters: Rosters = timeline
        .tribe_names()
        .into_iter()
        .map(|tribe| (tribe.to_string(), Vec::new()))
        .collect();

    for (_, update) in timeline.0.range(..=episode) {
        let moved: BTreeSet<&str> = update
            .values()
            .flat_map(|members| members.iter().map(String::as_str))
            .collect();
        for members in rosters.values_mut() {
            members.retain(|c| !moved.contains(c.as_str()));
        }
        for (tribe, members) in update {
            rosters.insert(tribe.clone(), members.clone());
        }
    }

    for members in rosters.values_mut() {
        members.retain(|c| is_active(timeline, eliminations, c, episode));
    }
    rosters
}

/// The tribe a castaway belongs to as of `episode`, if any.
pub fn tribe_of(
    timeline: &TribeTimeline,
    eliminations: &EliminationLog,
    castaway: &str,
    episode: EpisodeNumber,
) -> Option<String> {
    tribe_rosters(timeline, eliminations, episode)
        .into_iter()
        .find(|(_, members)| members.iter().any(|c| c == castaway))
        .map(|(tribe, _)| tribe)
}

/// Castaways listed more than once within a single timeline entry.
pub fn duplicate_placements(timeline: &TribeTimeline) -> BTreeMap<EpisodeNumber, Vec<String>> {
    let mut duplicates = BTreeMap::new();
    for (episode, rosters) in &timeline.0 {
        let mut seen = BTreeSet::new();
        let mut repeated = Vec::new();
        for castaway in rosters.values().flatten() {
            if !seen.insert(castaway.as_str()) && !repeated.contains(castaway) {
                repeated.push(castaway.clone());
            }
        }
        if !repeated.is_empty() {
            duplicates.insert(*episode, repeated);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::EventReference;

    fn roster(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn timeline(entries: Vec<(EpisodeNumber, Vec<(&str, Vec<&str>)>)>) -> TribeTimeline {
        let mut timeline = TribeTimeline::default();
        for (episode, tribes) in entries {
            let rosters = timeline.0.entry(episode).or_default();
            for (tribe, members) in tribes {
                rosters.insert(tribe.to_string(), roster(&members));
            }
        }
        timeline
    }

    fn tribe_update(episode: EpisodeNumber, tribe: &str, castaways: &[&str]) -> Event {
        let mut references = vec![EventReference::Tribe(tribe.to_string())];
        references.extend(
            castaways
                .iter()
                .map(|c| EventReference::Castaway(c.to_string())),
        );
        Event {
            episode,
            name: "tribeUpdate".to_string(),
            references,
            notes: None,
        }
    }

    #[test]
    fn test_from_events_builds_sparse_entries() {
        let events = vec![
            tribe_update(0, "Red", &["A", "B"]),
            tribe_update(0, "Blue", &["C", "D"]),
            tribe_update(5, "Green", &["A", "C"]),
        ];
        let timeline = TribeTimeline::from_events(&events);
        assert_eq!(timeline.0.len(), 2);
        assert_eq!(timeline.0[&0]["Red"], roster(&["A", "B"]));
        assert_eq!(timeline.0[&0]["Blue"], roster(&["C", "D"]));
        assert_eq!(timeline.0[&5]["Green"], roster(&["A", "C"]));
    }

    #[test]
    fn test_from_events_skips_ambiguous_updates() {
        let mut event = tribe_update(0, "Red", &["A"]);
        event.references.push(EventReference::Tribe("Blue".to_string()));
        assert!(TribeTimeline::from_events(&[event]).is_empty());
    }

    #[test]
    fn test_rosters_inherit_prior_entry() {
        let timeline = timeline(vec![(0, vec![("Red", vec!["A", "B"]), ("Blue", vec!["C"])])]);
        let rosters = tribe_rosters(&timeline, &EliminationLog::default(), 6);
        assert_eq!(rosters["Red"], roster(&["A", "B"]));
        assert_eq!(rosters["Blue"], roster(&["C"]));
    }

    #[test]
    fn test_rosters_empty_before_first_entry() {
        let timeline = timeline(vec![(3, vec![("Red", vec!["A"])])]);
        let rosters = tribe_rosters(&timeline, &EliminationLog::default(), 2);
        assert_eq!(rosters["Red"], Vec::<String>::new());
    }

    #[test]
    fn test_swap_moves_castaway_out_of_old_tribe() {
        let timeline = timeline(vec![
            (0, vec![("Red", vec!["A", "B"]), ("Blue", vec!["C", "D"])]),
            (4, vec![("Blue", vec!["A", "C", "D"])]),
        ]);
        let log = EliminationLog::default();

        let before = tribe_rosters(&timeline, &log, 3);
        assert_eq!(before["Red"], roster(&["A", "B"]));

        let after = tribe_rosters(&timeline, &log, 4);
        assert_eq!(after["Red"], roster(&["B"]));
        assert_eq!(after["Blue"], roster(&["A", "C", "D"]));
    }

    #[test]
    fn test_merge_retires_old_tribes() {
        let timeline = timeline(vec![
            (0, vec![("Red", vec!["A", "B"]), ("Blue", vec!["C"])]),
            (7, vec![("Merged", vec!["A", "B", "C"])]),
        ]);
        let rosters = tribe_rosters(&timeline, &EliminationLog::default(), 8);
        assert!(rosters["Red"].is_empty());
        assert!(rosters["Blue"].is_empty());
        assert_eq!(rosters["Merged"], roster(&["A", "B", "C"]));
    }

    #[test]
    fn test_elimination_boundary() {
        let timeline = timeline(vec![(0, vec![("Red", vec!["A", "B", "C"])])]);
        let mut log = EliminationLog::default();
        log.record(4, "A", "elim");

        assert_eq!(tribe_rosters(&timeline, &log, 4)["Red"], roster(&["A", "B", "C"]));
        assert_eq!(tribe_rosters(&timeline, &log, 5)["Red"], roster(&["B", "C"]));
    }

    #[test]
    fn test_returning_castaway_is_active_again() {
        let timeline = timeline(vec![
            (0, vec![("Red", vec!["A", "B"])]),
            (6, vec![("Red", vec!["A", "B"])]),
        ]);
        let mut log = EliminationLog::default();
        log.record(2, "A", "elim");

        assert!(!is_active(&timeline, &log, "A", 4));
        assert!(is_active(&timeline, &log, "A", 6));
        assert_eq!(tribe_rosters(&timeline, &log, 7)["Red"], roster(&["A", "B"]));
    }

    #[test]
    fn test_is_active_at_episode_zero() {
        let mut log = EliminationLog::default();
        log.record(0, "A", "elim");
        assert!(is_active(&TribeTimeline::default(), &log, "A", 0));
        assert!(!is_active(&TribeTimeline::default(), &log, "A", 1));
    }

    #[test]
    fn test_tribe_of() {
        let timeline = timeline(vec![(0, vec![("Red", vec!["A"]), ("Blue", vec!["B"])])]);
        let log = EliminationLog::default();
        assert_eq!(tribe_of(&timeline, &log, "B", 2), Some("Blue".to_string()));
        assert_eq!(tribe_of(&timeline, &log, "Z", 2), None);
    }

    #[test]
    fn test_duplicate_placements() {
        let timeline = timeline(vec![
            (0, vec![("Red", vec!["A", "B"]), ("Blue", vec!["B", "C"])]),
            (3, vec![("Red", vec!["A"])]),
        ]);
        let duplicates = duplicate_placements(&timeline);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[&0], roster(&["B"]));
    }
}
