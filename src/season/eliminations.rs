use super::types::{BaseEventName, Elimination, EliminationLog, EpisodeNumber, Event};

impl EliminationLog {
    /// Extract eliminations from a season's event log. Every castaway
    /// referenced by an `elim` or `noVoteExit` event is recorded under
    /// that event's episode.
    pub fn from_events(events: &[Event]) -> Self {
        let mut log = EliminationLog::default();
        for event in events {
            let is_elimination = event
                .name
                .parse::<BaseEventName>()
                .map(|name| name.is_elimination())
                .unwrap_or(false);
            if !is_elimination {
                continue;
            }
            for castaway in event.castaways() {
                log.record(event.episode, castaway, &event.name);
            }
        }
        log
    }

    pub fn record(&mut self, episode: EpisodeNumber, castaway: &str, event: &str) {
        let entries = self.0.entry(episode).or_default();
        if entries.iter().any(|e| e.castaway == castaway) {
            return;
        }
        entries.push(Elimination {
            castaway: castaway.to_string(),
            event: event.to_string(),
        });
    }

    /// Most recent episode at or before `at` in which the castaway was
    /// eliminated.
    pub fn elimination_episode(&self, castaway: &str, at: EpisodeNumber) -> Option<EpisodeNumber> {
        self.0
            .range(..=at)
            .rev()
            .find(|(_, eliminated)| eliminated.iter().any(|e| e.castaway == castaway))
            .map(|(episode, _)| *episode)
    }

    pub fn eliminated_in(&self, castaway: &str, episode: EpisodeNumber) -> bool {
        self.0
            .get(&episode)
            .map(|eliminated| eliminated.iter().any(|e| e.castaway == castaway))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|eliminated| eliminated.is_empty())
    }
}
