use super::config::RuleSet;
use super::matrix::ScoreMatrix;
use crate::league::{shot_played, SelectionTimeline, ShotInTheDark};
use crate::season::{is_active, EliminationLog, EpisodeNumber, TribeTimeline};

/// Survival is first counted in episode 1; episode 0 is the draft.
const FIRST_SURVIVAL_EPISODE: EpisodeNumber = 1;

enum Survival {
    Survived,
    EliminatedNow,
    Out,
}

/// Survival streak bonus per member and episode.
///
/// Each episode a member's castaway survives, the member's streak grows by
/// one and they earn `min(streak, cap)` points. An elimination resets the
/// streak, unless the member played a shot in the dark that episode and the
/// league preserves streaks; the kept streak then carries over until the
/// member holds a castaway who is still in the game.
///
/// Returns an empty matrix when the league has no survival cap.
pub fn compute_streak_bonus(
    selections: &SelectionTimeline,
    eliminations: &EliminationLog,
    tribe_updates: &TribeTimeline,
    shots: &[ShotInTheDark],
    rules: &RuleSet,
    through_episode: EpisodeNumber,
) -> ScoreMatrix {
    let mut bonus = ScoreMatrix::new();
    let Some(cap) = rules.survival.cap.filter(|cap| *cap > 0) else {
        return bonus;
    };

    for member in selections.members() {
        let mut streak: u32 = 0;
        let mut preserved = false;

        for episode in FIRST_SURVIVAL_EPISODE..=through_episode {
            let survival = selections.castaway_of(member, episode).map(|castaway| {
                if !is_active(tribe_updates, eliminations, castaway, episode) {
                    Survival::Out
                } else if eliminations.eliminated_in(castaway, episode) {
                    Survival::EliminatedNow
                } else {
                    Survival::Survived
                }
            });

            match survival {
                Some(Survival::Survived) => {
                    streak = streak.saturating_add(1);
                    preserved = false;
                    bonus.add(member, episode, i32::try_from(streak.min(cap)).unwrap_or(i32::MAX));
                }
                Some(Survival::EliminatedNow) => {
                    if rules.survival.preserve_streak && shot_played(shots, member, episode) {
                        preserved = true;
                    } else {
                        streak = 0;
                        preserved = false;
                    }
                }
                Some(Survival::Out) | None => {
                    if !preserved {
                        streak = 0;
                    }
                }
            }
        }
    }
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::SelectionUpdate;

    fn pick(member: &str, castaway: &str, episode: EpisodeNumber) -> SelectionUpdate {
        SelectionUpdate {
            member: member.to_string(),
            castaway: castaway.to_string(),
            episode,
        }
    }

    fn shot(member: &str, episode: EpisodeNumber) -> ShotInTheDark {
        ShotInTheDark {
            member: member.to_string(),
            episode,
        }
    }

    fn rules(cap: Option<u32>, preserve_streak: bool) -> RuleSet {
        let mut rules = RuleSet::default();
        rules.survival.cap = cap;
        rules.survival.preserve_streak = preserve_streak;
        rules
    }

    fn bonus_row(bonus: &ScoreMatrix, member: &str, through: EpisodeNumber) -> Vec<i32> {
        bonus.to_dense(through).remove(member).unwrap_or_default()
    }

    #[test]
    fn test_disabled_without_cap() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 0)]);
        let bonus = compute_streak_bonus(
            &selections,
            &EliminationLog::default(),
            &TribeTimeline::default(),
            &[],
            &rules(None, false),
            5,
        );
        assert!(bonus.is_empty());
    }

    #[test]
    fn test_streak_grows_up_to_cap() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 0)]);
        let bonus = compute_streak_bonus(
            &selections,
            &EliminationLog::default(),
            &TribeTimeline::default(),
            &[],
            &rules(Some(3), false),
            5,
        );
        assert_eq!(bonus_row(&bonus, "Alice", 5), vec![0, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn test_elimination_resets_streak() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 0), pick("Alice", "B", 4)]);
        let mut eliminations = EliminationLog::default();
        eliminations.record(3, "A", "elim");

        let bonus = compute_streak_bonus(
            &selections,
            &eliminations,
            &TribeTimeline::default(),
            &[],
            &rules(Some(5), false),
            5,
        );
        assert_eq!(bonus_row(&bonus, "Alice", 5), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_shot_in_the_dark_preserves_streak() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 0), pick("Alice", "B", 5)]);
        let mut eliminations = EliminationLog::default();
        eliminations.record(3, "A", "elim");
        let shots = vec![shot("Alice", 3)];

        let bonus = compute_streak_bonus(
            &selections,
            &eliminations,
            &TribeTimeline::default(),
            &shots,
            &rules(Some(5), true),
            6,
        );
        // Streak of 2 kept through the elimination and the gap before the swap
        assert_eq!(bonus_row(&bonus, "Alice", 6), vec![0, 1, 2, 0, 0, 3, 4]);
    }

    #[test]
    fn test_shot_without_preserve_setting() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 0), pick("Alice", "B", 4)]);
        let mut eliminations = EliminationLog::default();
        eliminations.record(3, "A", "elim");
        let shots = vec![shot("Alice", 3)];

        let bonus = compute_streak_bonus(
            &selections,
            &eliminations,
            &TribeTimeline::default(),
            &shots,
            &rules(Some(5), false),
            4,
        );
        assert_eq!(bonus_row(&bonus, "Alice", 4), vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_shot_in_other_episode_does_not_help() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 0), pick("Alice", "B", 4)]);
        let mut eliminations = EliminationLog::default();
        eliminations.record(3, "A", "elim");
        let shots = vec![shot("Alice", 2)];

        let bonus = compute_streak_bonus(
            &selections,
            &eliminations,
            &TribeTimeline::default(),
            &shots,
            &rules(Some(5), true),
            4,
        );
        assert_eq!(bonus_row(&bonus, "Alice", 4), vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_no_bonus_before_first_pick() {
        let selections = SelectionTimeline::from_updates(&[pick("Alice", "A", 3)]);
        let bonus = compute_streak_bonus(
            &selections,
            &EliminationLog::default(),
            &TribeTimeline::default(),
            &[],
            &rules(Some(5), false),
            4,
        );
        assert_eq!(bonus_row(&bonus, "Alice", 4), vec![0, 0, 0, 1, 2]);
    }
}
