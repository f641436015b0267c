//! Round scoring and session progression.
//!
//! [`score`] is the only place [`ProgressionStats`] changes. It is a pure
//! function: prior stats in, new stats out. The caller owns the stats value
//! for the lifetime of the session.
//!
//! | field | rule |
//! |-------|------|
//! | `total_rounds` | +1 every round |
//! | `correct_rounds` | +1 when the chosen option is AI-generated |
//! | `streak` | +1 on correct, reset to 0 on incorrect |
//! | `xp` | `+150 * (streak_before + 1)` on correct, unchanged otherwise |
//! | `level` | `floor(xp / 1000) + 1` |
//! | `accuracy` | `round(correct / total * 100)`, 0 before the first round |

use serde::{Deserialize, Serialize};

use crate::ChallengeOption;

/// XP for a correct round at streak zero. Multiplied by `streak_before + 1`.
pub const CORRECT_ROUND_XP: u64 = 150;
pub const XP_PER_LEVEL: u64 = 1000;

#[must_use]
pub const fn level_for_xp(xp: u64) -> u32 {
    let level = xp / XP_PER_LEVEL + 1;
    if level > u32::MAX as u64 {
        u32::MAX
    } else {
        level as u32
    }
}

/// Percentage of correct rounds, rounded half up. Zero rounds yields 0.
#[must_use]
pub const fn accuracy_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct as u64;
    let total = total as u64;
    let pct = (correct * 200 + total) / (total * 2);
    if pct > 100 { 100 } else { pct as u8 }
}

/// Cumulative session record.
///
/// Fields are private so the derived values (`level`, `accuracy`) can never
/// drift from the counters they are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionStats {
    total_rounds: u32,
    correct_rounds: u32,
    streak: u32,
    xp: u64,
    level: u32,
    accuracy: u8,
}

impl Default for ProgressionStats {
    fn default() -> Self {
        Self {
            total_rounds: 0,
            correct_rounds: 0,
            streak: 0,
            xp: 0,
            level: 1,
            accuracy: 0,
        }
    }
}

impl ProgressionStats {
    #[must_use]
    pub const fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    #[must_use]
    pub const fn correct_rounds(&self) -> u32 {
        self.correct_rounds
    }

    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub const fn xp(&self) -> u64 {
        self.xp
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn accuracy(&self) -> u8 {
        self.accuracy
    }

    /// XP earned inside the current level, `0..1000`.
    #[must_use]
    pub const fn xp_into_level(&self) -> u64 {
        self.xp % XP_PER_LEVEL
    }

    /// XP a correct answer would earn right now.
    #[must_use]
    pub const fn next_correct_reward(&self) -> u64 {
        CORRECT_ROUND_XP * (self.streak as u64 + 1)
    }
}

/// Result of scoring one choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub is_correct: bool,
    pub xp_gained: u64,
    pub stats: ProgressionStats,
}

/// Score a choice. Correct means the chosen option is AI-generated; the other
/// option's flag is irrelevant, so pairs where both or neither are AI are fine.
#[must_use]
pub fn score(chosen: &ChallengeOption, prior: &ProgressionStats) -> RoundOutcome {
    let is_correct = chosen.is_ai();

    let total_rounds = prior.total_rounds.saturating_add(1);
    let correct_rounds = if is_correct {
        prior.correct_rounds.saturating_add(1)
    } else {
        prior.correct_rounds
    };
    let streak = if is_correct {
        prior.streak.saturating_add(1)
    } else {
        0
    };
    let xp_gained = if is_correct {
        prior.next_correct_reward()
    } else {
        0
    };
    let xp = prior.xp.saturating_add(xp_gained);

    RoundOutcome {
        is_correct,
        xp_gained,
        stats: ProgressionStats {
            total_rounds,
            correct_rounds,
            streak,
            xp,
            level: level_for_xp(xp),
            accuracy: accuracy_percent(correct_rounds, total_rounds),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgressionStats, accuracy_percent, level_for_xp, score};
    use crate::ChallengeOption;

    fn ai() -> ChallengeOption {
        ChallengeOption::text("synthetic", true, "too smooth")
    }

    fn human() -> ChallengeOption {
        ChallengeOption::text("organic", false, "quirky")
    }

    fn play(picks: &[bool]) -> ProgressionStats {
        picks.iter().fold(ProgressionStats::default(), |stats, pick| {
            let option = if *pick { ai() } else { human() };
            score(&option, &stats).stats
        })
    }

    fn assert_invariants(stats: &ProgressionStats) {
        assert!(stats.correct_rounds() <= stats.total_rounds());
        assert!(stats.streak() <= stats.correct_rounds());
        assert_eq!(stats.level(), level_for_xp(stats.xp()));
        assert_eq!(
            stats.accuracy(),
            accuracy_percent(stats.correct_rounds(), stats.total_rounds())
        );
    }

    #[test]
    fn defaults_are_zero_with_level_one() {
        let stats = ProgressionStats::default();
        assert_eq!(stats.total_rounds(), 0);
        assert_eq!(stats.xp(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.accuracy(), 0);
    }

    #[test]
    fn three_correct_rounds_from_zero() {
        let stats = play(&[true, true, true]);
        assert_eq!(stats.total_rounds(), 3);
        assert_eq!(stats.correct_rounds(), 3);
        assert_eq!(stats.streak(), 3);
        assert_eq!(stats.xp(), 150 + 300 + 450);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.accuracy(), 100);
    }

    #[test]
    fn miss_resets_streak_but_keeps_xp() {
        let after_first = play(&[true]);
        assert_eq!(after_first.streak(), 1);
        assert_eq!(after_first.xp(), 150);

        let after_miss = play(&[true, false]);
        assert_eq!(after_miss.streak(), 0);
        assert_eq!(after_miss.xp(), 150);
        assert_eq!(after_miss.correct_rounds(), 1);

        let stats = play(&[true, false, true]);
        assert_eq!(stats.total_rounds(), 3);
        assert_eq!(stats.correct_rounds(), 2);
        assert_eq!(stats.streak(), 1);
        assert_eq!(stats.xp(), 300);
        assert_eq!(stats.accuracy(), 67);
    }

    #[test]
    fn picking_human_every_round_never_scores() {
        let stats = play(&[false; 6]);
        assert_eq!(stats.total_rounds(), 6);
        assert_eq!(stats.correct_rounds(), 0);
        assert_eq!(stats.streak(), 0);
        assert_eq!(stats.xp(), 0);
        assert_eq!(stats.accuracy(), 0);
    }

    #[test]
    fn correctness_ignores_the_other_option() {
        // Both options AI: either pick is correct.
        let prior = ProgressionStats::default();
        assert!(score(&ai(), &prior).is_correct);
        // Both options human: either pick is wrong.
        assert!(!score(&human(), &prior).is_correct);
    }

    #[test]
    fn xp_gain_scales_with_prior_streak() {
        let mut stats = ProgressionStats::default();
        for k in 0..8u64 {
            let outcome = score(&ai(), &stats);
            assert_eq!(outcome.xp_gained, 150 * (k + 1));
            stats = outcome.stats;
        }
        let outcome = score(&human(), &stats);
        assert_eq!(outcome.xp_gained, 0);
        assert_eq!(outcome.stats.xp(), stats.xp());
    }

    #[test]
    fn every_round_increments_total_by_one() {
        let mut stats = ProgressionStats::default();
        for (i, pick) in [true, false, false, true, true, false, true].iter().enumerate() {
            let option = if *pick { ai() } else { human() };
            let next = score(&option, &stats).stats;
            assert_eq!(next.total_rounds(), stats.total_rounds() + 1, "round {i}");
            assert!(next.xp() >= stats.xp());
            assert!(next.level() >= stats.level());
            assert!(next.correct_rounds() >= stats.correct_rounds());
            assert_invariants(&next);
            stats = next;
        }
    }

    #[test]
    fn level_curve_is_floor_plus_one() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(999), 1);
        assert_eq!(level_for_xp(1000), 2);
        assert_eq!(level_for_xp(2999), 3);
        let mut last = 0;
        for xp in (0..10_000).step_by(50) {
            let level = level_for_xp(xp);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn long_streak_levels_up() {
        // 150 + 300 + 450 + 600 = 1500 -> level 2
        let stats = play(&[true, true, true, true]);
        assert_eq!(stats.xp(), 1500);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.xp_into_level(), 500);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(0, 0), 0);
        assert_eq!(accuracy_percent(1, 2), 50);
        assert_eq!(accuracy_percent(1, 8), 13);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(5, 5), 100);
    }
}
