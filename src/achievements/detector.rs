use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{HistoryEntry, MatchOutcome};

const WIN_STREAK_TIERS: [usize; 3] = [5, 10, 15];
const CLEAN_SHEET_TIERS: [usize; 3] = [5, 10, 15];
const REDEMPTION_TIERS: [usize; 3] = [3, 5, 8];
const GOAL_STREAK_TIERS: [i32; 3] = [3, 5, 8];
const GOAL_STREAK_WINDOW: usize = 5;

/// Achievement kinds; the number is the tier threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AchievementType {
    WinStreak(usize),
    CleanSheetStreak(usize),
    Redemption(usize),
    GoalStreak(i32),
}

impl AchievementType {
    /// Persisted identifier, e.g. `5_win_streak`
    pub fn key(&self) -> String {
        match self {
            AchievementType::WinStreak(n) => format!("{n}_win_streak"),
            AchievementType::CleanSheetStreak(n) => format!("{n}_clean_sheet_streak"),
            AchievementType::Redemption(n) => format!("{n}_win_loss_redemption"),
            AchievementType::GoalStreak(n) => format!("{n}_goal_streak"),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (tier, kind) = key.split_once('_')?;
        match kind {
            "win_streak" => tier.parse().ok().map(AchievementType::WinStreak),
            "clean_sheet_streak" => tier.parse().ok().map(AchievementType::CleanSheetStreak),
            "win_loss_redemption" => tier.parse().ok().map(AchievementType::Redemption),
            "goal_streak" => tier.parse().ok().map(AchievementType::GoalStreak),
            _ => None,
        }
    }

    pub fn description(&self) -> String {
        match self {
            AchievementType::WinStreak(n) => format!("Won {n} matches in a row"),
            AchievementType::CleanSheetStreak(n) => format!("Conceded nothing in {n} matches in a row"),
            AchievementType::Redemption(n) => format!("Followed {n} straight losses with {n} straight wins"),
            AchievementType::GoalStreak(n) => {
                format!("Scored at least {n} in each of the last {GOAL_STREAK_WINDOW} matches")
            }
        }
    }
}

impl fmt::Display for AchievementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Scans an entrant's full chronological history. Tiers are cumulative: a
/// 15-match win streak also grants the 5 and 10 tiers.
pub fn detect_achievements(history: &[HistoryEntry]) -> BTreeSet<AchievementType> {
    let outcomes: Vec<MatchOutcome> = history.iter().map(|h| h.outcome).collect();

    let mut found = detect_result_achievements(&outcomes);
    found.extend(clean_sheet_streaks(history));
    found.extend(goal_streaks(history));
    found
}

/// Achievements that only need the W/D/L sequence
pub fn detect_result_achievements(outcomes: &[MatchOutcome]) -> BTreeSet<AchievementType> {
    let mut found = BTreeSet::new();

    let longest_win_run = longest_run(outcomes.iter().map(|&o| o == MatchOutcome::Win));
    found.extend(
        WIN_STREAK_TIERS
            .iter()
            .filter(|&&tier| longest_win_run >= tier)
            .map(|&tier| AchievementType::WinStreak(tier)),
    );

    let results: String = outcomes.iter().map(MatchOutcome::as_char).collect();
    found.extend(
        REDEMPTION_TIERS
            .iter()
            .filter(|&&tier| results.contains(&redemption_pattern(tier)))
            .map(|&tier| AchievementType::Redemption(tier)),
    );

    found
}

fn clean_sheet_streaks(history: &[HistoryEntry]) -> impl Iterator<Item = AchievementType> {
    let longest = longest_run(history.iter().map(|h| h.goals_conceded == 0));
    CLEAN_SHEET_TIERS
        .into_iter()
        .filter(move |&tier| longest >= tier)
        .map(AchievementType::CleanSheetStreak)
}

fn goal_streaks(history: &[HistoryEntry]) -> impl Iterator<Item = AchievementType> {
    let recent_minimum = if history.len() >= GOAL_STREAK_WINDOW {
        history[history.len() - GOAL_STREAK_WINDOW..]
            .iter()
            .map(|h| h.goals_scored)
            .min()
    } else {
        None
    };

    GOAL_STREAK_TIERS
        .into_iter()
        .filter(move |&tier| recent_minimum.is_some_and(|min| min >= tier))
        .map(AchievementType::GoalStreak)
}

// Substring match, so a longer loss run before exactly `n` wins also counts
fn redemption_pattern(n: usize) -> String {
    format!("{}{}", "L".repeat(n), "W".repeat(n))
}

fn longest_run(flags: impl Iterator<Item = bool>) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for flag in flags {
        current = if flag { current + 1 } else { 0 };
        longest = longest.max(current);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn outcomes(results: &str) -> Vec<MatchOutcome> {
        results
            .chars()
            .filter_map(|c| MatchOutcome::from_code(&c.to_string()))
            .collect()
    }

    fn keys(found: &BTreeSet<AchievementType>) -> BTreeSet<String> {
        found.iter().map(AchievementType::key).collect()
    }

    fn history(entries: &[(MatchOutcome, i32, i32)]) -> Vec<HistoryEntry> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        entries
            .iter()
            .enumerate()
            .map(|(idx, &(outcome, scored, conceded))| HistoryEntry {
                match_id: idx as i64 + 1,
                played_at: base + Duration::days(idx as i64),
                outcome,
                goals_scored: scored,
                goals_conceded: conceded,
            })
            .collect()
    }

    #[test]
    fn test_five_wins() {
        let found = detect_result_achievements(&outcomes("WWWWW"));
        assert_eq!(keys(&found), BTreeSet::from(["5_win_streak".to_string()]));
    }

    #[test]
    fn test_three_redemption() {
        let found = detect_result_achievements(&outcomes("LLLWWW"));
        assert_eq!(keys(&found), BTreeSet::from(["3_win_loss_redemption".to_string()]));
    }

    #[test]
    fn test_longer_loss_run_still_redeems() {
        let found = detect_result_achievements(&outcomes("LLLLWWW"));
        assert!(found.contains(&AchievementType::Redemption(3)));
    }

    #[test]
    fn test_broken_streak_does_not_count() {
        let found = detect_result_achievements(&outcomes("WWWWDWWWW"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_win_tiers_are_cumulative() {
        let found = detect_result_achievements(&outcomes(&"W".repeat(15)));
        assert_eq!(
            found,
            BTreeSet::from([
                AchievementType::WinStreak(5),
                AchievementType::WinStreak(10),
                AchievementType::WinStreak(15),
            ])
        );
    }

    #[test]
    fn test_redemption_tiers() {
        let found = detect_result_achievements(&outcomes("LLLLLWWWWW"));
        assert_eq!(
            found,
            BTreeSet::from([
                AchievementType::WinStreak(5),
                AchievementType::Redemption(3),
                AchievementType::Redemption(5),
            ])
        );

        let found = detect_result_achievements(&outcomes(&format!("{}{}", "L".repeat(8), "W".repeat(8))));
        assert_eq!(
            found,
            BTreeSet::from([
                AchievementType::WinStreak(5),
                AchievementType::Redemption(3),
                AchievementType::Redemption(5),
                AchievementType::Redemption(8),
            ])
        );
    }

    #[test]
    fn test_clean_sheet_tiers() {
        let goalless = |n: usize| history(&vec![(MatchOutcome::Draw, 0, 0); n]);

        let found = detect_achievements(&goalless(12));
        assert_eq!(
            found,
            BTreeSet::from([AchievementType::CleanSheetStreak(5), AchievementType::CleanSheetStreak(10)])
        );

        let found = detect_achievements(&goalless(15));
        assert_eq!(
            found,
            BTreeSet::from([
                AchievementType::CleanSheetStreak(5),
                AchievementType::CleanSheetStreak(10),
                AchievementType::CleanSheetStreak(15),
            ])
        );
    }

    #[test]
    fn test_clean_sheets_and_goal_streaks() {
        let entries: Vec<(MatchOutcome, i32, i32)> = (0..5).map(|_| (MatchOutcome::Win, 5, 0)).collect();

        let found = detect_achievements(&history(&entries));

        assert_eq!(
            keys(&found),
            BTreeSet::from([
                "5_win_streak".to_string(),
                "5_clean_sheet_streak".to_string(),
                "3_goal_streak".to_string(),
                "5_goal_streak".to_string(),
            ])
        );
    }

    #[test]
    fn test_goal_streak_needs_full_window() {
        let entries = vec![(MatchOutcome::Win, 9, 1); 4];
        let found = detect_achievements(&history(&entries));
        assert!(found.iter().all(|a| !matches!(a, AchievementType::GoalStreak(_))));
    }

    #[test]
    fn test_goal_streak_uses_latest_matches_only() {
        let mut entries = vec![(MatchOutcome::Loss, 0, 2); 3];
        entries.extend(vec![(MatchOutcome::Draw, 3, 3); 5]);
        let found = detect_achievements(&history(&entries));
        assert!(found.contains(&AchievementType::GoalStreak(3)));

        entries.push((MatchOutcome::Loss, 2, 4));
        let found = detect_achievements(&history(&entries));
        assert!(!found.contains(&AchievementType::GoalStreak(3)));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let entries = vec![
            (MatchOutcome::Loss, 0, 1),
            (MatchOutcome::Loss, 1, 2),
            (MatchOutcome::Loss, 0, 3),
            (MatchOutcome::Win, 3, 0),
            (MatchOutcome::Win, 4, 0),
            (MatchOutcome::Win, 3, 0),
        ];
        let history = history(&entries);

        assert_eq!(detect_achievements(&history), detect_achievements(&history));
    }

    #[test]
    fn test_keys_round_trip() {
        for achievement in [
            AchievementType::WinStreak(10),
            AchievementType::CleanSheetStreak(5),
            AchievementType::Redemption(8),
            AchievementType::GoalStreak(3),
        ] {
            assert_eq!(AchievementType::from_key(&achievement.key()), Some(achievement));
        }
        assert_eq!(AchievementType::from_key("unknown"), None);
    }
}
