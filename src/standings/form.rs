use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{EntrantId, MatchOutcome, MatchParticipation, RatingValue};

pub const DEFAULT_FORM_LENGTH: usize = 5;

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The UTC calendar day containing `now`
    pub fn day_of(now: DateTime<Utc>) -> Self {
        let start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        Self::new(start, start + Duration::days(1))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Net rating change per entrant; `None` sums over the whole history
pub fn point_diff(
    participations: &[MatchParticipation],
    window: Option<&TimeWindow>,
) -> BTreeMap<EntrantId, RatingValue> {
    let mut diffs = BTreeMap::new();
    for participation in participations {
        if window.is_some_and(|w| !w.contains(participation.played_at)) {
            continue;
        }
        *diffs.entry(participation.entrant_id).or_insert(0.0) += participation.rating_change();
    }
    diffs
}

/// Latest `length` outcomes, most recent first
pub fn recent_form<'a, I>(participations: I, length: usize) -> Vec<MatchOutcome>
where
    I: IntoIterator<Item = &'a MatchParticipation>,
{
    let mut ordered: Vec<&MatchParticipation> = participations.into_iter().collect();
    ordered.sort_by_key(|p| std::cmp::Reverse(p.order_key()));
    ordered.into_iter().take(length).map(|p| p.outcome).collect()
}

/// Form rendered as a compact string, e.g. `"WWDLW"`
pub fn form_string(form: &[MatchOutcome]) -> String {
    form.iter().map(MatchOutcome::as_char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;
    use chrono::TimeZone;

    fn participation(entrant_id: EntrantId, match_id: i64, played_at: DateTime<Utc>, delta: f64, outcome: MatchOutcome) -> MatchParticipation {
        MatchParticipation {
            match_id,
            entrant_id,
            side: Side::Home,
            played_at,
            rating_before: 1200.0,
            rating_after: 1200.0 + delta,
            outcome,
        }
    }

    #[test]
    fn test_day_window_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 15, 30, 0).unwrap();
        let window = TimeWindow::day_of(now);

        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());
        assert!(window.contains(now));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_point_diff_respects_window() {
        let yesterday = Utc.with_ymd_and_hms(2024, 6, 9, 20, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let participations = vec![
            participation(1, 1, yesterday, 16.0, MatchOutcome::Win),
            participation(1, 2, today, -12.5, MatchOutcome::Loss),
            participation(1, 3, today, 4.0, MatchOutcome::Draw),
            participation(2, 2, today, 12.5, MatchOutcome::Win),
        ];

        let window = TimeWindow::day_of(today);
        let today_diff = point_diff(&participations, Some(&window));
        let season_diff = point_diff(&participations, None);

        assert_eq!(today_diff.get(&1), Some(&-8.5));
        assert_eq!(today_diff.get(&2), Some(&12.5));
        assert_eq!(season_diff.get(&1), Some(&7.5));
    }

    #[test]
    fn test_recent_form_most_recent_first() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let outcomes = [
            MatchOutcome::Loss,
            MatchOutcome::Win,
            MatchOutcome::Win,
            MatchOutcome::Draw,
            MatchOutcome::Loss,
            MatchOutcome::Win,
        ];
        let participations: Vec<MatchParticipation> = outcomes
            .iter()
            .enumerate()
            .map(|(idx, &o)| participation(1, idx as i64 + 1, base + Duration::hours(idx as i64), 0.0, o))
            .collect();

        let form = recent_form(participations.iter().rev(), DEFAULT_FORM_LENGTH);

        assert_eq!(form_string(&form), "WLDWW");
    }

    #[test]
    fn test_recent_form_short_history() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let participations = vec![participation(1, 1, base, 0.0, MatchOutcome::Draw)];

        assert_eq!(recent_form(&participations, 5), vec![MatchOutcome::Draw]);
        assert!(recent_form(Vec::<MatchParticipation>::new().iter(), 5).is_empty());
    }
}
