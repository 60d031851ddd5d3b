use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::form::{recent_form, TimeWindow, DEFAULT_FORM_LENGTH};
use crate::domain::{Entrant, EntrantId, MatchOutcome, MatchParticipation, RatingValue};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub rank: usize,
    pub entrant_id: EntrantId,
    pub name: String,
    pub current_rating: RatingValue,
    pub match_count: usize,
    pub win_count: usize,
    pub draw_count: usize,
    pub loss_count: usize,
    pub form: Vec<MatchOutcome>,
    pub point_diff: RatingValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub rows: Vec<StandingsRow>,
    pub on_fire: Option<StandingsRow>,
    pub struggling: Option<StandingsRow>,
}

#[derive(Debug, Clone)]
pub struct StandingsOptions {
    pub form_length: usize,
    /// Window for `point_diff`; `None` covers the whole season
    pub point_diff_window: Option<TimeWindow>,
}

impl Default for StandingsOptions {
    fn default() -> Self {
        Self {
            form_length: DEFAULT_FORM_LENGTH,
            point_diff_window: None,
        }
    }
}

/// Folds participations into ranked standings for the active entrants
pub fn compute_standings(
    entrants: &[Entrant],
    participations: &[MatchParticipation],
    options: &StandingsOptions,
) -> Standings {
    let by_entrant = group_by_entrant(participations);

    let mut rows: Vec<StandingsRow> = entrants
        .iter()
        .filter(|e| e.active)
        .map(|entrant| {
            let history = by_entrant.get(&entrant.id).map(Vec::as_slice).unwrap_or(&[]);
            build_row(entrant, history, options)
        })
        .collect();

    rank_rows(&mut rows);

    let on_fire = rows.iter().find(|r| r.match_count > 0).cloned();
    let struggling = rows.iter().rev().find(|r| r.match_count > 0).cloned();

    Standings {
        rows,
        on_fire,
        struggling,
    }
}

/// Rating descending, entrant id ascending on ties
pub fn ranking_order(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.current_rating
        .total_cmp(&a.current_rating)
        .then_with(|| a.entrant_id.cmp(&b.entrant_id))
}

fn group_by_entrant(participations: &[MatchParticipation]) -> BTreeMap<EntrantId, Vec<&MatchParticipation>> {
    let mut grouped: BTreeMap<EntrantId, Vec<&MatchParticipation>> = BTreeMap::new();
    for participation in participations {
        grouped.entry(participation.entrant_id).or_default().push(participation);
    }
    for history in grouped.values_mut() {
        history.sort_by_key(|p| p.order_key());
    }
    grouped
}

fn build_row(entrant: &Entrant, history: &[&MatchParticipation], options: &StandingsOptions) -> StandingsRow {
    let current_rating = history
        .last()
        .map(|p| p.rating_after)
        .unwrap_or(entrant.rating);

    let count = |outcome: MatchOutcome| history.iter().filter(|p| p.outcome == outcome).count();

    let point_diff = history
        .iter()
        .filter(|p| {
            options
                .point_diff_window
                .as_ref()
                .is_none_or(|w| w.contains(p.played_at))
        })
        .map(|p| p.rating_change())
        .sum::<RatingValue>();

    StandingsRow {
        rank: 0,
        entrant_id: entrant.id,
        name: entrant.name.clone(),
        current_rating,
        match_count: history.len(),
        win_count: count(MatchOutcome::Win),
        draw_count: count(MatchOutcome::Draw),
        loss_count: count(MatchOutcome::Loss),
        form: recent_form(history.iter().copied(), options.form_length),
        point_diff,
    }
}

fn rank_rows(rows: &mut [StandingsRow]) {
    rows.sort_by(ranking_order);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
}
