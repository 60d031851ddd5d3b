use super::types::RosterEntry;

// 400 points of difference = 10:1 odds
const ELO_SCALE: f64 = 400.0;

/// Expected score of `rating` against `opponent_rating`
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) / ELO_SCALE))
}

/// Aggregate rating of a side: the mean of its members
pub fn side_rating(roster: &[RosterEntry]) -> f64 {
    match roster {
        [] => 0.0,
        [single] => single.rating,
        members => members.iter().map(|m| m.rating).sum::<f64>() / members.len() as f64,
    }
}
