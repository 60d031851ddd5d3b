use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use log::debug;

use crate::domain::{
    Entrant, EntrantId, EntrantKind, Match, MatchId, MatchParticipation, NewMatch, RatingValue,
    Season, Side,
};
use crate::errors::ScoringError;
use crate::rating::{calculate_match, MatchRating, RosterEntry};

/// A validated, fully computed registration that has not been applied yet
#[derive(Debug, Clone, PartialEq)]
pub struct MatchApplication {
    pub new_match: NewMatch,
    pub rating: MatchRating,
}

impl MatchApplication {
    pub fn participations(&self, match_id: MatchId) -> Vec<MatchParticipation> {
        self.rating
            .changes
            .iter()
            .map(|change| MatchParticipation {
                match_id,
                entrant_id: change.entrant_id,
                side: change.side,
                played_at: self.new_match.played_at,
                rating_before: change.rating_before,
                rating_after: change.rating_after,
                outcome: change.outcome,
            })
            .collect()
    }
}

/// Ratings to restore when a match is reverted
#[derive(Debug, Clone, PartialEq)]
pub struct MatchReversal {
    pub match_id: MatchId,
    pub restored: Vec<(EntrantId, RatingValue)>,
}

/// In-memory state of one season: current ratings plus the match history
/// that produced them. Every mutation is validated and computed in full
/// before anything is changed.
#[derive(Debug, Clone)]
pub struct SeasonLedger {
    season: Season,
    ratings: BTreeMap<EntrantId, RatingValue>,
    /// Members of every team entrant; teams are rated as units
    team_members: BTreeMap<EntrantId, Vec<EntrantId>>,
    matches: Vec<Match>,
    participations: Vec<MatchParticipation>,
}

impl SeasonLedger {
    pub fn new(season: Season, entrants: &[Entrant]) -> Self {
        Self::with_history(season, entrants, Vec::new(), Vec::new())
    }

    /// Restores a ledger from stored state; entrant ratings are taken as current
    pub fn with_history(
        season: Season,
        entrants: &[Entrant],
        mut matches: Vec<Match>,
        participations: Vec<MatchParticipation>,
    ) -> Self {
        matches.sort_by_key(|m| m.order_key());
        let ratings = entrants.iter().map(|e| (e.id, e.rating)).collect();

        Self {
            season,
            ratings,
            team_members: team_members(entrants),
            matches,
            participations,
        }
    }

    /// Recomputes a season from scratch: every entrant starts at the
    /// season's initial score and matches are applied chronologically,
    /// keeping their ids.
    pub fn replay(season: Season, entrants: &[Entrant], mut matches: Vec<Match>) -> Result<Self, ScoringError> {
        let initial = season.initial_score;
        let ratings = entrants.iter().map(|e| (e.id, initial)).collect();
        let mut ledger = Self {
            season,
            ratings,
            team_members: team_members(entrants),
            matches: Vec::with_capacity(matches.len()),
            participations: Vec::new(),
        };

        matches.sort_by_key(|m| m.order_key());
        for recorded in matches {
            let new_match = NewMatch {
                played_at: recorded.played_at,
                home_score: recorded.home_score,
                away_score: recorded.away_score,
                home: recorded.home,
                away: recorded.away,
            };
            let application = ledger.prepare(&new_match, false)?;
            ledger.apply(recorded.id, application);
        }

        debug!(
            "Replayed {} matches for season {}",
            ledger.matches.len(),
            ledger.season.id
        );
        Ok(ledger)
    }

    pub fn season(&self) -> &Season {
        &self.season
    }

    pub fn rating(&self, entrant_id: EntrantId) -> Option<RatingValue> {
        self.ratings.get(&entrant_id).copied()
    }

    pub fn ratings(&self) -> &BTreeMap<EntrantId, RatingValue> {
        &self.ratings
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn participations(&self) -> &[MatchParticipation] {
        &self.participations
    }

    pub fn latest_match(&self) -> Option<&Match> {
        self.matches.last()
    }

    /// Validates a match against the current state and computes its effect
    pub fn prepare_registration(&self, new_match: &NewMatch) -> Result<MatchApplication, ScoringError> {
        self.prepare(new_match, true)
    }

    /// Registers a match with the next free id
    pub fn register(&mut self, new_match: NewMatch) -> Result<Match, ScoringError> {
        let application = self.prepare_registration(&new_match)?;
        let match_id = self.next_match_id();
        Ok(self.apply(match_id, application))
    }

    /// Applies a prepared registration under an externally assigned id
    pub fn apply(&mut self, match_id: MatchId, application: MatchApplication) -> Match {
        for change in &application.rating.changes {
            self.ratings.insert(change.entrant_id, change.rating_after);
        }
        self.participations.extend(application.participations(match_id));

        let MatchApplication { new_match, .. } = application;
        let registered = Match {
            id: match_id,
            season_id: self.season.id,
            played_at: new_match.played_at,
            home_score: new_match.home_score,
            away_score: new_match.away_score,
            home: new_match.home,
            away: new_match.away,
        };
        self.matches.push(registered.clone());
        registered
    }

    /// Checks that `match_id` is the season's latest match and collects the
    /// ratings its participants had before it
    pub fn prepare_reversal(&self, match_id: MatchId) -> Result<MatchReversal, ScoringError> {
        let latest = self
            .latest_match()
            .ok_or(ScoringError::UnknownMatch(match_id))?;

        if latest.id != match_id {
            if self.matches.iter().any(|m| m.id == match_id) {
                return Err(ScoringError::InvalidRevertOrder {
                    match_id,
                    latest: latest.id,
                });
            }
            return Err(ScoringError::UnknownMatch(match_id));
        }

        let restored = self
            .participations
            .iter()
            .filter(|p| p.match_id == match_id)
            .map(|p| (p.entrant_id, p.rating_before))
            .collect();

        Ok(MatchReversal { match_id, restored })
    }

    pub fn revert(&mut self, match_id: MatchId) -> Result<MatchReversal, ScoringError> {
        let reversal = self.prepare_reversal(match_id)?;

        for &(entrant_id, rating) in &reversal.restored {
            self.ratings.insert(entrant_id, rating);
        }
        self.participations.retain(|p| p.match_id != match_id);
        self.matches.pop();

        Ok(reversal)
    }

    fn prepare(&self, new_match: &NewMatch, enforce_open: bool) -> Result<MatchApplication, ScoringError> {
        if enforce_open && self.season.closed {
            return Err(ScoringError::SeasonClosed(self.season.id));
        }

        self.ensure_chronological(new_match.played_at)?;
        let home = self.roster(&new_match.home, Side::Home)?;
        let away = self.roster(&new_match.away, Side::Away)?;
        self.ensure_disjoint(&new_match.home, &new_match.away)?;

        let rating = calculate_match(
            self.season.score_type,
            self.season.k_factor,
            new_match.home_score,
            new_match.away_score,
            &home,
            &away,
        )?;

        Ok(MatchApplication {
            new_match: new_match.clone(),
            rating,
        })
    }

    fn ensure_chronological(&self, played_at: DateTime<Utc>) -> Result<(), ScoringError> {
        match self.latest_match() {
            Some(latest) if played_at < latest.played_at => Err(ScoringError::OutOfOrderMatch {
                played_at,
                latest: latest.played_at,
            }),
            _ => Ok(()),
        }
    }

    fn roster(&self, ids: &[EntrantId], side: Side) -> Result<Vec<RosterEntry>, ScoringError> {
        if ids.is_empty() {
            return Err(ScoringError::EmptyRoster(side));
        }

        ids.iter()
            .map(|&id| {
                self.rating(id)
                    .map(|rating| RosterEntry::new(id, rating))
                    .ok_or(ScoringError::UnknownEntrant(id))
            })
            .collect()
    }

    fn next_match_id(&self) -> MatchId {
        self.matches.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }

    /// A team stands for itself and its members, so a team may not meet
    /// (or line up with) one of its own players
    fn ensure_disjoint(&self, home: &[EntrantId], away: &[EntrantId]) -> Result<(), ScoringError> {
        let mut seen = HashSet::with_capacity(home.len() + away.len());
        for &id in home.iter().chain(away) {
            let members = self.team_members.get(&id).map(Vec::as_slice).unwrap_or(&[]);
            for &player in std::iter::once(&id).chain(members) {
                if !seen.insert(player) {
                    return Err(ScoringError::OverlappingRosters(player));
                }
            }
        }
        Ok(())
    }
}

fn team_members(entrants: &[Entrant]) -> BTreeMap<EntrantId, Vec<EntrantId>> {
    entrants
        .iter()
        .filter_map(|e| match &e.kind {
            EntrantKind::Team { members } => Some((e.id, members.clone())),
            EntrantKind::Player => None,
        })
        .collect()
}
