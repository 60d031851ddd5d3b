use crate::domain::ScoreType;
use crate::standings::DEFAULT_FORM_LENGTH;

#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub default_score_type: ScoreType,
    pub default_initial_score: f64,
    pub default_k_factor: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            default_score_type: ScoreType::Elo,
            default_initial_score: 1200.0,
            default_k_factor: 32.0,
        }
    }
}

impl ScoringSettings {
    /// Points-based seasons start everyone at zero points
    pub fn initial_score_for(&self, score_type: ScoreType) -> f64 {
        if score_type.is_elo() {
            self.default_initial_score
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandingsSettings {
    pub form_length: usize,
}

impl Default for StandingsSettings {
    fn default() -> Self {
        Self {
            form_length: DEFAULT_FORM_LENGTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "league_scoring.db".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scoring: ScoringSettings,
    pub standings: StandingsSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            scoring: ScoringSettings::default(),
            standings: StandingsSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_defaults() {
        let scoring = ScoringSettings::default();
        assert_eq!(scoring.default_score_type, ScoreType::Elo);
        assert_eq!(scoring.initial_score_for(scoring.default_score_type), 1200.0);
        assert_eq!(scoring.initial_score_for(ScoreType::PointsBased), 0.0);
    }
}
