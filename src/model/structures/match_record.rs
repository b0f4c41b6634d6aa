use serde::{Deserialize, Serialize};

use super::{home_away_neutral::HomeAwayNeutral, match_outcome::MatchOutcome};

/// One competitor's view of a single contest. Every contest is expected to
/// appear twice, once from each side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub competitor_id: String,
    pub opponent_id: String,
    pub own_score: f64,
    pub opponent_score: f64,
    pub season: i32,
    pub period: i32,
    #[serde(default)]
    pub home_away_neutral: Option<HomeAwayNeutral>
}

impl MatchRecord {
    /// Signed point differential, positive when the owner outscored the opponent
    pub fn score_delta(&self) -> f64 {
        self.own_score - self.opponent_score
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_scores(self.own_score, self.opponent_score)
    }

    /// Missing flags are treated as neutral venues
    pub fn han(&self) -> HomeAwayNeutral {
        self.home_away_neutral.unwrap_or_default()
    }

    /// The same contest seen from the opponent's side
    pub fn mirror(&self) -> MatchRecord {
        MatchRecord {
            competitor_id: self.opponent_id.clone(),
            opponent_id: self.competitor_id.clone(),
            own_score: self.opponent_score,
            opponent_score: self.own_score,
            season: self.season,
            period: self.period,
            home_away_neutral: self.home_away_neutral.map(HomeAwayNeutral::mirror)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::structures::{home_away_neutral::HomeAwayNeutral, match_outcome::MatchOutcome},
        utils::test_utils::generate_match_record
    };

    #[test]
    fn test_score_delta_is_directional() {
        let record = generate_match_record("A", "B", 14.0, 0.0, 1, 1, Some(HomeAwayNeutral::Home));

        assert_eq!(record.score_delta(), 14.0);
        assert_eq!(record.mirror().score_delta(), -14.0);
        assert_eq!(record.outcome(), MatchOutcome::Win);
        assert_eq!(record.mirror().outcome(), MatchOutcome::Loss);
    }

    #[test]
    fn test_mirror() {
        let record = generate_match_record("A", "B", 24.0, 17.0, 2015, 3, Some(HomeAwayNeutral::Home));
        let mirror = record.mirror();

        assert_eq!(mirror.competitor_id, "B");
        assert_eq!(mirror.opponent_id, "A");
        assert_eq!(mirror.own_score, 17.0);
        assert_eq!(mirror.opponent_score, 24.0);
        assert_eq!(mirror.home_away_neutral, Some(HomeAwayNeutral::Away));
        assert_eq!(mirror.mirror(), record);
    }

    #[test]
    fn test_missing_han_defaults_to_neutral() {
        let record = generate_match_record("A", "B", 1.0, 1.0, 1, 1, None);

        assert_eq!(record.han(), HomeAwayNeutral::Neutral);
        assert_eq!(record.mirror().home_away_neutral, None);
    }
}
