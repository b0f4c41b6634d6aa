use serde::{Deserialize, Serialize};

/// Win / loss / tie from the perspective of the record's owner
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Win,
    Loss,
    Tie
}

impl MatchOutcome {
    pub fn from_scores(own_score: f64, opponent_score: f64) -> MatchOutcome {
        if own_score > opponent_score {
            MatchOutcome::Win
        } else if own_score < opponent_score {
            MatchOutcome::Loss
        } else {
            MatchOutcome::Tie
        }
    }

    /// The realized Elo score: 1 for a win, 0 for a loss, 0.5 for a tie
    pub fn realized_score(self) -> f64 {
        match self {
            MatchOutcome::Win => 1.0,
            MatchOutcome::Loss => 0.0,
            MatchOutcome::Tie => 0.5
        }
    }
}
