use serde::{Deserialize, Serialize};

/// The rating a competitor carries entering the stamped (season, period)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub competitor_id: String,
    pub season: i32,
    pub period: i32,
    pub rating: f64
}

/// A match skipped because one side had no rating in the current snapshot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DroppedMatch {
    pub competitor_id: String,
    pub opponent_id: String,
    pub season: i32,
    pub period: i32,
    pub reason: DropReason
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    MissingCompetitorRating,
    MissingOpponentRating
}
