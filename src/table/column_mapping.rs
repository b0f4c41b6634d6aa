use serde::{Deserialize, Serialize};

/// Names of the columns holding each semantic role in a match table.
///
/// `opp_id` and `opp_score` default to `opp_{id}` and `opp_{score}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub opp_id: Option<String>,
    pub score: String,
    pub opp_score: Option<String>,
    pub season: String,
    pub period: String,
    pub han: String,
    /// Column the rating is written to in output tables
    pub rating: String
}

/// A [`ColumnMapping`] with every default filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub id: String,
    pub opp_id: String,
    pub score: String,
    pub opp_score: String,
    pub season: String,
    pub period: String,
    pub han: String,
    pub rating: String
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            opp_id: None,
            score: "score".to_string(),
            opp_score: None,
            season: "season".to_string(),
            period: "matchup".to_string(),
            han: "han".to_string(),
            rating: "elo".to_string()
        }
    }
}

impl ColumnMapping {
    pub fn resolve(&self) -> ResolvedColumns {
        ResolvedColumns {
            id: self.id.clone(),
            opp_id: self.opp_id.clone().unwrap_or_else(|| format!("opp_{}", self.id)),
            score: self.score.clone(),
            opp_score: self.opp_score.clone().unwrap_or_else(|| format!("opp_{}", self.score)),
            season: self.season.clone(),
            period: self.period.clone(),
            han: self.han.clone(),
            rating: self.rating.clone()
        }
    }
}
