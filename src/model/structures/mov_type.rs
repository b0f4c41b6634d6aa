use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter};

use crate::error::EloError;

/// Margin of victory multiplier formula. The NFL and NBA models
/// use different fitted shapes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MovType {
    Nfl,
    Nba
}

impl FromStr for MovType {
    type Err = EloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nfl" => Ok(MovType::Nfl),
            "nba" => Ok(MovType::Nba),
            _ => Err(EloError::UnknownMovType(s.to_string()))
        }
    }
}
