use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};
use strum_macros::EnumIter;

use crate::error::EloError;

/// Whether the competitor owning a record played at home, away, or at a neutral venue.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
pub enum HomeAwayNeutral {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "A")]
    Away,
    #[default]
    #[serde(rename = "N")]
    Neutral
}

impl HomeAwayNeutral {
    /// Direction in which home-field advantage is applied to the owner's rating
    pub fn sign(self) -> f64 {
        match self {
            HomeAwayNeutral::Home => 1.0,
            HomeAwayNeutral::Away => -1.0,
            HomeAwayNeutral::Neutral => 0.0
        }
    }

    /// The flag as seen from the opponent's record of the same contest
    pub fn mirror(self) -> HomeAwayNeutral {
        match self {
            HomeAwayNeutral::Home => HomeAwayNeutral::Away,
            HomeAwayNeutral::Away => HomeAwayNeutral::Home,
            HomeAwayNeutral::Neutral => HomeAwayNeutral::Neutral
        }
    }
}

impl TryFrom<&str> for HomeAwayNeutral {
    type Error = EloError;

    fn try_from(v: &str) -> Result<Self, Self::Error> {
        match v {
            "H" => Ok(HomeAwayNeutral::Home),
            "A" => Ok(HomeAwayNeutral::Away),
            "N" => Ok(HomeAwayNeutral::Neutral),
            _ => Err(EloError::UnknownHomeAwayNeutral(v.to_string()))
        }
    }
}

impl FromStr for HomeAwayNeutral {
    type Err = EloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeAwayNeutral::try_from(s)
    }
}
