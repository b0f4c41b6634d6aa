use crate::{
    error::Result,
    model::{
        constants::{RatingPreset, DEFAULT_BASE, DEFAULT_HFA, DEFAULT_POWER},
        elo::EloModel,
        rating_updater::RatingUpdater,
        structures::{home_away_neutral::HomeAwayNeutral, mov_type::MovType}
    }
};

/// Elo with a margin of victory multiplier amplifying the rating change of
/// lopsided results. The multiplier shrinks as the winner's pre-match rating
/// advantage grows so that blowouts of weak opponents are not over-credited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginOfVictoryModel {
    pub elo: EloModel,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    /// Only used by [`MovType::Nba`]
    pub power: f64,
    pub mov_type: MovType
}

impl MarginOfVictoryModel {
    pub fn new(elo: EloModel, a0: f64, a1: f64, a2: f64, power: f64, mov_type: MovType) -> MarginOfVictoryModel {
        MarginOfVictoryModel {
            elo,
            a0,
            a1,
            a2,
            power,
            mov_type
        }
    }

    /// Builds a model from raw parameters with the multiplier type given by name
    pub fn with_mov_type_name(k: f64, ptscale: f64, a0: f64, a1: f64, a2: f64, mov_type: &str) -> Result<Self> {
        let mov_type = mov_type.parse::<MovType>()?;
        let elo = EloModel::new(k, ptscale, DEFAULT_HFA, DEFAULT_BASE);

        Ok(MarginOfVictoryModel::new(elo, a0, a1, a2, DEFAULT_POWER, mov_type))
    }

    pub fn from_preset(preset: &RatingPreset) -> MarginOfVictoryModel {
        MarginOfVictoryModel::new(
            EloModel::from_preset(preset),
            preset.a0,
            preset.a1,
            preset.a2,
            preset.power,
            preset.mov_type
        )
    }

    /// The factor by which the base Elo delta is scaled for a result
    /// decided by `deltapts` points.
    pub fn margin_of_victory_multiplier(&self, deltapts: f64, r0: f64, r1: f64, han: HomeAwayNeutral) -> f64 {
        match self.mov_type {
            MovType::Nfl => self.mov_nfl(deltapts, r0, r1, han),
            MovType::Nba => self.mov_nba(deltapts, r0, r1, han)
        }
    }

    /// Margins are clamped to at least one point, which also keeps the
    /// logarithm's argument positive for losing or mis-signed margins.
    fn mov_nfl(&self, deltapts: f64, r0: f64, r1: f64, han: HomeAwayNeutral) -> f64 {
        (deltapts.max(1.0) + 1.0).ln() * (self.a0 / self.rating_gap_damping(r0, r1, han))
    }

    fn mov_nba(&self, deltapts: f64, r0: f64, r1: f64, han: HomeAwayNeutral) -> f64 {
        (deltapts.abs() + self.a0).powf(self.power) / self.rating_gap_damping(r0, r1, han)
    }

    fn rating_gap_damping(&self, r0: f64, r1: f64, han: HomeAwayNeutral) -> f64 {
        self.elo.elo_diff(r0, r1, han) * self.a1 + self.a2
    }
}

impl RatingUpdater for MarginOfVictoryModel {
    fn update_score(&self, r0: f64, r1: f64, realized_score: f64, deltapts: f64, han: HomeAwayNeutral) -> f64 {
        let mov = self.margin_of_victory_multiplier(deltapts, r0, r1, han);
        self.elo.scaled_update(r0, r1, realized_score, mov, han)
    }
}
