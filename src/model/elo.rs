use itertools::izip;

use crate::{
    error::{EloError, Result},
    model::{
        constants::{RatingPreset, DEFAULT_BASE},
        rating_updater::RatingUpdater,
        structures::home_away_neutral::HomeAwayNeutral
    }
};

/// The Elo rating system with an optional home-field advantage.
///
/// - `k`: the maximum number of points a competitor can gain from a single victory
/// - `ptscale`: the rating gap scale, i.e. how quickly the expected score saturates
///     as the gap between two competitors grows
/// - `hfa`: home-field advantage in rating points (0 disables it)
/// - `base`: base of the logistic curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EloModel {
    pub k: f64,
    pub ptscale: f64,
    pub hfa: f64,
    pub base: f64
}

impl EloModel {
    pub fn new(k: f64, ptscale: f64, hfa: f64, base: f64) -> EloModel {
        EloModel { k, ptscale, hfa, base }
    }

    /// A model without home-field advantage and the conventional base of 10
    pub fn basic(k: f64, ptscale: f64) -> EloModel {
        EloModel::new(k, ptscale, 0.0, DEFAULT_BASE)
    }

    pub fn from_preset(preset: &RatingPreset) -> EloModel {
        EloModel::new(preset.k, preset.ptscale, preset.hfa, preset.base)
    }

    pub fn has_homefield(&self) -> bool {
        self.hfa != 0.0
    }

    /// Rating difference between the owner of `r0` and its opponent,
    /// adjusted for home-field advantage
    pub fn elo_diff(&self, r0: f64, r1: f64, han: HomeAwayNeutral) -> f64 {
        (r0 - r1) + han.sign() * self.hfa
    }

    /// The expected score (effectively a win probability) of `r0` against `r1`
    pub fn expected_score(&self, r0: f64, r1: f64, han: HomeAwayNeutral) -> f64 {
        let ed = self.elo_diff(r0, r1, han);
        1.0 / (1.0 + self.base.powf(-ed / self.ptscale))
    }

    pub fn expected_scores(&self, r0: &[f64], r1: &[f64], han: &[HomeAwayNeutral]) -> Result<Vec<f64>> {
        if r0.len() != r1.len() {
            return Err(EloError::LengthMismatch {
                left: r0.len(),
                right: r1.len()
            });
        }
        if r0.len() != han.len() {
            return Err(EloError::LengthMismatch {
                left: r0.len(),
                right: han.len()
            });
        }

        Ok(izip!(r0, r1, han)
            .map(|(r0, r1, han)| self.expected_score(*r0, *r1, *han))
            .collect())
    }

    /// Rating after a match, with the rating delta scaled by `multiplier`
    pub fn scaled_update(&self, r0: f64, r1: f64, realized_score: f64, multiplier: f64, han: HomeAwayNeutral) -> f64 {
        let expected = self.expected_score(r0, r1, han);
        r0 + self.k * multiplier * (realized_score - expected)
    }

    /// The logarithmic strength of a rating
    pub fn q_score(&self, r: f64) -> f64 {
        self.base.powf(r / self.ptscale)
    }

    /// Point spread implied by two ratings, given the empirical
    /// number of rating points per point of spread
    pub fn point_spread(&self, r0: f64, r1: f64, spreadscale: f64, han: HomeAwayNeutral) -> f64 {
        self.elo_diff(r0, r1, han) / spreadscale
    }
}

impl RatingUpdater for EloModel {
    fn update_score(&self, r0: f64, r1: f64, realized_score: f64, deltapts: f64, han: HomeAwayNeutral) -> f64 {
        self.scaled_update(r0, r1, realized_score, 1.0, han)
    }
}
