use itertools::izip;

use crate::{
    error::{EloError, Result},
    model::structures::home_away_neutral::HomeAwayNeutral
};

/// The single capability the history engine needs from a rating model.
///
/// Implementations must be pure: the engine evaluates every match of a
/// period in parallel against the same snapshot.
pub trait RatingUpdater: Send + Sync {
    /// Returns the new rating for the owner of `r0` after a match against `r1`.
    ///
    /// `deltapts` is directional: positive when the owner of `r0` outscored its
    /// opponent. A sign that disagrees with `realized_score` is not checked.
    fn update_score(&self, r0: f64, r1: f64, realized_score: f64, deltapts: f64, han: HomeAwayNeutral) -> f64;

    /// Vectorized [`RatingUpdater::update_score`] over parallel slices
    fn update_scores(
        &self,
        r0: &[f64],
        r1: &[f64],
        realized_scores: &[f64],
        deltapts: &[f64],
        han: &[HomeAwayNeutral]
    ) -> Result<Vec<f64>> {
        let n = r0.len();
        for other in [r1.len(), realized_scores.len(), deltapts.len(), han.len()] {
            if other != n {
                return Err(EloError::LengthMismatch { left: n, right: other });
            }
        }

        Ok(izip!(r0, r1, realized_scores, deltapts, han)
            .map(|(r0, r1, s, d, h)| self.update_score(*r0, *r1, *s, *d, *h))
            .collect())
    }
}
