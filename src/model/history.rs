use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    error::{EloError, Result},
    model::{
        progress::{NoProgress, ProgressReporter},
        rating_history::RatingHistory,
        rating_updater::RatingUpdater,
        structures::{
            match_record::MatchRecord,
            rating_entry::{DropReason, DroppedMatch, RatingEntry}
        }
    }
};

/// Propagates ratings through a chronological match table.
///
/// Seasons are processed in ascending order. Each season opens with every
/// participating competitor's rating reverted toward `mean`, then periods are
/// processed in ascending order with every match of a period evaluated against
/// the ratings entering that period.
pub struct HistoryEngine<U: RatingUpdater> {
    updater: U,
    reversion_coef: f64,
    mean: f64
}

/// Ratings produced by a single period
struct PeriodUpdate {
    entries: Vec<RatingEntry>,
    dropped: Vec<DroppedMatch>
}

impl<U: RatingUpdater> HistoryEngine<U> {
    /// Fails if `reversion_coef` is outside of [0, 1] or `mean` is not finite
    pub fn new(updater: U, reversion_coef: f64, mean: f64) -> Result<HistoryEngine<U>> {
        if !(0.0..=1.0).contains(&reversion_coef) {
            return Err(EloError::InvalidReversionCoefficient(reversion_coef));
        }
        if !mean.is_finite() {
            return Err(EloError::InvalidMean(mean));
        }

        Ok(HistoryEngine {
            updater,
            reversion_coef,
            mean
        })
    }

    pub fn reversion_coef(&self) -> f64 {
        self.reversion_coef
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// The opening rating of a competitor who closed the previous season at `previous`
    pub fn revert(&self, previous: f64) -> f64 {
        self.mean + self.reversion_coef * (previous - self.mean)
    }

    /// # Rating history
    ///
    /// Steps, per season:
    /// 1. Open the season with an entry for every competitor in it, stamped with the
    ///     season's first period. Competitors present when the previous season closed
    ///     are reverted toward the mean, everyone else starts at the mean.
    /// 2. For each period, join the period's matches against the ratings stamped with
    ///     that period (on both the competitor and the opponent) and update.
    ///     Results are stamped with the next period of the season, or `period + 1`
    ///     after the last one. Competitors without a match carry their rating forward.
    ///
    /// Matches whose competitor or opponent has no rating entering the period are
    /// skipped and reported through [`RatingHistory::dropped_matches`].
    pub fn compute_history(
        &self,
        matches: &[MatchRecord],
        progress: Option<&mut dyn ProgressReporter>
    ) -> RatingHistory {
        let mut fallback = NoProgress;
        let progress: &mut dyn ProgressReporter = match progress {
            Some(p) => p,
            None => &mut fallback
        };

        let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
        sorted.sort_by(|a, b| {
            (a.season, a.period)
                .cmp(&(b.season, b.period))
                .then_with(|| a.competitor_id.cmp(&b.competitor_id))
        });

        let seasons: Vec<&[&MatchRecord]> = sorted.chunk_by(|a, b| a.season == b.season).collect();

        let mut history = RatingHistory::new();
        // (season, period) stamp of the ratings carried out of the previous season
        let mut closing_stamp: Option<(i32, i32)> = None;

        progress.begin(seasons.len());
        for season_matches in seasons {
            let season = season_matches[0].season;
            let periods: Vec<&[&MatchRecord]> = season_matches.chunk_by(|a, b| a.period == b.period).collect();
            let period_values: Vec<i32> = periods.iter().map(|p| p[0].period).collect();

            progress.season_started(season, periods.len());

            let opening = self.open_season(&history, season, period_values[0], season_matches, closing_stamp);
            debug!(season, competitors = opening.len(), "Opened season");
            history.extend(opening);

            let mut stamp = period_values[0];
            for (i, period_matches) in periods.iter().enumerate() {
                let period = period_values[i];
                let next_period = period_values.get(i + 1).copied().unwrap_or_else(|| closing_period(period));

                let update = self.advance_period(&history, season, period, next_period, period_matches);
                if !update.dropped.is_empty() {
                    warn!(
                        season,
                        period,
                        dropped = update.dropped.len(),
                        "Skipped matches with no rating for one of the participants"
                    );
                }

                history.extend(update.entries);
                history.record_dropped(update.dropped);
                stamp = next_period;

                progress.period_finished(season, period);
            }

            closing_stamp = Some((season, stamp));
            progress.season_finished(season);
        }
        progress.finish();

        let non_finite = history.non_finite_entries().len();
        if non_finite > 0 {
            warn!(non_finite, "Rating history contains non-finite ratings");
        }

        info!(
            entries = history.len(),
            dropped = history.dropped_matches().len(),
            "Rating history computed"
        );

        history
    }

    /// Opening entries for a season, in order of each competitor's first appearance
    fn open_season(
        &self,
        history: &RatingHistory,
        season: i32,
        first_period: i32,
        season_matches: &[&MatchRecord],
        closing_stamp: Option<(i32, i32)>
    ) -> Vec<RatingEntry> {
        let closing = match closing_stamp {
            Some((s, p)) => history.snapshot(s, p),
            None => IndexMap::new()
        };

        season_matches
            .iter()
            .map(|m| m.competitor_id.as_str())
            .unique()
            .map(|id| {
                let rating = match closing.get(id) {
                    Some(previous) => self.revert(*previous),
                    None => self.mean
                };

                RatingEntry {
                    competitor_id: id.to_string(),
                    season,
                    period: first_period,
                    rating
                }
            })
            .collect()
    }

    fn advance_period(
        &self,
        history: &RatingHistory,
        season: i32,
        period: i32,
        next_period: i32,
        period_matches: &[&MatchRecord]
    ) -> PeriodUpdate {
        let snapshot = history.snapshot(season, period);

        let mut dropped = Vec::new();
        let mut joined: HashMap<&str, Vec<&MatchRecord>> = HashMap::new();
        for &m in period_matches {
            let reason = if !snapshot.contains_key(m.competitor_id.as_str()) {
                Some(DropReason::MissingCompetitorRating)
            } else if !snapshot.contains_key(m.opponent_id.as_str()) {
                Some(DropReason::MissingOpponentRating)
            } else {
                None
            };

            match reason {
                Some(reason) => dropped.push(DroppedMatch {
                    competitor_id: m.competitor_id.clone(),
                    opponent_id: m.opponent_id.clone(),
                    season,
                    period,
                    reason
                }),
                None => joined.entry(m.competitor_id.as_str()).or_default().push(m)
            }
        }

        let repeated = joined.values().filter(|ms| ms.len() > 1).count();
        if repeated > 0 {
            warn!(
                season,
                period, repeated, "Competitors with more than one match in a period, summing rating changes"
            );
        }

        let rows: Vec<(&str, f64)> = snapshot.iter().map(|(id, rating)| (*id, *rating)).collect();
        let entries = rows
            .par_iter()
            .map(|&(id, rating)| {
                let new_rating = match joined.get(id) {
                    Some(ms) => self.rate(rating, ms, &snapshot),
                    None => rating
                };

                RatingEntry {
                    competitor_id: id.to_string(),
                    season,
                    period: next_period,
                    rating: new_rating
                }
            })
            .collect();

        PeriodUpdate { entries, dropped }
    }

    /// Applies a competitor's matches for one period. Every match is rated against
    /// the same snapshot, so several matches contribute the sum of their deltas.
    fn rate(&self, rating: f64, matches: &[&MatchRecord], snapshot: &IndexMap<&str, f64>) -> f64 {
        let updated: Vec<f64> = matches
            .iter()
            .map(|m| {
                let opponent = snapshot[m.opponent_id.as_str()];
                self.updater.update_score(
                    rating,
                    opponent,
                    m.outcome().realized_score(),
                    m.score_delta(),
                    m.han()
                )
            })
            .collect();

        match updated.as_slice() {
            [single] => *single,
            many => rating + many.iter().map(|r| r - rating).sum::<f64>()
        }
    }
}

/// Stamp for the ratings carried out of a season whose last period is `period`.
/// `i32::MAX` has no successor, so its results share the period's own stamp and
/// snapshots resolve to the latest entry.
fn closing_period(period: i32) -> i32 {
    period.checked_add(1).unwrap_or(period)
}

/// Validates the configuration and computes the rating history in one step
pub fn compute_history<U: RatingUpdater>(
    updater: U,
    matches: &[MatchRecord],
    reversion_coef: f64,
    mean: f64,
    progress: Option<&mut dyn ProgressReporter>
) -> Result<RatingHistory> {
    let engine = HistoryEngine::new(updater, reversion_coef, mean)?;
    Ok(engine.compute_history(matches, progress))
}

#[cfg(test)]
mod tests {
    use crate::{
        error::EloError,
        model::{
            elo::EloModel,
            history::{compute_history, HistoryEngine},
            margin_of_victory::MarginOfVictoryModel,
            progress::ProgressReporter,
            structures::{
                home_away_neutral::HomeAwayNeutral::{Away, Home},
                mov_type::MovType,
                rating_entry::DropReason
            }
        },
        utils::test_utils::{generate_contest, generate_league, generate_match_record}
    };
    use approx::assert_abs_diff_eq;

    fn engine(reversion_coef: f64) -> HistoryEngine<EloModel> {
        HistoryEngine::new(EloModel::basic(20.0, 400.0), reversion_coef, 1500.0).unwrap()
    }

    #[derive(Default)]
    struct RecordingProgress {
        seasons: Vec<(i32, usize)>,
        periods: Vec<(i32, i32)>,
        finished: usize
    }

    impl ProgressReporter for RecordingProgress {
        fn season_started(&mut self, season: i32, n_periods: usize) {
            self.seasons.push((season, n_periods));
        }

        fn period_finished(&mut self, season: i32, period: i32) {
            self.periods.push((season, period));
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    #[test]
    fn test_single_match() {
        let matches = generate_contest("A", "B", 14.0, 0.0, 1, 1, None);
        let history = engine(0.75).compute_history(&matches, None);

        assert_eq!(history.len(), 4);

        let opening = history.snapshot(1, 1);
        assert_eq!(opening["A"], 1500.0);
        assert_eq!(opening["B"], 1500.0);

        let after = history.snapshot(1, 2);
        assert_abs_diff_eq!(after["A"], 1510.0);
        assert_abs_diff_eq!(after["B"], 1490.0);
    }

    #[test]
    fn test_two_competitor_league_is_zero_sum() {
        let mut matches = generate_contest("A", "B", 27.0, 24.0, 1, 1, Some(Home));
        matches.extend(generate_contest("B", "A", 10.0, 3.0, 1, 2, Some(Home)));
        matches.extend(generate_contest("A", "B", 17.0, 17.0, 1, 3, None));

        let history = engine(0.75).compute_history(&matches, None);

        for period in 1..=4 {
            let snapshot = history.snapshot(1, period);
            assert_abs_diff_eq!(snapshot["A"] + snapshot["B"], 3000.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_home_field_shifts_expectation() {
        let model = EloModel::new(20.0, 400.0, 65.0, 10.0);
        let engine = HistoryEngine::new(model, 0.75, 1500.0).unwrap();
        let matches = generate_contest("A", "B", 20.0, 10.0, 1, 1, Some(Home));

        let history = engine.compute_history(&matches, None);
        let after = history.snapshot(1, 2);

        // The home side was expected to win, so gains less than half of k
        assert!(after["A"] - 1500.0 < 10.0);
        assert_abs_diff_eq!(after["A"] + after["B"], 3000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_carry_forward() {
        let mut matches = generate_contest("A", "B", 3.0, 0.0, 1, 1, None);
        matches.extend(generate_contest("C", "D", 7.0, 0.0, 1, 1, None));
        // C and D are idle in period 2
        matches.extend(generate_contest("A", "B", 3.0, 0.0, 1, 2, None));
        matches.extend(generate_contest("C", "A", 1.0, 0.0, 1, 3, None));

        let history = engine(0.75).compute_history(&matches, None);

        let p2 = history.snapshot(1, 2);
        let p3 = history.snapshot(1, 3);
        assert_eq!(p2["C"], p3["C"]);
        assert_eq!(p2["D"], p3["D"]);
        assert!(p3["A"] > p2["A"]);

        // D sits out period 3 as well
        assert_eq!(history.snapshot(1, 4)["D"], p2["D"]);
    }

    #[test]
    fn test_non_contiguous_periods() {
        let mut matches = generate_contest("A", "B", 3.0, 0.0, 1, 1, None);
        matches.extend(generate_contest("A", "B", 3.0, 0.0, 1, 3, None));
        matches.extend(generate_contest("A", "B", 3.0, 0.0, 1, 7, None));

        let history = engine(0.75).compute_history(&matches, None);
        let a_periods: Vec<i32> = history.competitor_history("A").iter().map(|e| e.period).collect();

        assert_eq!(a_periods, vec![1, 3, 7, 8]);
        assert_eq!(history.closing_period(1), Some(8));
    }

    #[test]
    fn test_reversion_zero_resets_to_mean() {
        let mut matches = generate_contest("A", "B", 30.0, 0.0, 2000, 1, None);
        matches.extend(generate_contest("A", "B", 30.0, 0.0, 2000, 2, None));
        matches.extend(generate_contest("A", "B", 30.0, 0.0, 2001, 1, None));

        let history = engine(0.0).compute_history(&matches, None);
        let opening = history.snapshot(2001, 1);

        assert_eq!(opening["A"], 1500.0);
        assert_eq!(opening["B"], 1500.0);
    }

    #[test]
    fn test_reversion_one_keeps_closing_rating() {
        let mut matches = generate_contest("A", "B", 30.0, 0.0, 2000, 1, None);
        matches.extend(generate_contest("A", "B", 30.0, 0.0, 2000, 2, None));
        matches.extend(generate_contest("A", "B", 30.0, 0.0, 2001, 5, None));

        let history = engine(1.0).compute_history(&matches, None);
        let closing = history.snapshot(2000, 3);
        let opening = history.snapshot(2001, 5);

        assert_eq!(opening["A"], closing["A"]);
        assert_eq!(opening["B"], closing["B"]);
    }

    #[test]
    fn test_partial_reversion() {
        let mut matches = generate_contest("A", "B", 30.0, 0.0, 1, 1, None);
        matches.extend(generate_contest("A", "C", 30.0, 0.0, 2, 1, None));

        let history = engine(0.75).compute_history(&matches, None);
        let opening = history.snapshot(2, 1);

        assert_abs_diff_eq!(opening["A"], 1500.0 + 0.75 * 10.0);
        // C never played before
        assert_eq!(opening["C"], 1500.0);
        // B does not play in season 2
        assert!(!opening.contains_key("B"));
    }

    #[test]
    fn test_reversion_only_uses_most_recent_season() {
        let mut matches = generate_contest("A", "B", 30.0, 0.0, 1, 1, None);
        matches.extend(generate_contest("C", "D", 30.0, 0.0, 2, 1, None));
        matches.extend(generate_contest("A", "C", 30.0, 0.0, 3, 1, None));

        let history = engine(1.0).compute_history(&matches, None);
        let opening = history.snapshot(3, 1);

        // A sat out season 2 and returns at the mean
        assert_eq!(opening["A"], 1500.0);
        assert_abs_diff_eq!(opening["C"], 1510.0);
    }

    #[test]
    fn test_unsorted_input() {
        let matches = generate_league(5, 2, 4, 7);
        let mut shuffled = matches.clone();
        shuffled.reverse();

        let engine = engine(0.75);
        assert_eq!(
            engine.compute_history(&matches, None),
            engine.compute_history(&shuffled, None)
        );
    }

    #[test]
    fn test_idempotent() {
        let matches = generate_league(8, 3, 6, 42);
        let engine = engine(0.75);

        let first = serde_json::to_string(engine.compute_history(&matches, None).entries()).unwrap();
        let second = serde_json::to_string(engine.compute_history(&matches, None).entries()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_progress_does_not_change_output() {
        let matches = generate_league(6, 2, 3, 3);
        let engine = engine(0.75);
        let mut progress = RecordingProgress::default();

        let with_progress = engine.compute_history(&matches, Some(&mut progress));
        let without_progress = engine.compute_history(&matches, None);

        assert_eq!(with_progress, without_progress);
        assert_eq!(progress.seasons.len(), 2);
        assert!(progress.seasons.iter().all(|(_, n)| *n == 3));
        assert_eq!(progress.periods.len(), 6);
        assert_eq!(progress.finished, 1);
    }

    #[test]
    fn test_missing_opponent_is_dropped() {
        let mut matches = generate_contest("A", "B", 3.0, 0.0, 1, 1, None);
        // Z never appears as a competitor
        matches.push(generate_match_record("C", "Z", 10.0, 0.0, 1, 1, None));

        let history = engine(0.75).compute_history(&matches, None);
        let dropped = history.dropped_matches();

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].competitor_id, "C");
        assert_eq!(dropped[0].reason, DropReason::MissingOpponentRating);

        // C keeps its rating
        assert_eq!(history.snapshot(1, 2)["C"], 1500.0);
        assert!(!history.snapshot(1, 2).contains_key("Z"));
    }

    #[test]
    fn test_multiple_matches_in_period_sum_deltas() {
        let mut matches = generate_contest("A", "B", 3.0, 0.0, 1, 1, None);
        matches.extend(generate_contest("A", "C", 3.0, 0.0, 1, 1, None));

        let history = engine(0.75).compute_history(&matches, None);
        let after = history.snapshot(1, 2);

        assert_abs_diff_eq!(after["A"], 1520.0);
        assert_abs_diff_eq!(after["B"], 1490.0);
        assert_abs_diff_eq!(after["C"], 1490.0);
    }

    #[test]
    fn test_margin_of_victory_history() {
        let model = MarginOfVictoryModel::new(EloModel::basic(20.0, 400.0), 2.2, 0.001, 2.2, 0.8, MovType::Nfl);
        let matches = generate_contest("A", "B", 14.0, 0.0, 1, 1, Some(Away));
        let history = compute_history(model, &matches, 0.75, 1500.0, None).unwrap();

        assert_abs_diff_eq!(history.snapshot(1, 2)["A"], 1500.0 + 10.0 * 15f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn test_empty_matches() {
        let history = engine(0.75).compute_history(&[], None);

        assert!(history.is_empty());
        assert!(history.dropped_matches().is_empty());
    }

    #[test]
    fn test_invalid_reversion_coef() {
        for coef in [-0.01, 1.01, f64::NAN] {
            let result = HistoryEngine::new(EloModel::basic(20.0, 400.0), coef, 1500.0);
            assert!(matches!(result, Err(EloError::InvalidReversionCoefficient(_))));
        }

        let result = compute_history(EloModel::basic(20.0, 400.0), &[], 2.0, 1500.0, None);
        assert!(matches!(result, Err(EloError::InvalidReversionCoefficient(c)) if c == 2.0));
    }

    #[test]
    fn test_invalid_mean() {
        for mean in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = HistoryEngine::new(EloModel::basic(20.0, 400.0), 0.75, mean);
            assert!(matches!(result, Err(EloError::InvalidMean(_))));
        }

        let engine = engine(0.5);
        assert_eq!(engine.mean(), 1500.0);
        assert_eq!(engine.reversion_coef(), 0.5);
    }

    #[test]
    fn test_last_period_at_integer_limit() {
        let mut matches = generate_contest("A", "B", 14.0, 0.0, 1, i32::MAX, None);
        matches.extend(generate_contest("A", "B", 7.0, 7.0, 2, 1, None));

        let engine = engine(0.5);
        let history = engine.compute_history(&matches, None);

        assert_eq!(history.closing_period(1), Some(i32::MAX));
        let closing = history.snapshot(1, i32::MAX);
        assert_abs_diff_eq!(closing["A"], 1510.0);
        assert_abs_diff_eq!(closing["B"], 1490.0);

        let opening = history.snapshot(2, 1);
        assert_abs_diff_eq!(opening["A"], engine.revert(1510.0));
        assert_abs_diff_eq!(opening["B"], engine.revert(1490.0));
    }

    #[test]
    fn test_degenerate_margin_of_victory_is_reported() {
        // The away side's rating gap damping is -4 * 0.5 + 2 = 0
        let elo = EloModel::new(20.0, 400.0, 4.0, 10.0);
        let model = MarginOfVictoryModel::new(elo, 3.0, 0.5, 2.0, 0.8, MovType::Nba);
        let matches = generate_contest("A", "B", 100.0, 90.0, 1, 1, Some(Home));

        let history = compute_history(model, &matches, 0.75, 1500.0, None).unwrap();

        assert_eq!(history.len(), 4);
        let non_finite = history.non_finite_entries();
        assert_eq!(non_finite.len(), 1);
        assert_eq!(non_finite[0].competitor_id, "B");
        assert_eq!(non_finite[0].period, 2);
        assert!(history.snapshot(1, 2)["A"].is_finite());
    }
}
