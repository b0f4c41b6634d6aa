use indexmap::IndexMap;
use itertools::Itertools;

use crate::model::structures::rating_entry::{DroppedMatch, RatingEntry};

/// Append-only rating history produced by the history engine.
///
/// Entries are stored in the order they were produced and indexed by the
/// (season, period) stamp they apply to. Once handed to the caller the
/// history is read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingHistory {
    entries: Vec<RatingEntry>,
    // Entry positions for each (season, period) stamp, in append order
    stamps: IndexMap<(i32, i32), Vec<usize>>,
    dropped: Vec<DroppedMatch>
}

impl RatingHistory {
    pub fn new() -> RatingHistory {
        RatingHistory::default()
    }

    pub(crate) fn push(&mut self, entry: RatingEntry) {
        let idx = self.entries.len();
        self.stamps.entry((entry.season, entry.period)).or_default().push(idx);
        self.entries.push(entry);
    }

    pub(crate) fn extend(&mut self, entries: impl IntoIterator<Item = RatingEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    pub(crate) fn record_dropped(&mut self, dropped: impl IntoIterator<Item = DroppedMatch>) {
        self.dropped.extend(dropped);
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ratings stamped with (season, period), keyed by competitor in append order.
    /// If a competitor appears more than once under the same stamp the latest
    /// entry wins.
    pub fn snapshot(&self, season: i32, period: i32) -> IndexMap<&str, f64> {
        let mut snapshot = IndexMap::new();

        if let Some(positions) = self.stamps.get(&(season, period)) {
            for &idx in positions {
                let entry = &self.entries[idx];
                snapshot.insert(entry.competitor_id.as_str(), entry.rating);
            }
        }

        snapshot
    }

    /// The latest stamp recorded for a season, i.e. the ratings carried out of it
    pub fn closing_period(&self, season: i32) -> Option<i32> {
        self.stamps.keys().filter(|(s, _)| *s == season).map(|(_, p)| *p).max()
    }

    /// Every entry for a competitor, in the order produced
    pub fn competitor_history(&self, competitor_id: &str) -> Vec<&RatingEntry> {
        self.entries
            .iter()
            .filter(|e| e.competitor_id == competitor_id)
            .collect()
    }

    /// The most recent rating for every competitor
    pub fn latest_ratings(&self) -> IndexMap<&str, f64> {
        let mut latest = IndexMap::new();
        for entry in &self.entries {
            latest.insert(entry.competitor_id.as_str(), entry.rating);
        }

        latest
    }

    /// Latest ratings sorted from strongest to weakest
    pub fn standings(&self) -> Vec<(&str, f64)> {
        self.latest_ratings()
            .into_iter()
            .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
            .collect()
    }

    /// Matches skipped because a participant had no current rating
    pub fn dropped_matches(&self) -> &[DroppedMatch] {
        &self.dropped
    }

    /// Entries whose rating is NaN or infinite
    pub fn non_finite_entries(&self) -> Vec<&RatingEntry> {
        self.entries.iter().filter(|e| !e.rating.is_finite()).collect()
    }
}
