//! Rating models and the history engine

pub mod constants;
pub mod elo;
pub mod history;
pub mod margin_of_victory;
pub mod progress;
pub mod rating_history;
pub mod rating_updater;
pub mod structures;

pub use self::{
    elo::EloModel,
    history::{compute_history, HistoryEngine},
    margin_of_victory::MarginOfVictoryModel,
    progress::{NoProgress, ProgressReporter, SpanProgress},
    rating_history::RatingHistory,
    rating_updater::RatingUpdater
};
