use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use strum_macros::Display;

use crate::{
    model::constants::{RatingPreset, DEFAULT_MEAN, DEFAULT_REVERSION_COEF, NBA_538, NFL_538},
    table::ColumnMapping
};

/// Rating model selected on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
    /// FiveThirtyEight's NFL model with the NFL margin of victory multiplier
    Nfl538,
    /// FiveThirtyEight's NBA model with the NBA margin of victory multiplier
    Nba538,
    /// Plain Elo with the NFL constants and no margin of victory multiplier
    Elo
}

impl Preset {
    pub fn constants(self) -> RatingPreset {
        match self {
            Preset::Nfl538 | Preset::Elo => NFL_538,
            Preset::Nba538 => NBA_538
        }
    }

    pub fn uses_margin_of_victory(self) -> bool {
        !matches!(self, Preset::Elo)
    }
}

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Elo History",
    long_about = "Computes season-by-season Elo rating histories from head-to-head match results"
)]
pub struct Args {
    /// Match table as a JSON array of objects, or one object per line for `.jsonl` files.
    /// Every contest must appear twice, once from each side.
    #[arg(short, long, env = "ELO_INPUT")]
    pub input: PathBuf,

    /// Where to write the rating history. Defaults to stdout.
    #[arg(short, long, env = "ELO_OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(short, long, env = "ELO_PRESET", value_enum, default_value_t = Preset::Nfl538)]
    pub preset: Preset,

    /// Overrides the preset's k
    #[arg(long)]
    pub k: Option<f64>,

    /// Overrides the preset's point scale
    #[arg(long)]
    pub ptscale: Option<f64>,

    /// Overrides the preset's home-field advantage (0 disables it)
    #[arg(long)]
    pub hfa: Option<f64>,

    /// Inter-season reversion coefficient, between 0 and 1
    #[arg(long, env = "ELO_REVERSION_COEF", default_value_t = DEFAULT_REVERSION_COEF)]
    pub reversion_coef: f64,

    /// Long-term mean rating
    #[arg(long, env = "ELO_MEAN", default_value_t = DEFAULT_MEAN)]
    pub mean: f64,

    #[arg(long, default_value = "id")]
    pub id_col: String,

    /// Defaults to `opp_{id-col}`
    #[arg(long)]
    pub opp_id_col: Option<String>,

    #[arg(long, default_value = "score")]
    pub score_col: String,

    /// Defaults to `opp_{score-col}`
    #[arg(long)]
    pub opp_score_col: Option<String>,

    #[arg(long, default_value = "season")]
    pub season_col: String,

    #[arg(long, default_value = "matchup")]
    pub period_col: String,

    #[arg(long, default_value = "han")]
    pub han_col: String,

    #[arg(long, default_value = "elo")]
    pub rating_col: String,

    /// Log the top N competitors by final rating
    #[arg(long)]
    pub standings: Option<usize>,

    /// Disables progress bars
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_progress: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

impl Args {
    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping {
            id: self.id_col.clone(),
            opp_id: self.opp_id_col.clone(),
            score: self.score_col.clone(),
            opp_score: self.opp_score_col.clone(),
            season: self.season_col.clone(),
            period: self.period_col.clone(),
            han: self.han_col.clone(),
            rating: self.rating_col.clone()
        }
    }

    /// The preset's constants with any command line overrides applied
    pub fn rating_constants(&self) -> RatingPreset {
        let mut constants = self.preset.constants();
        if let Some(k) = self.k {
            constants.k = k;
        }
        if let Some(ptscale) = self.ptscale {
            constants.ptscale = ptscale;
        }
        if let Some(hfa) = self.hfa {
            constants.hfa = hfa;
        }

        constants
    }
}
