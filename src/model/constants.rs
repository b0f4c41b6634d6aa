use super::structures::mov_type::MovType;

// Engine defaults
pub const DEFAULT_MEAN: f64 = 1500.0;
pub const DEFAULT_REVERSION_COEF: f64 = 0.75;
// Model defaults
pub const DEFAULT_BASE: f64 = 10.0;
pub const DEFAULT_HFA: f64 = 0.0;
pub const DEFAULT_POWER: f64 = 0.8;

/// An empirically tuned parameter bundle for a specific league
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingPreset {
    pub k: f64,
    pub ptscale: f64,
    pub hfa: f64,
    pub base: f64,
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
    pub power: f64,
    pub mov_type: MovType
}

/// FiveThirtyEight's NFL model
pub const NFL_538: RatingPreset = RatingPreset {
    k: 20.0,
    ptscale: 400.0,
    hfa: 65.0,
    base: DEFAULT_BASE,
    a0: 2.2,
    a1: 0.001,
    a2: 2.2,
    power: DEFAULT_POWER,
    mov_type: MovType::Nfl
};

/// FiveThirtyEight's NBA model
pub const NBA_538: RatingPreset = RatingPreset {
    k: 20.0,
    ptscale: 400.0,
    hfa: 100.0,
    base: DEFAULT_BASE,
    a0: 3.0,
    a1: 0.006,
    a2: 7.5,
    power: 0.8,
    mov_type: MovType::Nba
};
