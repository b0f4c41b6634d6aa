use crate::model::structures::{home_away_neutral::HomeAwayNeutral, match_record::MatchRecord};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn generate_match_record(
    competitor_id: &str,
    opponent_id: &str,
    own_score: f64,
    opponent_score: f64,
    season: i32,
    period: i32,
    han: Option<HomeAwayNeutral>
) -> MatchRecord {
    MatchRecord {
        competitor_id: competitor_id.to_string(),
        opponent_id: opponent_id.to_string(),
        own_score,
        opponent_score,
        season,
        period,
        home_away_neutral: han
    }
}

/// Both records of a single contest. `han` is from the first competitor's side.
pub fn generate_contest(
    competitor_id: &str,
    opponent_id: &str,
    own_score: f64,
    opponent_score: f64,
    season: i32,
    period: i32,
    han: Option<HomeAwayNeutral>
) -> Vec<MatchRecord> {
    let record = generate_match_record(competitor_id, opponent_id, own_score, opponent_score, season, period, han);
    let mirror = record.mirror();

    vec![record, mirror]
}

pub fn generate_team_ids(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("T{:02}", i)).collect()
}

/// Generates a symmetric league of `n_teams` over `n_seasons` seasons of
/// `n_periods` periods each. Teams are paired at random every period; with an
/// odd number of teams one team sits out. Results are reproducible per `seed`.
pub fn generate_league(n_teams: usize, n_seasons: i32, n_periods: i32, seed: u64) -> Vec<MatchRecord> {
    if n_teams < 2 {
        panic!("A league needs at least 2 teams");
    }

    // Initialize seeded RNG for reproducible results
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut teams = generate_team_ids(n_teams);
    let mut matches = Vec::new();

    for season in 1..=n_seasons {
        for period in 1..=n_periods {
            teams.shuffle(&mut rng);

            for pair in teams.chunks_exact(2) {
                let home_score = rng.random_range(0..=40) as f64;
                let away_score = rng.random_range(0..=40) as f64;
                let han = if rng.random_bool(0.1) {
                    HomeAwayNeutral::Neutral
                } else {
                    HomeAwayNeutral::Home
                };

                matches.extend(generate_contest(
                    &pair[0],
                    &pair[1],
                    home_score,
                    away_score,
                    season,
                    period,
                    Some(han)
                ));
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_contest_is_symmetric() {
        let contest = generate_contest("A", "B", 21.0, 7.0, 1, 1, Some(HomeAwayNeutral::Home));

        assert_eq!(contest.len(), 2);
        assert_eq!(contest[1], contest[0].mirror());
    }

    #[test]
    fn test_league_shape() {
        let matches = generate_league(5, 2, 3, 1);

        // 2 contests per period, 2 records per contest
        assert_eq!(matches.len(), 2 * 3 * 2 * 2);

        let periods: HashSet<(i32, i32)> = matches.iter().map(|m| (m.season, m.period)).collect();
        assert_eq!(periods.len(), 6);
    }

    #[test]
    fn test_league_reproducible() {
        assert_eq!(generate_league(6, 2, 4, 9), generate_league(6, 2, 4, 9));
    }

    #[test]
    fn test_league_one_match_per_team_per_period() {
        let matches = generate_league(7, 1, 5, 11);
        let keys: Vec<(i32, i32, &str)> = matches
            .iter()
            .map(|m| (m.season, m.period, m.competitor_id.as_str()))
            .collect();
        let unique: HashSet<_> = keys.iter().collect();

        assert_eq!(keys.len(), unique.len());
    }

    #[test]
    #[should_panic(expected = "A league needs at least 2 teams")]
    fn test_invalid_league() {
        generate_league(1, 1, 1, 0);
    }
}
