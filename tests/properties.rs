use elo_history::model::{
    constants::NFL_538, structures::home_away_neutral::HomeAwayNeutral, EloModel, MarginOfVictoryModel,
    RatingUpdater
};
use proptest::prelude::*;

fn han() -> impl Strategy<Value = HomeAwayNeutral> {
    prop_oneof![
        Just(HomeAwayNeutral::Home),
        Just(HomeAwayNeutral::Away),
        Just(HomeAwayNeutral::Neutral)
    ]
}

proptest! {
    #[test]
    fn expected_scores_of_both_sides_sum_to_one(
        r0 in 0.0f64..3000.0,
        r1 in 0.0f64..3000.0,
        hfa in 0.0f64..150.0,
        han in han()
    ) {
        let model = EloModel::new(20.0, 400.0, hfa, 10.0);
        let total = model.expected_score(r0, r1, han) + model.expected_score(r1, r0, han.mirror());

        prop_assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn expected_score_is_a_probability(
        r0 in 0.0f64..3000.0,
        r1 in 0.0f64..3000.0,
        han in han()
    ) {
        let e = EloModel::from_preset(&NFL_538).expected_score(r0, r1, han);

        prop_assert!(e > 0.0 && e < 1.0);
    }

    #[test]
    fn winning_never_costs_rating(
        r0 in 1000.0f64..2000.0,
        r1 in 1000.0f64..2000.0,
        margin in 1.0f64..50.0,
        han in han()
    ) {
        let elo = EloModel::from_preset(&NFL_538);
        let mov = MarginOfVictoryModel::from_preset(&NFL_538);

        prop_assert!(elo.update_score(r0, r1, 1.0, margin, han) > r0);
        prop_assert!(mov.update_score(r0, r1, 1.0, margin, han) > r0);
        prop_assert!(elo.update_score(r0, r1, 0.0, -margin, han) < r0);
    }
}
