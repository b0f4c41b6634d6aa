pub mod home_away_neutral;
pub mod match_outcome;
pub mod match_record;
pub mod mov_type;
pub mod rating_entry;
