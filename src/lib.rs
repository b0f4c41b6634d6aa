pub mod args;
pub mod error;
pub mod model;
pub mod table;
pub mod utils;

pub use error::{EloError, Result};
