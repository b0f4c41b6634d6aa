use std::sync::Once;

use elo_history::model::{EloModel, HistoryEngine};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Plain Elo with k=20 and ptscale=400 around a mean of 1500
pub fn basic_engine(hfa: f64, reversion_coef: f64) -> HistoryEngine<EloModel> {
    HistoryEngine::new(EloModel::new(20.0, 400.0, hfa, 10.0), reversion_coef, 1500.0)
        .expect("Expected a valid reversion coefficient")
}
