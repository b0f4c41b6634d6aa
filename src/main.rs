use std::{fs::File, io, io::BufWriter, process::ExitCode};

use clap::Parser;
use elo_history::{
    args::Args,
    error::Result,
    model::{
        structures::match_record::MatchRecord, EloModel, HistoryEngine, MarginOfVictoryModel, ProgressReporter,
        RatingUpdater, SpanProgress
    },
    table::{asymmetric_records, write_history, MatchTable}
};
use tracing::{debug, error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, !args.no_progress);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str, progress: bool) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if progress {
        let indicatif_layer = IndicatifLayer::new();
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
            .with(indicatif_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn run(args: &Args) -> Result<()> {
    let mapping = args.column_mapping();
    let records = MatchTable::from_path(&args.input)?.records(&mapping)?;

    let asymmetric = asymmetric_records(&records);
    if !asymmetric.is_empty() {
        warn!("{} records have no mirror record for the opponent", asymmetric.len());
    }

    let constants = args.rating_constants();
    info!(preset = %args.preset, k = constants.k, hfa = constants.hfa, "Computing rating history");

    if args.preset.uses_margin_of_victory() {
        run_engine(MarginOfVictoryModel::from_preset(&constants), args, &records)
    } else {
        run_engine(EloModel::from_preset(&constants), args, &records)
    }
}

fn run_engine<U: RatingUpdater>(updater: U, args: &Args, records: &[MatchRecord]) -> Result<()> {
    let engine = HistoryEngine::new(updater, args.reversion_coef, args.mean)?;
    debug!(
        reversion_coef = engine.reversion_coef(),
        mean = engine.mean(),
        matches = records.len(),
        "Configured history engine"
    );

    let mut progress = SpanProgress::new();
    let reporter: Option<&mut dyn ProgressReporter> = if args.no_progress {
        None
    } else {
        Some(&mut progress)
    };
    let history = engine.compute_history(records, reporter);

    let mapping = args.column_mapping();
    match &args.output {
        Some(path) => {
            write_history(&history, &mapping, BufWriter::new(File::create(path)?))?;
            info!("Wrote {} ratings to {}", history.len(), path.display());
        }
        None => write_history(&history, &mapping, io::stdout().lock())?
    }

    if let Some(n) = args.standings {
        let model = EloModel::from_preset(&args.rating_constants());
        for (rank, (id, rating)) in history.standings().into_iter().take(n).enumerate() {
            info!("{:>3}. {:<12} {:>8.1}  q={:.2}", rank + 1, id, rating, model.q_score(rating));
        }
    }

    Ok(())
}
