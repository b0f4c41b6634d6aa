use tracing::{info_span, span::EnteredSpan};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::utils::progress_utils::progress_style;

/// Observes the engine's progress through seasons and periods.
///
/// Reporting is purely observational. The engine's output never depends on
/// whether a reporter is attached.
pub trait ProgressReporter {
    fn begin(&mut self, n_seasons: usize) {}

    fn season_started(&mut self, season: i32, n_periods: usize) {}

    fn period_finished(&mut self, season: i32, period: i32) {}

    fn season_finished(&mut self, season: i32) {}

    fn finish(&mut self) {}
}

/// Does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Renders a season bar with a nested period bar through `tracing-indicatif`.
/// Bars are only drawn when an `IndicatifLayer` is installed.
#[derive(Default)]
pub struct SpanProgress {
    seasons: Option<EnteredSpan>,
    periods: Option<EnteredSpan>
}

impl SpanProgress {
    pub fn new() -> SpanProgress {
        SpanProgress::default()
    }
}

impl ProgressReporter for SpanProgress {
    fn begin(&mut self, n_seasons: usize) {
        let span = info_span!("seasons");
        span.pb_set_style(&progress_style());
        span.pb_set_length(n_seasons as u64);
        span.pb_set_message("Processing seasons");

        self.seasons = Some(span.entered());
    }

    fn season_started(&mut self, season: i32, n_periods: usize) {
        // Exit the previous season's span before opening the next one
        self.periods.take();

        let span = info_span!("periods", season);
        span.pb_set_style(&progress_style());
        span.pb_set_length(n_periods as u64);
        span.pb_set_message(&format!("Season {}", season));

        self.periods = Some(span.entered());
    }

    fn period_finished(&mut self, season: i32, period: i32) {
        if let Some(span) = &self.periods {
            span.pb_inc(1);
        }
    }

    fn season_finished(&mut self, season: i32) {
        self.periods.take();

        if let Some(span) = &self.seasons {
            span.pb_inc(1);
        }
    }

    fn finish(&mut self) {
        self.periods.take();
        self.seasons.take();
    }
}
