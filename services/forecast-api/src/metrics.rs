//! Prometheus metrics for prediction requests.

use metrics::{counter, histogram};
use std::time::Instant;

/// Times one prediction request and records its outcome.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Count the request and start timing it.
    pub fn start() -> Self {
        counter!("forecast_requests_total").increment(1);
        Self {
            start: Instant::now(),
        }
    }

    /// Record a served request with `rows` predictions.
    pub fn success(self, rows: usize) {
        counter!("forecast_rows_total").increment(rows as u64);
        self.observe("ok");
    }

    /// Record a failed request with its error code.
    pub fn failure(self, code: impl Into<String>) {
        let code: String = code.into();
        counter!("forecast_rejections_total", "code" => code).increment(1);
        self.observe("error");
    }

    fn observe(self, outcome: &'static str) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!("forecast_latency_ms", "outcome" => outcome).record(ms);
    }
}
