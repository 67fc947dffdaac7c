use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Prometheus collectors for the HTTP surface and account events.
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Accounts
    pub auth_events_total: CounterVec,
    pub password_reset_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("taskboard"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("taskboard")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let auth_events_total = CounterVec::new(
            Opts::new("auth_events_total", "Registrations, logins and password changes")
                .namespace("taskboard"),
            &["event", "result"],
        )?;
        registry.register(Box::new(auth_events_total.clone()))?;

        let password_reset_total = CounterVec::new(
            Opts::new("password_reset_total", "Forgot-password submissions by step")
                .namespace("taskboard"),
            &["step", "result"],
        )?;
        registry.register(Box::new(password_reset_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            auth_events_total,
            password_reset_total,
        }))
    }

    pub fn record_auth_event(&self, event: &str, success: bool) {
        self.auth_events_total
            .with_label_values(&[event, result_label(success)])
            .inc();
    }

    pub fn record_reset(&self, step: &str, success: bool) {
        self.password_reset_total
            .with_label_values(&[step, result_label(success)])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn result_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}
