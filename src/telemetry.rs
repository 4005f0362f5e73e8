use rocket::{
    Data, Request, Response,
    fairing::{Fairing, Info, Kind},
};
use std::time::Instant;
use tracing::info_span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Wraps every request in a span carrying the method, uri and outcome, and
/// logs a completion line with the elapsed time.
pub struct TelemetryFairing;

#[rocket::async_trait]
impl Fairing for TelemetryFairing {
    fn info(&self) -> Info {
        Info {
            name: "Request telemetry",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        let span = info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            status_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error_kind = tracing::field::Empty,
            error_message = tracing::field::Empty,
        );

        request.local_cache(|| (span, Instant::now()));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let (span, started) = request.local_cache(|| (info_span!("request"), Instant::now()));

        let duration_ms = started.elapsed().as_millis() as i64;
        let status = response.status().code;

        span.record("status_code", status);
        span.record("duration_ms", duration_ms);

        let _entered = span.enter();
        tracing::info!(
            "{} {} completed with status {} in {}ms",
            request.method(),
            request.uri(),
            status,
            duration_ms
        );
    }
}

pub fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
