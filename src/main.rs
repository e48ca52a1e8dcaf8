//! fixtrack main entrypoint.

use fixtrack::run;
use fixtrack::ui::messages::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Diagnostics go to stderr so json/csv output on stdout stays clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("FIXTRACK_LOG").unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        tracing::debug!(code = e.code(), "request failed");
        error(format!("Error [{}]: {}", e.code(), e));
        std::process::exit(1);
    }
}
