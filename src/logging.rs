use std::env;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a stderr subscriber; `log` records reach it through the `tracing-log` bridge.
pub fn init_logging() {
    let filter = build_filter(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    if let Err(error) = subscriber.try_init() {
        eprintln!("Failed to initialize logging: {error}");
    }
}

fn build_filter(raw: Option<&str>) -> EnvFilter {
    raw.filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
