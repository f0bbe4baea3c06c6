use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{
    BunyanFormattingLayer,
    JsonStorageLayer,
};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{
    EnvFilter,
    Registry,
};

/// Install the global `tracing` subscriber.
///
/// Spans are emitted as bunyan-formatted JSON on stdout. `RUST_LOG` takes
/// precedence over `env_filter`. Records from the `log` facade are forwarded
/// to the same subscriber.
///
/// It must be called once per process: a second call panics.
pub fn setup_tracing(name: String, env_filter: String) {
    LogTracer::init().expect("failed to set the log tracer");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(name, std::io::stdout));

    set_global_default(subscriber).expect("failed to set the tracing subscriber");
}
