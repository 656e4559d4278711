//! Logging setup for the provider binary

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;

/// Log line format
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Install the global subscriber
///
/// The filter comes from `RUST_LOG`, falling back to `info`. Logs go to
/// stderr so stdout stays machine readable.
///
/// # Errors
/// If a global subscriber is already installed.
pub fn setup_logging(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|err| {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            eprintln!("invalid log filter: {err}");
        }
        EnvFilter::new("info")
    });

    let json = tracing_subscriber::fmt::Layer::new()
        .json()
        .with_writer(std::io::stderr);
    let compact = tracing_subscriber::fmt::Layer::new()
        .compact()
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry()
        .with((format == LogFormat::Json).then_some(json))
        .with((format == LogFormat::Compact).then_some(compact))
        .with(env_filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
