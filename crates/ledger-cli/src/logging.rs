use ledger_core::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "LEDGER_LOG";

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(settings: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A second init (tests) is harmless.
    let _ = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
