use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the verbosity flags.
pub const LOG_ENV: &str = "LATEXLINT_LOG";

/// Default filter for the number of `-v` flags given.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the tracing subscriber. Events go to stderr so stdout only
/// ever carries the report.
///
/// `LATEXLINT_LOG` takes precedence over `verbose` when set.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
