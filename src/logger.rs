use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV_VARS: [&str; 2] = ["SCRAPEPROBE_LOG", "RUST_LOG"];

/// Installs the global subscriber. Events go to stderr so the report on
/// stdout stays machine-readable.
pub fn init_logging(verbose: bool) {
    let directive = filter_directive(verbose, |name| std::env::var(name).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn filter_directive<F>(verbose: bool, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    LOG_ENV_VARS
        .iter()
        .find_map(|name| env(name).filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| (if verbose { "debug" } else { "info" }).to_owned())
}
