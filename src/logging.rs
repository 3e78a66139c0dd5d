use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MANDELBROT_LOG";

/// Install the fmt subscriber, filtered by `MANDELBROT_LOG` (default `info`).
/// Logs go to stderr so `--json` output stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
