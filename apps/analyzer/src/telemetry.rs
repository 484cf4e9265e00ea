use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the JSON subscriber used by embedding binaries. `RUST_LOG` wins
/// over the `info` default. Output goes to stderr so stdout stays free for
/// reports.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .json();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok();
}
