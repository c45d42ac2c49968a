use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default `tally=warn`.
pub(crate) fn init() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tally=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
