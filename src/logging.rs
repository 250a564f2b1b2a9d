use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// The default level is `info`. When `debug` is set (via the settings file)
/// the level becomes `debug` and `RUST_LOG` may override it; otherwise
/// `RUST_LOG` is ignored so a stray environment variable cannot turn on
/// verbose output.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
