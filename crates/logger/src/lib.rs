use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set, otherwise `default_level`
/// (e.g. `"info"` or `"ibkr_flex=debug,data_pipeline=info"`).
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global fmt subscriber writing to stderr, so stdout stays
/// free for reports. Calling it again is a no-op.
pub fn init(default_level: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(default_level, "logger initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init("debug");
        init("info");
        tracing::info!("still logging");
    }

    #[test]
    fn test_env_filter_accepts_directives() {
        let filter = env_filter("ibkr_flex=debug,data_pipeline=info");
        assert!(!filter.to_string().is_empty());
    }
}
