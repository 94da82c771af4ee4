use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Default directive when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_DIRECTIVE: &str = "plannercell=info";

/// Installs the global subscriber once. `RUST_LOG` wins over `directive`.
///
/// Logs go to stderr so command output on stdout stays scriptable.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directive.unwrap_or(DEFAULT_DIRECTIVE)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        // A subscriber installed by a host process stays in charge.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
        tracing::debug!("PlannerCell tracing initialized.");
    });
}
