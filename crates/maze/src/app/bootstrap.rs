use std::time::Duration;

use intent::GateConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::loop_runner::HostConfig;

const METRICS_LOG_INTERVAL_ENV_VAR: &str = "SPOOKY_MAZE_METRICS_LOG_MS";

pub(crate) struct AppWiring {
    pub(crate) config: HostConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Spooky Maze Startup ===");

    let gate = GateConfig {
        metrics_log_interval: parse_metrics_log_interval(
            std::env::var(METRICS_LOG_INTERVAL_ENV_VAR).ok().as_deref(),
        )
        .unwrap_or_else(|| GateConfig::default().metrics_log_interval),
        ..GateConfig::default()
    };

    AppWiring {
        config: HostConfig {
            gate,
            ..HostConfig::default()
        },
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Only the metrics cadence is tunable; the gate interval and tilt threshold
/// are fixed for players.
fn parse_metrics_log_interval(raw: Option<&str>) -> Option<Duration> {
    let raw = raw?.trim();
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            warn!(
                var = METRICS_LOG_INTERVAL_ENV_VAR,
                value = raw,
                "ignoring invalid metrics log interval"
            );
            None
        }
    }
}
