use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Driver crates log every statement and reconnect at info; keep them at warn
/// unless `RUST_LOG` asks otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["sqlx=warn", "redis=warn", "hyper=warn"];

const COUNTERS: &[(&str, &str)] = &[
    (
        "buques_cache_hit_total",
        "Vessel list reads served from cache.",
    ),
    (
        "buques_cache_miss_total",
        "Vessel list reads that found no cache entry.",
    ),
    (
        "buques_cache_error_total",
        "Cache reads that failed or timed out and fell through to the source.",
    ),
    (
        "buques_cache_store_error_total",
        "Cache writes that failed after a successful source fetch.",
    ),
    (
        "buques_source_fetch_total",
        "Queries issued against the vessels view.",
    ),
];

/// Install the global subscriber: level from settings, overridable per target
/// through `RUST_LOG`, compact or JSON lines, span traces captured on errors.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let mut env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        for directive in QUIET_DEPENDENCIES {
            let directive = directive
                .parse()
                .map_err(|err| InfraError::telemetry(format!("bad directive {directive}: {err}")))?;
            env_filter = env_filter.add_directive(directive);
        }
    }

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("tracing subscriber already set: {err}")))
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        for (name, help) in COUNTERS {
            describe_counter!(*name, Unit::Count, *help);
        }
        describe_histogram!(
            "buques_source_fetch_ms",
            Unit::Milliseconds,
            "Vessels query latency, including time spent waiting for a pooled connection."
        );
    });
}
