use std::net::SocketAddr;

/// Counter: capacity decrements committed.
pub const SLOTS_CLOSED_TOTAL: &str = "slotdesk_slots_closed_total";

/// Counter: capacity increments committed.
pub const SLOTS_OPENED_TOTAL: &str = "slotdesk_slots_opened_total";

/// Counter: mutations skipped at the floor or ceiling clamp.
pub const CAPACITY_NOOPS_TOTAL: &str = "slotdesk_capacity_noops_total";

/// Counter: persist failures rolled back inside a mutation.
pub const PERSIST_FAILURES_TOTAL: &str = "slotdesk_persist_failures_total";

/// Counter: open batches abandoned on a closing day.
pub const CLOSING_DAY_SKIPS_TOTAL: &str = "slotdesk_closing_day_skips_total";

/// Histogram: duration of one locked mutation transaction in seconds.
pub const MUTATION_DURATION_SECONDS: &str = "slotdesk_mutation_duration_seconds";

/// Install the Prometheus metrics exporter on the given port. No-op if port
/// is None. Called once by the embedding application.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
