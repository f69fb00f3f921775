use metrics::{counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Pre-register counters so they appear even before the first increment.
/// The latency histogram is only described; it stays empty until the first
/// analysis finishes.
fn register_metrics() {
    counter!("wallet_analyses_total").absolute(0);
    counter!("upstream_pages_fetched_total").absolute(0);
    counter!("upstream_transactions_fetched_total").absolute(0);
    for kind in ["invalid_address", "no_data", "fetch_failure"] {
        counter!("wallet_analysis_failures_total", "kind" => kind).absolute(0);
    }

    describe_histogram!(
        "wallet_analysis_seconds",
        Unit::Seconds,
        "Wall time of one wallet analysis, including every upstream page"
    );
}

/// A handle backed by a recorder that is not installed globally, for tests
/// and tools that only need a renderable endpoint.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
