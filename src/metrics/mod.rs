// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::time::Duration;

// Re-export for public API
pub use server::{render, MetricsServer};

// ============================================================================
// Metrics Module - Prometheus metrics for table persistence
// ============================================================================
//
// Provides metrics for:
// - Table loads per group
// - Saved events per group and event type
// - Store call latency and failures
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    pub table_loads_total: IntCounterVec,
    pub table_saves_total: IntCounterVec,
    pub store_errors_total: IntCounterVec,
    pub store_operation_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let table_loads_total = IntCounterVec::new(
            Opts::new("table_loads_total", "Total tables loaded from the store"),
            &["group"],
        )?;
        registry.register(Box::new(table_loads_total.clone()))?;

        let table_saves_total = IntCounterVec::new(
            Opts::new("table_saves_total", "Total table events saved to the store"),
            &["group", "event"],
        )?;
        registry.register(Box::new(table_saves_total.clone()))?;

        let store_errors_total = IntCounterVec::new(
            Opts::new("store_errors_total", "Total failed store calls"),
            &["operation"],
        )?;
        registry.register(Box::new(store_errors_total.clone()))?;

        let store_operation_duration = HistogramVec::new(
            HistogramOpts::new("store_operation_duration_seconds", "Store call duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(store_operation_duration.clone()))?;

        Ok(Self {
            registry,
            table_loads_total,
            table_saves_total,
            store_errors_total,
            store_operation_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one store call
    pub fn record_store_call(&self, operation: &str, elapsed: Duration, success: bool) {
        if !success {
            self.store_errors_total.with_label_values(&[operation]).inc();
        }
        self.store_operation_duration
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_load(&self, group: &str) {
        self.table_loads_total.with_label_values(&[group]).inc();
    }

    pub fn record_save(&self, group: &str, event_type: &str) {
        self.table_saves_total.with_label_values(&[group, event_type]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_store_call() {
        let metrics = Metrics::new().unwrap();
        metrics.record_store_call("load", Duration::from_millis(3), true);
        metrics.record_store_call("save", Duration::from_millis(3), false);

        let gathered = metrics.registry.gather();
        let errors = gathered.iter().find(|m| m.name() == "store_errors_total").unwrap();
        assert_eq!(errors.metric.len(), 1);
        assert_eq!(errors.metric[0].counter.value, Some(1.0));
    }

    #[test]
    fn test_record_save_by_event_type() {
        let metrics = Metrics::new().unwrap();
        metrics.record_save("trading_dates", "RowsReplaced");
        metrics.record_save("trading_dates", "RowsAppended");
        metrics.record_save("trading_dates", "RowsAppended");

        let gathered = metrics.registry.gather();
        let saves = gathered.iter().find(|m| m.name() == "table_saves_total").unwrap();
        assert_eq!(saves.metric.len(), 2);
    }

    #[test]
    fn test_record_load() {
        let metrics = Metrics::new().unwrap();
        metrics.record_load("securities");

        let gathered = metrics.registry.gather();
        let loads = gathered.iter().find(|m| m.name() == "table_loads_total").unwrap();
        assert_eq!(loads.metric[0].counter.value, Some(1.0));
    }
}
