// ============================================================================
// Market Tables - Incremental market data tables over a document store
// ============================================================================
//
// - domain:   table identity, factory, commands and the closed event set
// - store:    document store backends and the table repository
// - services: seed command producer and command handling
// - metrics:  Prometheus registry and HTTP exporter
//
// ============================================================================

pub mod config;
pub mod domain;
pub mod metrics;
pub mod services;
pub mod store;
