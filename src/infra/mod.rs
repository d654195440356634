// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by the data pipeline and by
// whatever training loop consumes it:
//
//   checkpoint.rs   — step-keyed model + optimizer checkpoints
//                     via burn's CompactRecorder
//   metrics.rs      — append-only JSON metric time series
//   config_store.rs — PrepConfig as JSON next to the outputs
//   format.rs       — human-readable byte sizes for reports

/// Model/optimizer checkpoint saving and loading
pub mod checkpoint;

/// JSON metric log
pub mod metrics;

/// PrepConfig persistence
pub mod config_store;

/// Byte size formatting
pub mod format;
