// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only. Text and audio handling lives in
// Layer 4 (data), persistence in Layer 6 (infra), printing in
// Layer 1 (cli).

// Scan a corpus, build batches, record their shapes
pub mod inspect_use_case;
